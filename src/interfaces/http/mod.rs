//! HTTP surface of the prediction service
//!
//! # Endpoints
//! - `POST /predict` - Classify one health-survey record
//! - `GET /health` - Model status
//! - `GET /metrics` - Prometheus metrics

pub mod dto;
pub mod error;
pub mod handlers;

use crate::application::prediction_service::PredictionService;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

/// Build the application router with open CORS, request spans and the
/// panic fallback installed.
pub fn router(service: Arc<PredictionService>) -> Router {
    with_layers(
        Router::new()
            .route("/predict", post(handlers::predict))
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics))
            .fallback(handlers::not_found)
            .with_state(AppState { service }),
    )
}

/// Wrap routes in the panic fallback, request spans and CORS.
pub fn with_layers(routes: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri()
        )
    });

    routes
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(trace)
        .layer(cors)
}
