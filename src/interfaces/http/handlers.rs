//! HTTP handlers for the prediction API.

use super::AppState;
use super::dto::{ErrorBody, HealthResponse, ModelInfo};
use crate::domain::errors::PredictionError;
use crate::domain::ml::PredictionResult;
use axum::Json;
use axum::extract::State;
use axum::body::Bytes;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::Value;

/// `POST /predict`
///
/// The body is parsed as JSON whatever the `Content-Type` header says.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResult>, PredictionError> {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return Err(state.service.malformed_request(&e.to_string())),
    };
    state.service.predict_json(&payload).map(Json)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.service.model().map(|m| ModelInfo {
        name: m.name().to_string(),
        version: m.version().to_string(),
        condition: m.condition().to_string(),
        estimator: m.classifier().name().to_string(),
        capabilities: m.capabilities(),
    });
    Json(HealthResponse {
        status: if model.is_some() { "ok" } else { "degraded" },
        model_loaded: model.is_some(),
        model,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.service.metrics().render(),
    )
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not Found")))
}
