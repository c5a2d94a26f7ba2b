use super::dto::ErrorBody;
use crate::domain::errors::PredictionError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use tracing::error;

impl IntoResponse for PredictionError {
    fn into_response(self) -> Response {
        // every failure kind surfaces as a server error with a textual detail
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.to_string())),
        )
            .into_response()
    }
}

/// Global fallback for panics escaping a handler.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal Server Error".to_string()
    };
    error!("Global exception handler caught: {}", detail);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(detail))).into_response()
}
