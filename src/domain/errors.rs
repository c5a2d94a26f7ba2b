use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the prediction service
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Model not loaded")]
    ModelUnavailable,

    #[error("{0}")]
    BadInput(String),

    #[error("Prediction error: {0}")]
    Inference(String),
}

impl PredictionError {
    /// Stable label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::ModelUnavailable => "model_unavailable",
            PredictionError::BadInput(_) => "bad_input",
            PredictionError::Inference(_) => "inference_error",
        }
    }
}

/// Errors raised by a model while scoring a single vector
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InferenceFailure {
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("model returned unexpected label {0}")]
    UnexpectedLabel(i64),

    #[error("{0}")]
    Backend(String),
}

/// Errors related to loading a model artifact from disk
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize model artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid model artifact: {reason}")]
    Invalid { reason: String },

    #[error("Feature order mismatch at position {index}: artifact has '{found}', service sends '{expected}'")]
    FeatureOrderMismatch {
        index: usize,
        expected: String,
        found: String,
    },
}
