// Feature schema, prediction results and model-facing types
pub mod ml;

// Domain-specific error types
pub mod errors;
