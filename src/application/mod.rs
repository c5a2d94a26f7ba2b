// Model adapters, pipeline and artifact loading
pub mod ml;

// Prediction path
pub mod prediction_cache;
pub mod prediction_service;

// System orchestrator
pub mod system;
