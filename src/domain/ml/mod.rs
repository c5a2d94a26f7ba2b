pub mod feature_registry;
pub mod prediction;

pub use feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureRecord, FeatureValue};
pub use prediction::{PredictionResult, RiskLabel, sigmoid};
