pub mod artifact;
pub mod linear_model;
pub mod pipeline;
pub mod predictor;
pub mod smartcore_predictor;

pub use artifact::{ModelArtifact, ModelHandle, load_model, read_artifact, try_load_model};
pub use pipeline::{Pipeline, PipelineStep};
pub use predictor::{Capabilities, Classifier, ScoreSource};
