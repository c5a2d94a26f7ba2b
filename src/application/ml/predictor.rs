use crate::domain::errors::InferenceFailure;
use serde::Serialize;

/// What a loaded estimator can do beyond plain classification.
///
/// Declared by each adapter and read once when the artifact is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub probability: bool,
    pub decision_score: bool,
}

/// Where the confidence score of a prediction comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Positive-class probability reported by the model.
    Probability,
    /// Raw decision value squashed through a sigmoid.
    DecisionScore,
    /// No confidence score; the probability field is omitted.
    None,
}

impl From<Capabilities> for ScoreSource {
    fn from(caps: Capabilities) -> Self {
        if caps.probability {
            ScoreSource::Probability
        } else if caps.decision_score {
            ScoreSource::DecisionScore
        } else {
            ScoreSource::None
        }
    }
}

/// Interface for binary classifiers over a single feature vector
pub trait Classifier: Send + Sync {
    /// Predict the class label (0 or 1 for a well-formed model)
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceFailure>;

    /// Probability of the positive class
    fn predict_proba(&self, _features: &[f64]) -> Result<f64, InferenceFailure> {
        Err(InferenceFailure::Backend(format!(
            "{} does not estimate probabilities",
            self.name()
        )))
    }

    /// Signed distance to the decision boundary
    fn decision_function(&self, _features: &[f64]) -> Result<f64, InferenceFailure> {
        Err(InferenceFailure::Backend(format!(
            "{} has no decision function",
            self.name()
        )))
    }

    fn capabilities(&self) -> Capabilities;

    /// Get model name/type
    fn name(&self) -> &str;
}

pub(crate) fn check_dimension(expected: usize, features: &[f64]) -> Result<(), InferenceFailure> {
    if features.len() != expected {
        return Err(InferenceFailure::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}
