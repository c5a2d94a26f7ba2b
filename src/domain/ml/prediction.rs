use crate::domain::errors::InferenceFailure;
use serde::{Deserialize, Serialize};

/// Binary risk classification returned by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLabel {
    Low,
    High,
}

impl RiskLabel {
    pub fn as_i64(&self) -> i64 {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::High => 1,
        }
    }

    /// Fixed human-readable message for a label.
    pub fn message(&self, condition: &str) -> String {
        match self {
            RiskLabel::High => format!("High risk of {condition}"),
            RiskLabel::Low => format!("Low risk of {condition}"),
        }
    }
}

impl TryFrom<i64> for RiskLabel {
    type Error = InferenceFailure;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RiskLabel::Low),
            1 => Ok(RiskLabel::High),
            other => Err(InferenceFailure::UnexpectedLabel(other)),
        }
    }
}

/// Response body of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub probability: Option<f64>,
}

impl PredictionResult {
    pub fn new(label: RiskLabel, condition: &str, probability: Option<f64>) -> Self {
        Self {
            prediction: label.as_i64(),
            message: label.message(condition),
            probability,
        }
    }
}

/// Logistic squashing of a raw decision value into [0, 1]
pub fn sigmoid(d: f64) -> f64 {
    1.0 / (1.0 + (-d).exp())
}
