//! Linear estimators stored as plain coefficient vectors.
//!
//! Both share the same decision value `w . x + b`; they differ in whether the
//! value is a calibrated log-odds (logistic regression) or an uncalibrated
//! margin (linear SVM).

use super::predictor::{Capabilities, Classifier, check_dimension};
use crate::domain::errors::InferenceFailure;
use crate::domain::ml::sigmoid;
use serde::{Deserialize, Serialize};

fn default_threshold() -> f64 {
    0.5
}

fn dot(coefficients: &[f64], intercept: f64, features: &[f64]) -> Result<f64, InferenceFailure> {
    check_dimension(coefficients.len(), features)?;
    let value = coefficients
        .iter()
        .zip(features)
        .map(|(w, x)| w * x)
        .sum::<f64>()
        + intercept;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceFailure::Backend(
            "decision value is not finite".to_string(),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Positive class when probability >= threshold
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticRegressionModel {
    pub fn dimension(&self) -> usize {
        self.coefficients.len()
    }
}

impl Classifier for LogisticRegressionModel {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceFailure> {
        let p = self.predict_proba(features)?;
        Ok(if p >= self.threshold { 1 } else { 0 })
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        Ok(sigmoid(self.decision_function(features)?))
    }

    fn decision_function(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        dot(&self.coefficients, self.intercept, features)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            probability: true,
            decision_score: true,
        }
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvmModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearSvmModel {
    pub fn dimension(&self) -> usize {
        self.coefficients.len()
    }
}

impl Classifier for LinearSvmModel {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceFailure> {
        let margin = self.decision_function(features)?;
        Ok(if margin > 0.0 { 1 } else { 0 })
    }

    fn decision_function(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        dot(&self.coefficients, self.intercept, features)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            probability: false,
            decision_score: true,
        }
    }

    fn name(&self) -> &str {
        "Linear SVM"
    }
}
