use super::predictor::{Capabilities, Classifier};
use crate::domain::errors::InferenceFailure;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub type ForestModel = RandomForestClassifier<f64, i64, DenseMatrix<f64>, Vec<i64>>;

/// Random forest classifier trained and serialized with smartcore.
///
/// Exposes labels only; the forest carries no calibrated score.
#[derive(Serialize, Deserialize)]
pub struct SmartCoreForest {
    model: ForestModel,
}

impl SmartCoreForest {
    pub fn new(model: ForestModel) -> Self {
        Self { model }
    }
}

impl std::fmt::Debug for SmartCoreForest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartCoreForest")
            .field("model", &"<RandomForestClassifier>")
            .finish()
    }
}

impl Classifier for SmartCoreForest {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceFailure> {
        let input_matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()])
            .map_err(|e| InferenceFailure::Backend(format!("Matrix creation failed: {}", e)))?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| InferenceFailure::Backend(format!("Prediction failed: {}", e)))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| InferenceFailure::Backend("No prediction returned".to_string()))
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
