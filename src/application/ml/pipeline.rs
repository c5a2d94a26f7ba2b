use super::predictor::{Capabilities, Classifier};
use crate::domain::errors::InferenceFailure;
use serde::{Deserialize, Serialize};

/// Preprocessing step applied to the feature vector before the estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineStep {
    StandardScaler { mean: Vec<f64>, scale: Vec<f64> },
}

impl PipelineStep {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStep::StandardScaler { .. } => "standard_scaler",
        }
    }

    /// Input width the step was fitted on
    pub fn dimension(&self) -> usize {
        match self {
            PipelineStep::StandardScaler { mean, .. } => mean.len(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            PipelineStep::StandardScaler { mean, scale } => {
                if mean.len() != scale.len() {
                    return Err(format!(
                        "standard_scaler has {} means but {} scales",
                        mean.len(),
                        scale.len()
                    ));
                }
                if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
                    return Err("standard_scaler contains non-finite values".to_string());
                }
                Ok(())
            }
        }
    }

    pub fn transform(&self, features: &mut [f64]) {
        match self {
            PipelineStep::StandardScaler { mean, scale } => {
                for ((x, m), s) in features.iter_mut().zip(mean).zip(scale) {
                    // zero variance columns pass through centred only
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    *x = (*x - m) / s;
                }
            }
        }
    }
}

/// Preprocessing steps followed by a final estimator.
pub struct Pipeline {
    steps: Vec<PipelineStep>,
    estimator: Box<dyn Classifier>,
}

impl Pipeline {
    pub fn new(steps: Vec<PipelineStep>, estimator: Box<dyn Classifier>) -> Self {
        Self { steps, estimator }
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceFailure> {
        let mut transformed = features.to_vec();
        for step in &self.steps {
            if transformed.len() != step.dimension() {
                return Err(InferenceFailure::DimensionMismatch {
                    expected: step.dimension(),
                    actual: transformed.len(),
                });
            }
            step.transform(&mut transformed);
        }
        Ok(transformed)
    }
}

impl Classifier for Pipeline {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceFailure> {
        self.estimator.predict(&self.transform(features)?)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        self.estimator.predict_proba(&self.transform(features)?)
    }

    fn decision_function(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        self.estimator.decision_function(&self.transform(features)?)
    }

    fn capabilities(&self) -> Capabilities {
        self.estimator.capabilities()
    }

    fn name(&self) -> &str {
        self.estimator.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::linear_model::LogisticRegressionModel;

    #[test]
    fn test_standard_scaler_transform() {
        let step = PipelineStep::StandardScaler {
            mean: vec![10.0, 5.0, 1.0],
            scale: vec![2.0, 0.0, 0.5],
        };
        let mut x = vec![14.0, 7.0, 2.0];
        step.transform(&mut x);
        assert_eq!(x, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_scaler_validation() {
        let step = PipelineStep::StandardScaler {
            mean: vec![1.0, 2.0],
            scale: vec![1.0],
        };
        assert!(step.validate().is_err());

        let step = PipelineStep::StandardScaler {
            mean: vec![f64::NAN],
            scale: vec![1.0],
        };
        assert!(step.validate().is_err());
    }

    #[test]
    fn test_pipeline_applies_steps_before_estimator() {
        let pipeline = Pipeline::new(
            vec![PipelineStep::StandardScaler {
                mean: vec![30.0],
                scale: vec![5.0],
            }],
            Box::new(LogisticRegressionModel {
                coefficients: vec![1.0],
                intercept: 0.0,
                threshold: 0.5,
            }),
        );
        // (35 - 30) / 5 = 1.0
        assert_eq!(pipeline.decision_function(&[35.0]).unwrap(), 1.0);
        assert_eq!(pipeline.predict(&[35.0]).unwrap(), 1);
        assert_eq!(pipeline.predict(&[25.0]).unwrap(), 0);
        assert!(pipeline.capabilities().probability);
        assert_eq!(pipeline.name(), "Logistic Regression");
    }

    #[test]
    fn test_pipeline_rejects_wrong_width() {
        let pipeline = Pipeline::new(
            vec![PipelineStep::StandardScaler {
                mean: vec![0.0, 0.0],
                scale: vec![1.0, 1.0],
            }],
            Box::new(LogisticRegressionModel {
                coefficients: vec![1.0, 1.0],
                intercept: 0.0,
                threshold: 0.5,
            }),
        );
        assert!(matches!(
            pipeline.predict(&[1.0]),
            Err(InferenceFailure::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
