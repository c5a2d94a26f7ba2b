//! Model artifact loading.
//!
//! An artifact is a JSON document describing a fitted pipeline. It is read once
//! at startup and turned into a [`ModelHandle`] whose capabilities are fixed
//! for the lifetime of the process.

use super::linear_model::{LinearSvmModel, LogisticRegressionModel};
use super::pipeline::{Pipeline, PipelineStep};
use super::predictor::{Capabilities, Classifier, ScoreSource};
use super::smartcore_predictor::{ForestModel, SmartCoreForest};
use crate::domain::errors::ArtifactError;
use crate::domain::ml::{FEATURE_COUNT, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

fn default_condition() -> String {
    "diabetes".to_string()
}

fn default_version() -> String {
    "unversioned".to_string()
}

/// Final estimator of a pipeline, as stored on disk
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorSpec {
    LogisticRegression(LogisticRegressionModel),
    LinearSvm(LinearSvmModel),
    RandomForest { model: ForestModel },
}

impl EstimatorSpec {
    fn dimension(&self) -> Option<usize> {
        match self {
            EstimatorSpec::LogisticRegression(m) => Some(m.dimension()),
            EstimatorSpec::LinearSvm(m) => Some(m.dimension()),
            // smartcore does not expose the fitted width
            EstimatorSpec::RandomForest { .. } => None,
        }
    }

    fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            EstimatorSpec::LogisticRegression(m) => Box::new(m),
            EstimatorSpec::LinearSvm(m) => Box::new(m),
            EstimatorSpec::RandomForest { model } => Box::new(SmartCoreForest::new(model)),
        }
    }
}

/// Serialized pipeline artifact
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_condition")]
    pub condition: String,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub steps: Vec<PipelineStep>,
    pub classifier: EstimatorSpec,
}

impl ModelArtifact {
    /// Check the artifact against the fixed feature contract
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if let Some(names) = &self.feature_names {
            if names.len() != FEATURE_COUNT {
                return Err(ArtifactError::Invalid {
                    reason: format!(
                        "artifact lists {} features, expected {}",
                        names.len(),
                        FEATURE_COUNT
                    ),
                });
            }
            for (index, (found, expected)) in names.iter().zip(FEATURE_NAMES.iter()).enumerate() {
                if found != expected {
                    return Err(ArtifactError::FeatureOrderMismatch {
                        index,
                        expected: expected.to_string(),
                        found: found.clone(),
                    });
                }
            }
        }

        for step in &self.steps {
            step.validate()
                .map_err(|reason| ArtifactError::Invalid { reason })?;
            if step.dimension() != FEATURE_COUNT {
                return Err(ArtifactError::Invalid {
                    reason: format!(
                        "{} expects {} features, expected {}",
                        step.name(),
                        step.dimension(),
                        FEATURE_COUNT
                    ),
                });
            }
        }

        if let Some(dimension) = self.classifier.dimension()
            && dimension != FEATURE_COUNT
        {
            return Err(ArtifactError::Invalid {
                reason: format!(
                    "classifier expects {} features, expected {}",
                    dimension, FEATURE_COUNT
                ),
            });
        }

        Ok(())
    }

    pub fn into_handle(self) -> Result<ModelHandle, ArtifactError> {
        self.validate()?;
        let pipeline = Pipeline::new(self.steps, self.classifier.into_classifier());
        Ok(ModelHandle::new(
            self.name,
            self.version,
            self.condition,
            Arc::new(pipeline),
        ))
    }
}

/// Loaded, read-only model shared by all requests.
#[derive(Clone)]
pub struct ModelHandle {
    name: String,
    version: String,
    condition: String,
    capabilities: Capabilities,
    score_source: ScoreSource,
    classifier: Arc<dyn Classifier>,
}

impl ModelHandle {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        condition: impl Into<String>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        let capabilities = classifier.capabilities();
        Self {
            name: name.into(),
            version: version.into(),
            condition: condition.into(),
            capabilities,
            score_source: ScoreSource::from(capabilities),
            classifier,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn score_source(&self) -> ScoreSource {
        self.score_source
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("condition", &self.condition)
            .field("capabilities", &self.capabilities)
            .field("score_source", &self.score_source)
            .finish()
    }
}

/// Read and validate an artifact without building a handle
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
    artifact.validate()?;
    Ok(artifact)
}

/// Load the model artifact at `path`.
pub fn load_model(path: &Path) -> Result<ModelHandle, ArtifactError> {
    info!("Looking for model at: {}", path.display());
    let artifact = read_artifact(path)?;

    let steps: Vec<&str> = artifact.steps.iter().map(PipelineStep::name).collect();
    let handle = artifact.into_handle()?;

    info!(
        "Model loaded successfully: {} v{} (condition: {})",
        handle.name(),
        handle.version(),
        handle.condition()
    );
    info!(
        "Pipeline steps: {:?} -> {}",
        steps,
        handle.classifier().name()
    );
    info!(
        "Capabilities: {:?}, score source: {:?}",
        handle.capabilities(),
        handle.score_source()
    );
    Ok(handle)
}

/// Load the model, degrading to `None` when the artifact is unusable.
pub fn try_load_model(path: &Path) -> Option<ModelHandle> {
    match load_model(path) {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!("Error loading model: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("riskscan-{}-{}.json", tag, uuid::Uuid::new_v4()))
    }

    fn logistic_artifact() -> serde_json::Value {
        json!({
            "name": "diabetes-risk",
            "version": "1.2.0",
            "feature_names": FEATURE_NAMES,
            "steps": [{"type": "standard_scaler", "mean": vec![0.0; 21], "scale": vec![1.0; 21]}],
            "classifier": {"type": "logistic_regression", "coefficients": vec![0.1; 21], "intercept": -3.0}
        })
    }

    #[test]
    fn test_load_logistic_artifact() {
        let path = temp_path("logistic");
        std::fs::write(&path, logistic_artifact().to_string()).unwrap();

        let handle = load_model(&path).unwrap();
        assert_eq!(handle.name(), "diabetes-risk");
        assert_eq!(handle.version(), "1.2.0");
        assert_eq!(handle.condition(), "diabetes");
        assert_eq!(handle.score_source(), ScoreSource::Probability);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let path = temp_path("missing");
        assert!(matches!(load_model(&path), Err(ArtifactError::NotFound { .. })));
        assert!(try_load_model(&path).is_none());
    }

    #[test]
    fn test_malformed_json() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_model(&path), Err(ArtifactError::Malformed(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_feature_order_mismatch_rejected() {
        let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        names.swap(3, 4);
        let mut artifact = logistic_artifact();
        artifact["feature_names"] = json!(names);

        let artifact: ModelArtifact = serde_json::from_value(artifact).unwrap();
        match artifact.validate() {
            Err(ArtifactError::FeatureOrderMismatch { index, expected, found }) => {
                assert_eq!(index, 3);
                assert_eq!(expected, "bmi");
                assert_eq!(found, "smoker");
            }
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn test_wrong_coefficient_count_rejected() {
        let mut artifact = logistic_artifact();
        artifact["classifier"]["coefficients"] = json!(vec![0.1; 20]);
        let artifact: ModelArtifact = serde_json::from_value(artifact).unwrap();
        assert!(matches!(artifact.validate(), Err(ArtifactError::Invalid { .. })));
    }

    #[test]
    fn test_svm_artifact_uses_decision_score() {
        let artifact: ModelArtifact = serde_json::from_value(json!({
            "name": "svm",
            "condition": "heart disease",
            "classifier": {"type": "linear_svm", "coefficients": vec![0.0; 21], "intercept": 1.0}
        }))
        .unwrap();
        let handle = artifact.into_handle().unwrap();
        assert_eq!(handle.score_source(), ScoreSource::DecisionScore);
        assert_eq!(handle.condition(), "heart disease");
        assert_eq!(handle.version(), "unversioned");
    }

    #[test]
    fn test_forest_artifact_has_no_score() {
        let model = crate::application::ml::smartcore_predictor::tests::fit_forest();
        let artifact = json!({
            "name": "forest",
            "classifier": {"type": "random_forest", "model": serde_json::to_value(&model).unwrap()}
        });
        let artifact: ModelArtifact = serde_json::from_value(artifact).unwrap();
        let handle = artifact.into_handle().unwrap();
        assert_eq!(handle.score_source(), ScoreSource::None);
        let label = handle.classifier().predict(&[0.0; 21]).unwrap();
        assert!(label == 0 || label == 1);
    }
}
