use crate::application::ml::{ModelHandle, ScoreSource};
use crate::application::prediction_cache::{PredictionCache, cache_key};
use crate::domain::errors::PredictionError;
use crate::domain::ml::{FeatureRecord, PredictionResult, RiskLabel, sigmoid};
use crate::infrastructure::observability::Metrics;
use serde_json::Value;
use std::time::Instant;
use tracing::{error, info, warn};

/// Turns validated feature records into risk predictions.
///
/// Owns the model handle for the lifetime of the process. A service built
/// without a model stays degraded: every call fails with `ModelUnavailable`.
pub struct PredictionService {
    model: Option<ModelHandle>,
    cache: Option<PredictionCache>,
    metrics: Metrics,
}

impl PredictionService {
    pub fn new(model: Option<ModelHandle>, metrics: Metrics) -> Self {
        metrics.set_model_loaded(model.is_some());
        Self {
            model,
            cache: None,
            metrics,
        }
    }

    /// Memoize results for up to `capacity` distinct feature vectors
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = (capacity > 0).then(|| PredictionCache::new(capacity));
        self
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Coerce a raw JSON payload and predict.
    pub fn predict_json(&self, payload: &Value) -> Result<PredictionResult, PredictionError> {
        if self.model.is_none() {
            return Err(self.fail(PredictionError::ModelUnavailable, "model check", payload));
        }
        let record = FeatureRecord::from_json(payload)
            .map_err(|e| self.fail(e, "input coercion", payload))?;
        self.predict(&record)
    }

    /// Error for a request body that could not be parsed at all.
    pub fn malformed_request(&self, reason: &str) -> PredictionError {
        let err = if self.model.is_none() {
            PredictionError::ModelUnavailable
        } else {
            PredictionError::BadInput(format!("Invalid request body: {reason}"))
        };
        self.fail(err, "request parsing", reason)
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictionError> {
        let Some(model) = self.model.as_ref() else {
            return Err(self.fail(PredictionError::ModelUnavailable, "model check", record));
        };

        info!(
            "Received prediction request with data: {}",
            serde_json::to_string(record).unwrap_or_default()
        );

        let features = record.to_vector();
        info!("Input features: {:?}", features);
        info!("Number of features: {}", features.len());

        let key = self.cache.as_ref().map(|_| cache_key(&features));
        if let (Some(cache), Some(key)) = (self.cache.as_ref(), key.as_ref())
            && let Some(hit) = cache.get(key)
        {
            info!("Returning cached result: {:?}", hit);
            self.metrics.cache_hits_total.inc();
            self.metrics.inc_predictions(hit.prediction);
            return Ok(hit);
        }

        let started = Instant::now();
        let label = model
            .classifier()
            .predict(&features)
            .and_then(RiskLabel::try_from)
            .map_err(|e| {
                self.fail(
                    PredictionError::Inference(e.to_string()),
                    "classification",
                    record,
                )
            })?;
        info!("Prediction result: {}", label.as_i64());

        let probability = self.probability(model, &features);
        self.metrics
            .observe_inference_latency(started.elapsed().as_secs_f64());
        info!("Probability result: {:?}", probability);
        if probability.is_none() {
            self.metrics.probability_omitted_total.inc();
        }

        let result = PredictionResult::new(label, model.condition(), probability);
        self.metrics.inc_predictions(result.prediction);
        info!("Returning result: {:?}", result);

        if let (Some(cache), Some(key)) = (self.cache.as_ref(), key) {
            cache.insert(key, result.clone());
        }
        Ok(result)
    }

    /// Confidence for the positive class, or `None` when the model cannot
    /// provide one. Never fails the request.
    fn probability(&self, model: &ModelHandle, features: &[f64]) -> Option<f64> {
        let classifier = model.classifier();
        let score = match model.score_source() {
            ScoreSource::Probability => classifier.predict_proba(features),
            ScoreSource::DecisionScore => {
                classifier.decision_function(features).map(|d| {
                    info!("decision_function result: {}", d);
                    sigmoid(d)
                })
            }
            ScoreSource::None => {
                warn!("No probability calculation method available");
                return None;
            }
        };

        match score {
            Ok(p) if (0.0..=1.0).contains(&p) => Some(p),
            Ok(p) => {
                warn!("Discarding probability outside [0, 1]: {}", p);
                None
            }
            Err(e) => {
                warn!("Error calculating probability: {}", e);
                None
            }
        }
    }

    fn fail<T: serde::Serialize + ?Sized>(
        &self,
        err: PredictionError,
        stage: &str,
        input: &T,
    ) -> PredictionError {
        error!(
            kind = err.kind(),
            stage,
            input = %serde_json::to_string(input).unwrap_or_default(),
            "Prediction failed: {}",
            err
        );
        self.metrics.inc_errors(err.kind());
        err
    }
}
