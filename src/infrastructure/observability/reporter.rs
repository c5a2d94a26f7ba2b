//! Push-based metrics reporter for riskscan
//!
//! Periodically outputs prediction metrics as structured JSON to stdout.

use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model_loaded: bool,
    pub predictions: PredictionSnapshot,
}

#[derive(Serialize)]
pub struct PredictionSnapshot {
    pub high_risk: u64,
    pub low_risk: u64,
    pub errors: ErrorSnapshot,
    pub cache_hits: u64,
    pub probability_omitted: u64,
    pub mean_inference_ms: Option<f64>,
}

#[derive(Serialize)]
pub struct ErrorSnapshot {
    pub model_unavailable: u64,
    pub bad_input: u64,
    pub inference_error: u64,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    metrics: Metrics,
    interval: Duration,
}

impl MetricsReporter {
    /// Create a new metrics reporter
    ///
    /// # Arguments
    /// * `metrics` - Prometheus metrics shared with the prediction service
    /// * `interval_seconds` - How often to output metrics (default: 60)
    pub fn new(metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            metrics,
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Use a special prefix so logs can be easily filtered
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Predictions: {} high / {} low | Errors: {} | Uptime: {}s",
                        snapshot.predictions.high_risk,
                        snapshot.predictions.low_risk,
                        snapshot.predictions.errors.model_unavailable
                            + snapshot.predictions.errors.bad_input
                            + snapshot.predictions.errors.inference_error,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    /// Collect current metrics snapshot
    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.metrics.refresh_uptime();

        let latency = &self.metrics.inference_latency_seconds;
        let samples = latency.get_sample_count();
        let mean_inference_ms =
            (samples > 0).then(|| latency.get_sample_sum() / samples as f64 * 1000.0);

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_loaded: self.metrics.model_loaded.get() > 0.0,
            predictions: PredictionSnapshot {
                high_risk: self.metrics.predictions_for(1) as u64,
                low_risk: self.metrics.predictions_for(0) as u64,
                errors: ErrorSnapshot {
                    model_unavailable: self.metrics.errors_for("model_unavailable") as u64,
                    bad_input: self.metrics.errors_for("bad_input") as u64,
                    inference_error: self.metrics.errors_for("inference_error") as u64,
                },
                cache_hits: self.metrics.cache_hits_total.get(),
                probability_omitted: self.metrics.probability_omitted_total.get(),
                mean_inference_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot_collection() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_predictions(1);
        metrics.inc_errors("bad_input");
        metrics.observe_inference_latency(0.004);
        let reporter = MetricsReporter::new(metrics, 60);

        let snapshot = reporter.collect_snapshot();

        assert_eq!(snapshot.predictions.high_risk, 1);
        assert_eq!(snapshot.predictions.low_risk, 0);
        assert_eq!(snapshot.predictions.errors.bad_input, 1);
        assert!((snapshot.predictions.mean_inference_ms.unwrap() - 4.0).abs() < 1e-9);
        assert!(!snapshot.model_loaded);
        assert!(!snapshot.timestamp.is_empty());
    }

    #[test]
    fn test_snapshot_serialization() {
        let reporter = MetricsReporter::new(Metrics::new().unwrap(), 0);
        assert_eq!(reporter.interval, Duration::from_secs(1));

        let json = serde_json::to_string(&reporter.collect_snapshot()).expect("Failed to serialize");
        assert!(json.contains("\"mean_inference_ms\":null"));
        assert!(json.contains("\"model_unavailable\":0"));
    }
}
