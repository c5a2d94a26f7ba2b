//! Prometheus metrics definitions for riskscan
//!
//! All metrics use the `riskscan_` prefix.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;
use std::time::Instant;

/// Prometheus metrics for the prediction service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    started_at: Instant,
    /// Successful predictions by label
    pub predictions_total: CounterVec,
    /// Failed predictions by error kind
    pub prediction_errors_total: CounterVec,
    /// Time spent inside the model, in seconds
    pub inference_latency_seconds: Histogram,
    /// Model status (0=not loaded, 1=loaded)
    pub model_loaded: GenericGauge<AtomicF64>,
    /// Predictions answered from the memo
    pub cache_hits_total: IntCounter,
    /// Predictions served without a probability
    pub probability_omitted_total: IntCounter,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new("riskscan_predictions_total", "Total predictions by label"),
            &["label"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_errors_total = CounterVec::new(
            Opts::new(
                "riskscan_prediction_errors_total",
                "Total failed predictions by error kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(prediction_errors_total.clone()))?;

        let inference_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "riskscan_inference_latency_seconds",
                "Model inference latency in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0,
            ]),
        )?;
        registry.register(Box::new(inference_latency_seconds.clone()))?;

        let model_loaded = Gauge::with_opts(Opts::new(
            "riskscan_model_loaded",
            "Model status (0=not loaded, 1=loaded)",
        ))?;
        registry.register(Box::new(model_loaded.clone()))?;

        let cache_hits_total = IntCounter::with_opts(Opts::new(
            "riskscan_cache_hits_total",
            "Predictions answered from the result cache",
        ))?;
        registry.register(Box::new(cache_hits_total.clone()))?;

        let probability_omitted_total = IntCounter::with_opts(Opts::new(
            "riskscan_probability_omitted_total",
            "Predictions returned without a probability",
        ))?;
        registry.register(Box::new(probability_omitted_total.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "riskscan_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            started_at: Instant::now(),
            predictions_total,
            prediction_errors_total,
            inference_latency_seconds,
            model_loaded,
            cache_hits_total,
            probability_omitted_total,
            uptime_seconds,
        })
    }

    /// Seconds since the registry was created; refreshes the uptime gauge
    pub fn refresh_uptime(&self) -> u64 {
        let elapsed = self.started_at.elapsed();
        self.uptime_seconds.set(elapsed.as_secs_f64());
        elapsed.as_secs()
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        self.refresh_uptime();
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_predictions(&self, label: i64) {
        let label = label.to_string();
        self.predictions_total
            .with_label_values(&[label.as_str()])
            .inc();
    }

    pub fn inc_errors(&self, kind: &str) {
        self.prediction_errors_total.with_label_values(&[kind]).inc();
    }

    pub fn observe_inference_latency(&self, seconds: f64) {
        self.inference_latency_seconds.observe(seconds);
    }

    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_loaded.set(if loaded { 1.0 } else { 0.0 });
    }

    /// Total predictions recorded for a label
    pub fn predictions_for(&self, label: i64) -> f64 {
        let label = label.to_string();
        self.predictions_total
            .with_label_values(&[label.as_str()])
            .get()
    }

    /// Total errors recorded for a kind
    pub fn errors_for(&self, kind: &str) -> f64 {
        self.prediction_errors_total.with_label_values(&[kind]).get()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create default Metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.set_model_loaded(true);
        assert!(metrics.render().contains("riskscan_model_loaded 1"));
    }

    #[test]
    fn test_prediction_counters() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_predictions(1);
        metrics.inc_predictions(1);
        metrics.inc_predictions(0);
        metrics.inc_errors("model_unavailable");

        assert_eq!(metrics.predictions_for(1), 2.0);
        assert_eq!(metrics.predictions_for(0), 1.0);
        assert_eq!(metrics.errors_for("model_unavailable"), 1.0);

        let output = metrics.render();
        assert!(output.contains("riskscan_predictions_total{label=\"1\"} 2"));
    }

    #[test]
    fn test_render_refreshes_uptime() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        std::thread::sleep(std::time::Duration::from_millis(20));
        metrics.render();
        assert!(metrics.uptime_seconds.get() > 0.0);
    }

    #[test]
    fn test_latency_histogram() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.observe_inference_latency(0.002);
        assert_eq!(metrics.inference_latency_seconds.get_sample_count(), 1);
    }
}
