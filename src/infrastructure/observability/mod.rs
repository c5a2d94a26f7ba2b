//! Observability for riskscan
//!
//! 1. **Prometheus registry**: counters and histograms updated on the request path,
//!    rendered as text on `GET /metrics`.
//! 2. **Structured JSON logs**: periodic snapshot pushed to stdout by the reporter.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
