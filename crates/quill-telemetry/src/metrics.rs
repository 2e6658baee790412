//! Prometheus metrics via the `metrics` crate.
//!
//! The recorder installs globally; the server renders the registry on its
//! `/metrics` route through [`render_metrics`] rather than running a
//! separate exporter listener.
//!
//! Standard metrics:
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `quill_requests_total` | Counter | `operation`, `status` |
//! | `quill_request_duration_seconds` | Histogram | `operation` |
//! | `quill_in_flight_requests` | Gauge | - |
//! | `quill_conversions_total` | Counter | `from`, `to`, `result` |
//! | `quill_stories_published_total` | Counter | - |

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Deserialize;

use crate::error::TelemetryError;
use crate::TelemetryResult;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Initializes the metrics recorder. A no-op when disabled.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(&config.duration_buckets)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();
    Ok(())
}

/// Renders the registry in Prometheus text format, or `None` before init.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        "quill_requests_total",
        "Total number of HTTP requests processed"
    );
    describe_histogram!(
        "quill_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "quill_in_flight_requests",
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(
        "quill_conversions_total",
        "Story structure conversions by source, target, and result"
    );
    describe_counter!(
        "quill_stories_published_total",
        "Stories moved from draft to published"
    );
}

/// Records a completed request against the counter and latency histogram.
pub fn record_request(operation: &str, status_code: u16, duration: Duration) {
    counter!(
        "quill_requests_total",
        "operation" => operation.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        "quill_request_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a structure conversion attempt.
pub fn record_conversion(from: &str, to: &str, succeeded: bool) {
    counter!(
        "quill_conversions_total",
        "from" => from.to_string(),
        "to" => to.to_string(),
        "result" => if succeeded { "ok" } else { "error" }
    )
    .increment(1);
}

/// Records a successful publish.
pub fn record_publish() {
    counter!("quill_stories_published_total").increment(1);
}

/// Guard that tracks an in-flight request, decrementing on drop.
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the in-flight gauge and returns the guard.
    #[must_use]
    pub fn new() -> Self {
        gauge!("quill_in_flight_requests").increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!("quill_in_flight_requests").decrement(1.0);
    }
}
