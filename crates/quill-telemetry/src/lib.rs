//! Logging and metrics for Quill services.
//!
//! Two subsystems, both optional and both configured from the server's
//! config file:
//!
//! - **Logging**: structured output through `tracing-subscriber`, JSON in
//!   production and pretty-printed in development.
//! - **Metrics**: a Prometheus registry through the `metrics` crate,
//!   rendered by the server's `/metrics` route.
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::default();
//! init_telemetry(&config)?;
//!
//! tracing::info!(operation = "list_stories", "serving");
//! ```

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, render_metrics, InFlightGuard, MetricsConfig};

use serde::Deserialize;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Combined telemetry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Logging configuration.
    pub logging: LogConfig,
    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

/// Initializes logging and metrics in one call.
///
/// # Errors
///
/// Returns a [`TelemetryError`] if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert!(config.logging.enabled);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_config_deserializes_partially() {
        let config: TelemetryConfig =
            serde_json::from_str(r#"{"logging": {"level": "debug"}}"#).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.metrics.enabled);
    }
}
