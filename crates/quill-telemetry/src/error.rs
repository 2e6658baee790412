//! Telemetry initialization errors.

use thiserror::Error;

/// Errors raised while bringing telemetry up.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Logging subsystem failed to initialize.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metrics subsystem failed to initialize.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInit(String),
}
