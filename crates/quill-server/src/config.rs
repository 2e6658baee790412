//! Application configuration.
//!
//! Configuration loads from an optional JSON file and is then overridden
//! by environment variables of the form `QUILL__SECTION__KEY`, e.g.
//!
//! ```text
//! QUILL__SERVER__HTTP_ADDR=0.0.0.0:9000
//! QUILL__TELEMETRY__LOGGING__LEVEL=debug
//! ```
//!
//! The token table has no environment form; tokens come from the file.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use quill_core::Role;
use quill_telemetry::TelemetryConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "QUILL";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file did not parse as JSON.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override had an unusable value.
    #[error("Invalid value for {key}: {reason}")]
    EnvParse {
        /// The offending variable name.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The final configuration is not usable.
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address, e.g. "0.0.0.0:8080".
    pub http_addr: String,

    /// How long to wait for in-flight connections on shutdown.
    pub shutdown_timeout_secs: u64,

    /// Per-request timeout covering body collection and handler execution.
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            shutdown_timeout_secs: 30,
            request_timeout_secs: 30,
        }
    }
}

impl ServerSettings {
    /// Parses the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.http_addr
            .parse()
            .map_err(|e| ConfigError::Validation(format!("bad http_addr '{}': {e}", self.http_addr)))
    }

    /// Shutdown timeout as a [`Duration`].
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// One entry in the bearer token table.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    /// The bearer token value.
    pub token: String,
    /// User id the token resolves to.
    pub user_id: String,
    /// Display name for logs and projections.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Roles granted to the token.
    pub roles: Vec<Role>,
}

/// Authentication settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Static bearer token table.
    pub tokens: Vec<TokenEntry>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Logging and metrics settings.
    pub telemetry: TelemetryConfig,
    /// Authentication settings.
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Loads configuration: defaults, then the file if given, then
    /// `QUILL__*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                serde_json::from_str(&content)?
            }
            None => Self::default(),
        };

        let overrides: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        for (key, value) in overrides {
            config.apply_env_var(&key, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the assembled configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr().map(|_| ())?;
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        for entry in &self.auth.tokens {
            if entry.token.is_empty() || entry.user_id.is_empty() {
                return Err(ConfigError::Validation(
                    "token entries need a token and a user_id".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Parses the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.socket_addr()
    }

    fn apply_env_var(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(ENV_PREFIX).and_then(|k| k.strip_prefix("__")) else {
            return Ok(());
        };
        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => {
                self.server.http_addr = value.to_string();
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                self.server.shutdown_timeout_secs = parse_env(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_SECS"] => {
                self.server.request_timeout_secs = parse_env(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                self.telemetry.logging.enabled = parse_env_bool(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => {
                self.telemetry.logging.level = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "JSON_FORMAT"] => {
                self.telemetry.logging.json_format = parse_env_bool(key, value)?;
            }
            ["TELEMETRY", "METRICS", "ENABLED"] => {
                self.telemetry.metrics.enabled = parse_env_bool(key, value)?;
            }
            // Unknown QUILL__ variables are ignored so unrelated tooling
            // can share the prefix.
            _ => {}
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::EnvParse {
        key: key.to_string(),
        reason: format!("expected {}", std::any::type_name::<T>()),
    })
}

fn parse_env_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvParse {
            key: key.to_string(),
            reason: "expected boolean".to_string(),
        }),
    }
}
