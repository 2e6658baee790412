//! Server entry point.
//!
//! Reads the config path from the first argument or `QUILL_CONFIG`,
//! brings telemetry up, and serves until a shutdown signal.

use std::path::PathBuf;
use std::process::ExitCode;

use quill_api::ApiState;
use quill_server::{AppConfig, Server};

fn config_path() -> Option<PathBuf> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QUILL_CONFIG").ok())
        .map(PathBuf::from)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load(config_path().as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = quill_telemetry::init_telemetry(&config.telemetry) {
        eprintln!("Telemetry error: {e}");
        return ExitCode::FAILURE;
    }

    let server = Server::new(config, ApiState::new());
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
