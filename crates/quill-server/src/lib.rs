//! HTTP server for the Quill publishing API.
//!
//! Wires the route table and handler registry from `quill-api` into a
//! hyper http1 accept loop, resolving bearer tokens from the configured
//! token table and serving `/health`, `/ready`, and `/metrics` alongside
//! the API surface.
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_api::ApiState;
//! use quill_server::{AppConfig, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load(None)?;
//!     quill_telemetry::init_telemetry(&config.telemetry)?;
//!     Server::new(config, ApiState::new()).run().await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod server;
pub mod shutdown;

pub use auth::TokenTable;
pub use config::{AppConfig, ConfigError};
pub use server::{Server, ServerError};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
