//! # Quill
//!
//! **A publishing service for serialized fiction.**
//!
//! Authors draft stories as a single piece, a run of chapters, or a set of
//! books with chapters; publish them for readers; and convert between the
//! three structures without losing content. Readers browse published
//! stories with pagination, sorting, search, tag filters, and sparse
//! field selection.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quill::api::ApiState;
//! use quill::server::{AppConfig, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load(None)?;
//!     quill::telemetry::init_telemetry(&config.telemetry)?;
//!     Server::new(config, ApiState::new()).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → TokenTable → Router → ExtractionContext → HandlerRegistry
//!                                                          ↓
//! Response ← ErrorEnvelope ← metrics/logging ← Store ←────┘
//! ```

#![doc(html_root_url = "https://docs.rs/quill/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use quill_core as core;

// Re-export domain types
pub use quill_domain as domain;

// Re-export the storage layer
pub use quill_store as store;

// Re-export router types
pub use quill_router as router;

// Re-export extraction types
pub use quill_extract as extract;

// Re-export the API layer
pub use quill_api as api;

// Re-export the server
pub use quill_server as server;

// Re-export telemetry
pub use quill_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use quill::prelude::*;
/// ```
pub mod prelude {
    pub use quill_core::{
        ApiError, ApiResult, AuthorId, BookId, Caller, ChapterId, RequestContext, Role, StoryId,
    };

    pub use quill_domain::{
        Book, Chapter, Markdown, PublicationStatus, Story, StoryStructure, StructureKind, Tag,
    };

    pub use quill_store::{Page, SortKey, Store, StoryQuery};

    pub use quill_extract::{path_param, ExtractionContext, FromRequest, Json, Path, Query};
    pub use quill_extract::response::{JsonResponse, NoContent};

    pub use quill_api::{routes, ApiState, HandlerRegistry};

    pub use quill_server::{AppConfig, Server, ShutdownSignal};
}
