//! Use-case handlers and route table for the Quill publishing API.
//!
//! Every operation is an async handler registered in a [`HandlerRegistry`]
//! under its operation id, and the [`routes::router`] table maps method +
//! path to those ids. The server glue matches a request against the route
//! table, builds an extraction context, and dispatches to the registry.
//!
//! # Example
//!
//! ```rust
//! use quill_api::{routes, ApiState};
//! use http::Method;
//!
//! let router = routes::router();
//! let m = router.match_route(&Method::GET, "/stories").unwrap();
//! assert_eq!(m.operation_id, "list_stories");
//!
//! let registry = routes::registry();
//! assert!(registry.get("list_stories").is_some());
//! ```

mod authz;
pub mod dto;
mod handlers;
mod listing;
mod registry;
pub mod routes;
mod state;

pub use registry::{HandlerFuture, HandlerRegistry};
pub use state::ApiState;
