//! Handler registration and dispatch.
//!
//! Handlers are async functions keyed by operation id. The registry erases
//! their concrete types so the server can dispatch any matched route through
//! one call path.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::Response;
use quill_core::{ApiResult, RequestContext};
use quill_extract::ExtractionContext;

use crate::state::ApiState;

/// Boxed future returned by an erased handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ApiResult<Response<Bytes>>> + Send>>;

/// A type-erased handler function.
type ErasedHandler =
    Arc<dyn Fn(ApiState, RequestContext, ExtractionContext) -> HandlerFuture + Send + Sync>;

/// Registry mapping operation ids to handlers.
///
/// # Example
///
/// ```rust
/// use quill_api::HandlerRegistry;
///
/// let registry = HandlerRegistry::new();
/// assert!(registry.is_empty());
/// assert!(registry.get("list_stories").is_none());
/// ```
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, ErasedHandler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler under an operation id.
    pub fn register<F, Fut>(&mut self, operation_id: impl Into<String>, handler: F)
    where
        F: Fn(ApiState, RequestContext, ExtractionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<Response<Bytes>>> + Send + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |state, ctx, req| Box::pin(handler(state, ctx, req)));
        self.handlers.insert(operation_id.into(), erased);
    }

    /// Looks up a handler by operation id.
    #[must_use]
    pub fn get(
        &self,
        operation_id: &str,
    ) -> Option<&(dyn Fn(ApiState, RequestContext, ExtractionContext) -> HandlerFuture + Send + Sync)>
    {
        self.handlers.get(operation_id).map(AsRef::as_ref)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered operation ids, unordered.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
