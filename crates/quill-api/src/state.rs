//! Shared state handed to every handler.

use quill_store::Store;

/// State shared across all API handlers. Cheap to clone; the store handle
/// is reference-counted.
#[derive(Debug, Clone, Default)]
pub struct ApiState {
    /// The storage engine.
    pub store: Store,
}

impl ApiState {
    /// Creates state over a fresh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state over an existing store.
    #[must_use]
    pub fn with_store(store: Store) -> Self {
        Self { store }
    }
}
