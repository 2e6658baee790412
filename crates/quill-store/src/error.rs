//! Storage error types.

use quill_core::ApiError;
use quill_domain::StructureKind;
use thiserror::Error;

/// Result type alias using [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the storage engine.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A referenced row does not exist.
    #[error("{resource} with ID '{id}' not found")]
    NotFound {
        /// The resource type (e.g. "Story").
        resource: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The operation conflicts with current state (e.g. double publish,
    /// duplicate tag attach on a unique key).
    #[error("{0}")]
    Conflict(String),

    /// An operation was attempted against a story of the wrong structure.
    #[error("story is {actual}; {operation} requires {required}")]
    StructureMismatch {
        /// The story's actual structure.
        actual: StructureKind,
        /// What was attempted.
        operation: &'static str,
        /// The structure the operation requires.
        required: &'static str,
    },

    /// A structure conversion that the transition table does not allow.
    #[error("cannot convert {from} to {to}: {reason}")]
    InvalidTransition {
        /// Current structure.
        from: StructureKind,
        /// Requested structure.
        to: StructureKind,
        /// Why the transition is rejected.
        reason: String,
    },

    /// A pre/postcondition check found state that should be impossible.
    /// The mutation that observed it has been rolled back.
    #[error("store invariant violated: {0}")]
    Corrupted(String),
}

impl StoreError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource, id } => Self::not_found_resource(resource, id),
            StoreError::Conflict(msg) => Self::conflict(msg),
            StoreError::StructureMismatch { .. } | StoreError::InvalidTransition { .. } => {
                Self::conflict(err.to_string())
            }
            StoreError::Corrupted(msg) => Self::internal(msg),
        }
    }
}
