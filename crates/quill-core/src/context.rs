//! Per-request context.
//!
//! A [`RequestContext`] is constructed by the server for every request and
//! handed to the use-case handler. It carries the correlation id, the matched
//! operation, and the resolved caller identity.

use crate::identity::Caller;
use uuid::Uuid;

/// Context for a single request.
///
/// # Example
///
/// ```
/// use quill_core::{Caller, RequestContext, Role};
///
/// let ctx = RequestContext::new()
///     .with_operation_id("getStory")
///     .with_caller(Caller::user("u1", "Alice", vec![Role::Author]));
///
/// assert_eq!(ctx.operation_id(), Some("getStory"));
/// assert!(ctx.caller().user_id().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id for logs and the error envelope.
    request_id: String,
    /// The matched operation id, once routing has run.
    operation_id: Option<String>,
    /// The resolved caller.
    caller: Caller,
}

impl RequestContext {
    /// Creates a new context with a fresh request id and an anonymous caller.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: format!("req-{}", Uuid::now_v7()),
            operation_id: None,
            caller: Caller::Anonymous,
        }
    }

    /// Sets the operation id.
    #[must_use]
    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Sets the caller.
    #[must_use]
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = caller;
        self
    }

    /// Sets an explicit request id (e.g. one propagated by a client header).
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the operation id, if routing has matched one.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Returns the caller.
    #[must_use]
    pub fn caller(&self) -> &Caller {
        &self.caller
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;

    #[test]
    fn test_new_context_has_request_id() {
        let ctx = RequestContext::new();
        assert!(ctx.request_id().starts_with("req-"));
        assert!(ctx.operation_id().is_none());
        assert_eq!(ctx.caller(), &Caller::Anonymous);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestContext::new();
        let b = RequestContext::new();
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_with_operation_id() {
        let ctx = RequestContext::new().with_operation_id("listStories");
        assert_eq!(ctx.operation_id(), Some("listStories"));
    }

    #[test]
    fn test_with_caller() {
        let ctx =
            RequestContext::new().with_caller(Caller::user("u1", "Alice", vec![Role::Author]));
        assert_eq!(ctx.caller().log_id(), "user:u1");
    }

    #[test]
    fn test_with_request_id() {
        let ctx = RequestContext::new().with_request_id("req-custom");
        assert_eq!(ctx.request_id(), "req-custom");
    }
}
