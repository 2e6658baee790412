//! Per-path method dispatch.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to operation ids for a single path.
///
/// Most routes carry one to three methods, so entries are stored inline as
/// `(Method, String)` pairs rather than behind a map allocation.
///
/// # Example
///
/// ```rust
/// use quill_router::MethodMap;
/// use http::Method;
///
/// let map = MethodMap::new().get("list_stories").post("create_story");
/// assert_eq!(map.operation(&Method::GET), Some("list_stories"));
/// assert_eq!(map.operation(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodMap {
    entries: SmallVec<[(Method, String); 3]>,
}

impl MethodMap {
    /// Creates a new empty method map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operation for an arbitrary method. Re-registering a
    /// method replaces the previous operation.
    #[must_use]
    pub fn on(mut self, method: Method, operation_id: impl Into<String>) -> Self {
        let operation_id = operation_id.into();
        if let Some(entry) = self.entries.iter_mut().find(|(m, _)| *m == method) {
            entry.1 = operation_id;
        } else {
            self.entries.push((method, operation_id));
        }
        self
    }

    /// Registers a GET operation.
    #[must_use]
    pub fn get(self, operation_id: impl Into<String>) -> Self {
        self.on(Method::GET, operation_id)
    }

    /// Registers a POST operation.
    #[must_use]
    pub fn post(self, operation_id: impl Into<String>) -> Self {
        self.on(Method::POST, operation_id)
    }

    /// Registers a PUT operation.
    #[must_use]
    pub fn put(self, operation_id: impl Into<String>) -> Self {
        self.on(Method::PUT, operation_id)
    }

    /// Registers a PATCH operation.
    #[must_use]
    pub fn patch(self, operation_id: impl Into<String>) -> Self {
        self.on(Method::PATCH, operation_id)
    }

    /// Registers a DELETE operation.
    #[must_use]
    pub fn delete(self, operation_id: impl Into<String>) -> Self {
        self.on(Method::DELETE, operation_id)
    }

    /// Returns the operation id registered for `method`.
    #[must_use]
    pub fn operation(&self, method: &Method) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, op)| op.as_str())
    }

    /// Merges another map into this one, keeping existing entries on
    /// conflict.
    pub fn merge(&mut self, other: MethodMap) {
        for (method, op) in other.entries {
            if self.operation(&method).is_none() {
                self.entries.push((method, op));
            }
        }
    }

    /// Whether any method is registered.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Methods registered on this path, for building an `Allow` header.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.entries.iter().map(|(m, _)| m.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map() {
        let map = MethodMap::new();
        assert!(!map.has_any_method());
        assert_eq!(map.operation(&Method::GET), None);
    }

    #[test]
    fn test_builder_methods() {
        let map = MethodMap::new()
            .get("get_op")
            .post("post_op")
            .put("put_op")
            .patch("patch_op")
            .delete("delete_op");

        assert_eq!(map.operation(&Method::GET), Some("get_op"));
        assert_eq!(map.operation(&Method::POST), Some("post_op"));
        assert_eq!(map.operation(&Method::PUT), Some("put_op"));
        assert_eq!(map.operation(&Method::PATCH), Some("patch_op"));
        assert_eq!(map.operation(&Method::DELETE), Some("delete_op"));
    }

    #[test]
    fn test_reregister_replaces() {
        let map = MethodMap::new().get("first").get("second");
        assert_eq!(map.operation(&Method::GET), Some("second"));
        assert_eq!(map.allowed_methods().len(), 1);
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut map = MethodMap::new().get("original");
        map.merge(MethodMap::new().get("replacement").post("added"));

        assert_eq!(map.operation(&Method::GET), Some("original"));
        assert_eq!(map.operation(&Method::POST), Some("added"));
    }

    #[test]
    fn test_allowed_methods() {
        let map = MethodMap::new().get("g").delete("d");
        let allowed = map.allowed_methods();
        assert!(allowed.contains(&Method::GET));
        assert!(allowed.contains(&Method::DELETE));
        assert!(!allowed.contains(&Method::POST));
    }
}
