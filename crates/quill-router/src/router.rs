//! Top-level router API.

use http::Method;

use crate::methods::MethodMap;
use crate::params::Params;
use crate::tree::Node;
use crate::RouteMatch;

/// A radix tree router mapping method + path to operation ids.
///
/// # Example
///
/// ```rust
/// use quill_router::{MethodMap, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.insert(
///     "/stories/{story_id}/publish",
///     MethodMap::new().post("publish_story"),
/// );
///
/// let m = router
///     .match_route(&Method::POST, "/stories/s-1/publish")
///     .unwrap();
/// assert_eq!(m.operation_id, "publish_story");
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    root: Node,
    route_count: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers a path pattern with its method map. Registering the same
    /// path twice merges the maps.
    pub fn insert(&mut self, path: &str, methods: MethodMap) {
        self.root.insert(path, methods);
        self.route_count += 1;
    }

    /// Registers a single-method route.
    pub fn route(&mut self, method: Method, path: &str, operation_id: impl Into<String>) {
        self.insert(path, MethodMap::new().on(method, operation_id));
    }

    /// Matches a method and path, returning the operation id and parameters.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let (methods, params) = self.root.match_path(path)?;
        let operation_id = methods.operation(method)?;
        Some(RouteMatch::new(operation_id, params))
    }

    /// Matches a path regardless of method.
    ///
    /// A `Some` here with a `None` from [`Self::match_route`] means the
    /// method is not allowed; the returned map's
    /// [`MethodMap::allowed_methods`] feeds the `Allow` header of the 405.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodMap, Params)> {
        self.root.match_path(path)
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Whether no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_router() {
        let router = Router::new();
        assert!(router.is_empty());
        assert!(router.match_route(&Method::GET, "/stories").is_none());
    }

    #[test]
    fn test_route_convenience() {
        let mut router = Router::new();
        router.route(Method::GET, "/health", "health_check");

        let m = router.match_route(&Method::GET, "/health").unwrap();
        assert_eq!(m.operation_id, "health_check");
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_method_not_allowed_still_matches_path() {
        let mut router = Router::new();
        router.insert("/stories", MethodMap::new().get("list_stories"));

        assert!(router.match_route(&Method::POST, "/stories").is_none());

        let (methods, _) = router.match_path("/stories").unwrap();
        assert_eq!(methods.allowed_methods(), vec![Method::GET]);
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let mut router = Router::new();
        router.insert("/stories", MethodMap::new().get("list_stories"));

        let m = router.match_route(&Method::GET, "/stories/").unwrap();
        assert_eq!(m.operation_id, "list_stories");
    }

    #[test]
    fn test_root_path() {
        let mut router = Router::new();
        router.insert("/", MethodMap::new().get("index"));

        let m = router.match_route(&Method::GET, "/").unwrap();
        assert_eq!(m.operation_id, "index");
    }

    #[test]
    fn test_full_api_surface() {
        let mut router = Router::new();
        router.insert(
            "/stories",
            MethodMap::new().get("list_stories").post("create_story"),
        );
        router.insert(
            "/stories/{story_id}",
            MethodMap::new()
                .get("get_story")
                .patch("update_story")
                .delete("delete_story"),
        );
        router.insert(
            "/stories/{story_id}/chapters",
            MethodMap::new().get("list_chapters").post("create_chapter"),
        );
        router.insert(
            "/stories/{story_id}/convert",
            MethodMap::new().post("convert_story"),
        );

        let m = router
            .match_route(&Method::PATCH, "/stories/s-1")
            .unwrap();
        assert_eq!(m.operation_id, "update_story");

        let m = router
            .match_route(&Method::POST, "/stories/s-1/convert")
            .unwrap();
        assert_eq!(m.operation_id, "convert_story");
        assert_eq!(m.params.get("story_id"), Some("s-1"));
    }
}
