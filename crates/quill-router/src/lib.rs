//! Radix tree request router for the Quill publishing API.
//!
//! Routes are registered as path patterns with per-method operation ids and
//! matched against incoming request paths in O(k) time where k is the number
//! of path segments. Named parameters use brace syntax (`/stories/{story_id}`).
//!
//! # Example
//!
//! ```rust
//! use quill_router::{MethodMap, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert(
//!     "/stories",
//!     MethodMap::new().get("list_stories").post("create_story"),
//! );
//! router.insert("/stories/{story_id}", MethodMap::new().get("get_story"));
//!
//! let matched = router.match_route(&Method::GET, "/stories/abc").unwrap();
//! assert_eq!(matched.operation_id, "get_story");
//! assert_eq!(matched.params.get("story_id"), Some("abc"));
//! ```
//!
//! # Route priority
//!
//! Static segments always win over parameter segments, so `/tags/popular`
//! matches before `/tags/{name}` for the path `/tags/popular`.

mod methods;
mod params;
mod router;
mod tree;

pub use methods::MethodMap;
pub use params::Params;
pub use router::Router;

/// A matched route: the operation id plus extracted path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Operation id registered for the matched method.
    pub operation_id: &'a str,
    /// Extracted path parameters.
    pub params: Params,
}

impl<'a> RouteMatch<'a> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(operation_id: &'a str, params: Params) -> Self {
        Self {
            operation_id,
            params,
        }
    }
}
