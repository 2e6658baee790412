//! Radix tree path matching.

use crate::methods::MethodMap;
use crate::params::Params;

/// Kind of path segment a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    /// Literal segment such as `stories`.
    Static,
    /// Named parameter such as `{story_id}`.
    Param(String),
}

/// A node in the routing tree. Nodes at route boundaries carry a
/// [`MethodMap`]; interior nodes do not.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    segment: String,
    kind: SegmentKind,
    methods: Option<MethodMap>,
    /// Static children, kept sorted by segment for binary search.
    static_children: Vec<Node>,
    /// At most one parameter child per node.
    param_child: Option<Box<Node>>,
}

impl Node {
    fn new_static(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            kind: SegmentKind::Static,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
        }
    }

    fn new_param(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            segment: format!("{{{name}}}"),
            kind: SegmentKind::Param(name),
            methods: None,
            static_children: Vec::new(),
            param_child: None,
        }
    }

    pub(crate) fn root() -> Self {
        Self::new_static("")
    }

    /// Inserts a route pattern, merging method maps when the same path is
    /// registered more than once.
    pub(crate) fn insert(&mut self, path: &str, methods: MethodMap) {
        let segments = parse_path(path);
        self.insert_segments(&segments, methods);
    }

    fn insert_segments(&mut self, segments: &[(String, SegmentKind)], methods: MethodMap) {
        let Some((segment, kind)) = segments.first() else {
            if let Some(existing) = &mut self.methods {
                existing.merge(methods);
            } else {
                self.methods = Some(methods);
            }
            return;
        };
        let remaining = &segments[1..];

        match kind {
            SegmentKind::Static => {
                if let Some(child) = self
                    .static_children
                    .iter_mut()
                    .find(|c| c.segment == *segment)
                {
                    child.insert_segments(remaining, methods);
                } else {
                    let mut child = Node::new_static(segment);
                    child.insert_segments(remaining, methods);
                    self.static_children.push(child);
                    self.static_children
                        .sort_by(|a, b| a.segment.cmp(&b.segment));
                }
            }
            SegmentKind::Param(name) => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::new_param(name)));
                child.insert_segments(remaining, methods);
            }
        }
    }

    /// Matches a request path, returning the method map and extracted
    /// parameters.
    pub(crate) fn match_path(&self, path: &str) -> Option<(&MethodMap, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        self.match_segments(&segments, &mut params)
            .map(|methods| (methods, params))
    }

    fn match_segments<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a MethodMap> {
        let Some(segment) = segments.first() else {
            return self.methods.as_ref();
        };
        let remaining = &segments[1..];

        // Static match wins over parameter capture.
        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                params.push(name.clone(), (*segment).to_string());
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.pop();
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

fn parse_path(path: &str) -> Vec<(String, SegmentKind)> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                (s.to_string(), SegmentKind::Param(name.to_string()))
            } else {
                (s.to_string(), SegmentKind::Static)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_parse_path() {
        let segments = parse_path("/stories/{story_id}/chapters");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].1, SegmentKind::Static);
        assert_eq!(segments[1].1, SegmentKind::Param("story_id".to_string()));
        assert_eq!(segments[2].1, SegmentKind::Static);
    }

    #[test]
    fn test_static_match() {
        let mut root = Node::root();
        root.insert("/tags", MethodMap::new().get("list_tags"));

        let (methods, params) = root.match_path("/tags").unwrap();
        assert_eq!(methods.operation(&Method::GET), Some("list_tags"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_param_match() {
        let mut root = Node::root();
        root.insert("/stories/{story_id}", MethodMap::new().get("get_story"));

        let (_, params) = root.match_path("/stories/abc").unwrap();
        assert_eq!(params.get("story_id"), Some("abc"));
    }

    #[test]
    fn test_static_priority_over_param() {
        let mut root = Node::root();
        root.insert("/tags/popular", MethodMap::new().get("popular_tags"));
        root.insert("/tags/{name}", MethodMap::new().get("get_tag"));

        let (methods, params) = root.match_path("/tags/popular").unwrap();
        assert_eq!(methods.operation(&Method::GET), Some("popular_tags"));
        assert!(params.is_empty());

        let (methods, params) = root.match_path("/tags/romance").unwrap();
        assert_eq!(methods.operation(&Method::GET), Some("get_tag"));
        assert_eq!(params.get("name"), Some("romance"));
    }

    #[test]
    fn test_backtrack_after_static_dead_end() {
        // A static branch that does not terminate must not shadow a
        // parameter branch that does.
        let mut root = Node::root();
        root.insert("/stories/drafts/recent", MethodMap::new().get("recent_drafts"));
        root.insert("/stories/{story_id}", MethodMap::new().get("get_story"));

        let (methods, params) = root.match_path("/stories/drafts").unwrap();
        assert_eq!(methods.operation(&Method::GET), Some("get_story"));
        assert_eq!(params.get("story_id"), Some("drafts"));
    }

    #[test]
    fn test_merge_on_duplicate_path() {
        let mut root = Node::root();
        root.insert("/stories", MethodMap::new().get("list_stories"));
        root.insert("/stories", MethodMap::new().post("create_story"));

        let (methods, _) = root.match_path("/stories").unwrap();
        assert_eq!(methods.operation(&Method::GET), Some("list_stories"));
        assert_eq!(methods.operation(&Method::POST), Some("create_story"));
    }

    #[test]
    fn test_no_match() {
        let mut root = Node::root();
        root.insert("/stories", MethodMap::new().get("list_stories"));
        assert!(root.match_path("/books").is_none());
    }
}
