//! Extracted path parameters.

use smallvec::SmallVec;

/// Parameters stored inline; API paths carry at most two.
const INLINE_PARAMS: usize = 2;

/// Path parameters extracted by a route match, as (name, value) pairs.
///
/// # Example
///
/// ```rust
/// use quill_router::Params;
///
/// let mut params = Params::new();
/// params.push("story_id", "s-1");
/// assert_eq!(params.get("story_id"), Some("s-1"));
/// assert_eq!(params.get("chapter_id"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over (name, value) pairs in match order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Drops the most recently pushed parameter. Used for backtracking
    /// during tree matching.
    pub(crate) fn pop(&mut self) {
        self.inner.pop();
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
