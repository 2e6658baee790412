//! Tags.

use quill_core::TagId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A tag attachable to stories.
///
/// Tag names are stored normalized: lowercased, trimmed, with interior
/// whitespace runs collapsed to a single `-`. Names are unique in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier.
    pub id: TagId,
    /// Normalized, unique name.
    pub name: String,
}

impl Tag {
    /// Creates a tag with an already-normalized name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::generate(),
            name: name.into(),
        }
    }

    /// Normalizes a raw tag name.
    ///
    /// # Example
    ///
    /// ```
    /// use quill_domain::Tag;
    ///
    /// assert_eq!(Tag::normalize("  Slow   Burn "), "slow-burn");
    /// assert_eq!(Tag::normalize("ROMANCE"), "romance");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        static WHITESPACE: OnceLock<Regex> = OnceLock::new();
        let ws = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"));
        ws.replace_all(raw.trim(), "-").to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(Tag::normalize("Fantasy"), "fantasy");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(Tag::normalize("enemies  to\tlovers"), "enemies-to-lovers");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(Tag::normalize("  angst  "), "angst");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(Tag::normalize("   "), "");
    }
}
