//! Stories and their structure.

use crate::sanitize::Markdown;
use chrono::{DateTime, Utc};
use quill_core::{AuthorId, StoryId, TagId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The structure of a story, including structure-specific state.
///
/// One-shots carry their body inline; chaptered and book-based stories keep
/// their content in the chapter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoryStructure {
    /// A single-body work.
    OneShot {
        /// The sanitized markdown body.
        body: Markdown,
    },
    /// A flat, ordered sequence of chapters.
    Chaptered,
    /// Ordered books, each an ordered sequence of chapters.
    BookBased,
}

impl StoryStructure {
    /// Returns the structure kind without its payload.
    #[must_use]
    pub const fn kind(&self) -> StructureKind {
        match self {
            Self::OneShot { .. } => StructureKind::OneShot,
            Self::Chaptered => StructureKind::Chaptered,
            Self::BookBased => StructureKind::BookBased,
        }
    }
}

/// The kind of a story structure, without structure-specific state.
///
/// Kinds sit on a linear chain (`OneShot ⇄ Chaptered ⇄ BookBased`); the
/// conversion engine only moves between adjacent kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Single-body work.
    OneShot,
    /// Flat chapter sequence.
    Chaptered,
    /// Book/chapter hierarchy.
    BookBased,
}

impl StructureKind {
    /// Position of this kind on the conversion chain.
    #[must_use]
    const fn rank(self) -> u8 {
        match self {
            Self::OneShot => 0,
            Self::Chaptered => 1,
            Self::BookBased => 2,
        }
    }

    /// Returns `true` if `other` is adjacent on the conversion chain.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.rank().abs_diff(other.rank()) == 1
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneShot => f.write_str("one_shot"),
            Self::Chaptered => f.write_str("chaptered"),
            Self::BookBased => f.write_str("book_based"),
        }
    }
}

/// Publication status of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublicationStatus {
    /// Visible only to the author (and admins).
    Draft,
    /// Publicly browsable.
    Published {
        /// When the story was published.
        published_at: DateTime<Utc>,
    },
}

impl PublicationStatus {
    /// Returns `true` if the story is published.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    /// Returns the publication timestamp, if published.
    #[must_use]
    pub const fn published_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Published { published_at } => Some(*published_at),
            Self::Draft => None,
        }
    }
}

/// A story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier.
    pub id: StoryId,
    /// The owning author.
    pub author_id: AuthorId,
    /// Title (validated, non-empty).
    pub title: String,
    /// Optional short summary shown in listings.
    pub summary: Option<String>,
    /// Structure and structure-specific state.
    pub structure: StoryStructure,
    /// Draft/published state.
    pub status: PublicationStatus,
    /// Attached tags.
    pub tags: Vec<TagId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Story {
    /// Creates a new draft story.
    #[must_use]
    pub fn new_draft(
        author_id: AuthorId,
        title: impl Into<String>,
        summary: Option<String>,
        structure: StoryStructure,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::generate(),
            author_id,
            title: title.into(),
            summary,
            structure,
            status: PublicationStatus::Draft,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the structure kind.
    #[must_use]
    pub const fn kind(&self) -> StructureKind {
        self.structure.kind()
    }

    /// Returns `true` if the story is published.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.status.is_published()
    }

    /// Marks the story as touched now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(structure: StoryStructure) -> Story {
        Story::new_draft(AuthorId::from("alice"), "The Lighthouse", None, structure)
    }

    #[test]
    fn test_new_draft_defaults() {
        let story = draft(StoryStructure::Chaptered);
        assert!(!story.is_published());
        assert!(story.tags.is_empty());
        assert_eq!(story.kind(), StructureKind::Chaptered);
        assert_eq!(story.created_at, story.updated_at);
    }

    #[test]
    fn test_adjacency_chain() {
        use StructureKind::{BookBased, Chaptered, OneShot};

        assert!(OneShot.is_adjacent(Chaptered));
        assert!(Chaptered.is_adjacent(OneShot));
        assert!(Chaptered.is_adjacent(BookBased));
        assert!(BookBased.is_adjacent(Chaptered));

        // Skipping a step is not adjacent
        assert!(!OneShot.is_adjacent(BookBased));
        assert!(!BookBased.is_adjacent(OneShot));

        // A kind is never adjacent to itself
        assert!(!Chaptered.is_adjacent(Chaptered));
    }

    #[test]
    fn test_publication_status() {
        let draft = PublicationStatus::Draft;
        assert!(!draft.is_published());
        assert!(draft.published_at().is_none());

        let now = Utc::now();
        let published = PublicationStatus::Published { published_at: now };
        assert!(published.is_published());
        assert_eq!(published.published_at(), Some(now));
    }

    #[test]
    fn test_structure_kind_display() {
        assert_eq!(StructureKind::OneShot.to_string(), "one_shot");
        assert_eq!(StructureKind::Chaptered.to_string(), "chaptered");
        assert_eq!(StructureKind::BookBased.to_string(), "book_based");
    }

    #[test]
    fn test_structure_serde_tagging() {
        let s = StoryStructure::OneShot {
            body: Markdown::sanitize("Once upon a time."),
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"kind\":\"one_shot\""));

        let back: StoryStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn test_kind_roundtrip_serde() {
        let json = serde_json::to_string(&StructureKind::BookBased).unwrap();
        assert_eq!(json, "\"book_based\"");
        let back: StructureKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StructureKind::BookBased);
    }
}
