//! Chapters.

use crate::sanitize::Markdown;
use chrono::{DateTime, Utc};
use quill_core::{BookId, ChapterId, StoryId};
use serde::{Deserialize, Serialize};

/// A chapter of a story.
///
/// For chaptered stories `book_id` is `None` and `position` orders chapters
/// within the story. For book-based stories `book_id` names the owning book
/// and `position` orders chapters within that book. Positions are 1-based and
/// dense; the store maintains that invariant on insert, move, and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Unique identifier.
    pub id: ChapterId,
    /// The story this chapter belongs to.
    pub story_id: StoryId,
    /// The owning book, for book-based stories.
    pub book_id: Option<BookId>,
    /// Chapter title.
    pub title: String,
    /// Sanitized markdown body.
    pub body: Markdown,
    /// 1-based position within the parent (story or book).
    pub position: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Chapter {
    /// Creates a new chapter at the given position.
    #[must_use]
    pub fn new(
        story_id: StoryId,
        book_id: Option<BookId>,
        title: impl Into<String>,
        body: Markdown,
        position: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ChapterId::generate(),
            story_id,
            book_id,
            title: title.into(),
            body,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the chapter as touched now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
