//! Books within book-based stories.

use chrono::{DateTime, Utc};
use quill_core::{BookId, StoryId};
use serde::{Deserialize, Serialize};

/// A book within a book-based story.
///
/// Positions are 1-based and dense within the story; the store maintains that
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier.
    pub id: BookId,
    /// The story this book belongs to.
    pub story_id: StoryId,
    /// Book title.
    pub title: String,
    /// 1-based position within the story.
    pub position: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Creates a new book at the given position.
    #[must_use]
    pub fn new(story_id: StoryId, title: impl Into<String>, position: u32) -> Self {
        let now = Utc::now();
        Self {
            id: BookId::generate(),
            story_id,
            title: title.into(),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the book as touched now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book() {
        let story_id = StoryId::generate();
        let book = Book::new(story_id, "Book One", 1);
        assert_eq!(book.story_id, story_id);
        assert_eq!(book.position, 1);
        assert_eq!(book.title, "Book One");
    }
}
