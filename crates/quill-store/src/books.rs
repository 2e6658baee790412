//! Book repository operations.
//!
//! Books follow the same dense 1-based position discipline as chapters,
//! ordered within their story.

use crate::error::{StoreError, StoreResult};
use crate::memory::{Store, Tables};
use quill_core::{BookId, StoryId};
use quill_domain::{Book, StructureKind};

/// Returns the book ids of a story, ordered by position.
fn ordered_books(tables: &Tables, story_id: StoryId) -> Vec<BookId> {
    let mut ids: Vec<(u32, BookId)> = tables
        .books
        .values()
        .filter(|b| b.story_id == story_id)
        .map(|b| (b.position, b.id))
        .collect();
    ids.sort_unstable();
    ids.into_iter().map(|(_, id)| id).collect()
}

/// Rewrites positions 1..=n over an ordered book id list.
fn renumber(tables: &mut Tables, ordered: &[BookId]) {
    for (index, id) in ordered.iter().enumerate() {
        if let Some(book) = tables.books.get_mut(id) {
            book.position = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }
    }
}

/// Rejects book operations on stories that are not book-based.
fn require_book_based(tables: &Tables, story_id: StoryId) -> StoreResult<()> {
    let story = tables
        .stories
        .get(&story_id)
        .ok_or_else(|| StoreError::not_found("Story", story_id))?;
    if story.kind() == StructureKind::BookBased {
        Ok(())
    } else {
        Err(StoreError::StructureMismatch {
            actual: story.kind(),
            operation: "managing books",
            required: "a book-based story",
        })
    }
}

impl Store {
    /// Inserts a book, appending or at `position` (1-based, clamped).
    pub fn insert_book(
        &self,
        story_id: StoryId,
        title: impl Into<String>,
        position: Option<u32>,
    ) -> StoreResult<Book> {
        let mut tables = self.inner.write();
        require_book_based(&tables, story_id)?;

        let mut ordered = ordered_books(&tables, story_id);
        let index = position.map_or(ordered.len(), |p| {
            (p.saturating_sub(1) as usize).min(ordered.len())
        });

        let book = Book::new(story_id, title, 0);
        ordered.insert(index, book.id);
        tables.books.insert(book.id, book.clone());
        renumber(&mut tables, &ordered);

        if let Some(story) = tables.stories.get_mut(&story_id) {
            story.touch();
        }

        let book = tables.books[&book.id].clone();
        tracing::debug!(story_id = %story_id, book_id = %book.id, position = book.position, "book inserted");
        Ok(book)
    }

    /// Returns the books of a story, ordered.
    pub fn books_of_story(&self, story_id: StoryId) -> StoreResult<Vec<Book>> {
        let tables = self.inner.read();
        require_book_based(&tables, story_id)?;

        let mut books: Vec<Book> = tables
            .books
            .values()
            .filter(|b| b.story_id == story_id)
            .cloned()
            .collect();
        books.sort_by_key(|b| b.position);
        Ok(books)
    }

    /// Fetches a book, checking it belongs to the story.
    pub fn book(&self, story_id: StoryId, book_id: BookId) -> StoreResult<Book> {
        self.inner
            .read()
            .books
            .get(&book_id)
            .filter(|b| b.story_id == story_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Book", book_id))
    }

    /// Updates a book's title and/or position.
    pub fn update_book(
        &self,
        story_id: StoryId,
        book_id: BookId,
        title: Option<String>,
        position: Option<u32>,
    ) -> StoreResult<Book> {
        let mut tables = self.inner.write();
        let book = tables
            .books
            .get_mut(&book_id)
            .filter(|b| b.story_id == story_id)
            .ok_or_else(|| StoreError::not_found("Book", book_id))?;

        if let Some(title) = title {
            book.title = title;
        }
        book.touch();

        if let Some(position) = position {
            let mut ordered = ordered_books(&tables, story_id);
            ordered.retain(|id| *id != book_id);
            let index = (position.saturating_sub(1) as usize).min(ordered.len());
            ordered.insert(index, book_id);
            renumber(&mut tables, &ordered);
        }

        if let Some(story) = tables.stories.get_mut(&story_id) {
            story.touch();
        }
        Ok(tables.books[&book_id].clone())
    }

    /// Deletes a book, cascading to its chapters, and closes the gap.
    pub fn delete_book(&self, story_id: StoryId, book_id: BookId) -> StoreResult<()> {
        let mut tables = self.inner.write();
        if !tables
            .books
            .get(&book_id)
            .is_some_and(|b| b.story_id == story_id)
        {
            return Err(StoreError::not_found("Book", book_id));
        }

        tables.books.remove(&book_id);
        tables.chapters.retain(|_, c| c.book_id != Some(book_id));
        let ordered = ordered_books(&tables, story_id);
        renumber(&mut tables, &ordered);

        if let Some(story) = tables.stories.get_mut(&story_id) {
            story.touch();
        }
        tracing::debug!(story_id = %story_id, book_id = %book_id, "book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_domain::{Markdown, StoryStructure};

    fn saga(store: &Store) -> StoryId {
        store
            .create_story("alice".into(), "Saga", None, StoryStructure::BookBased)
            .id
    }

    #[test]
    fn test_insert_and_order() {
        let store = Store::new();
        let story_id = saga(&store);

        store.insert_book(story_id, "One", None).unwrap();
        store.insert_book(story_id, "Three", None).unwrap();
        let two = store.insert_book(story_id, "Two", Some(2)).unwrap();
        assert_eq!(two.position, 2);

        let titles: Vec<String> = store
            .books_of_story(story_id)
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_books_on_chaptered_story_rejected() {
        let store = Store::new();
        let story = store.create_story("alice".into(), "Flat", None, StoryStructure::Chaptered);

        let err = store.insert_book(story.id, "Nope", None).unwrap_err();
        assert!(matches!(err, StoreError::StructureMismatch { .. }));

        let err = store.books_of_story(story.id).unwrap_err();
        assert!(matches!(err, StoreError::StructureMismatch { .. }));
    }

    #[test]
    fn test_update_and_move() {
        let store = Store::new();
        let story_id = saga(&store);
        let a = store.insert_book(story_id, "A", None).unwrap();
        store.insert_book(story_id, "B", None).unwrap();

        let moved = store
            .update_book(story_id, a.id, Some("A2".into()), Some(2))
            .unwrap();
        assert_eq!(moved.title, "A2");
        assert_eq!(moved.position, 2);
    }

    #[test]
    fn test_delete_cascades_chapters_and_closes_gap() {
        let store = Store::new();
        let story_id = saga(&store);
        let a = store.insert_book(story_id, "A", None).unwrap();
        let b = store.insert_book(story_id, "B", None).unwrap();
        store
            .insert_chapter(story_id, Some(a.id), "1", Markdown::sanitize("..."), None)
            .unwrap();

        store.delete_book(story_id, a.id).unwrap();

        let books = store.books_of_story(story_id).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, b.id);
        assert_eq!(books[0].position, 1);

        // Cascaded chapter is gone
        assert!(store.chapters_of_story(story_id).unwrap().is_empty());
    }

    #[test]
    fn test_book_lookup_scoped_to_story() {
        let store = Store::new();
        let s1 = saga(&store);
        let s2 = saga(&store);
        let book = store.insert_book(s1, "One", None).unwrap();

        assert!(store.book(s1, book.id).is_ok());
        assert!(store.book(s2, book.id).is_err());
    }
}
