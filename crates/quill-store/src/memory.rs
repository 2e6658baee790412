//! The in-memory table set and the [`Store`] handle.

use parking_lot::RwLock;
use quill_core::{BookId, ChapterId, StoryId, TagId};
use quill_domain::{Book, Chapter, Story, Tag};
use std::collections::HashMap;
use std::sync::Arc;

/// All tables, guarded together by one lock.
#[derive(Debug, Default, Clone)]
pub(crate) struct Tables {
    pub stories: HashMap<StoryId, Story>,
    pub books: HashMap<BookId, Book>,
    pub chapters: HashMap<ChapterId, Chapter>,
    pub tags: HashMap<TagId, Tag>,
}

impl Tables {
    /// Counts chapters belonging to a story.
    pub fn chapter_count(&self, story_id: StoryId) -> usize {
        self.chapters
            .values()
            .filter(|c| c.story_id == story_id)
            .count()
    }

    /// Counts books belonging to a story.
    pub fn book_count(&self, story_id: StoryId) -> usize {
        self.books
            .values()
            .filter(|b| b.story_id == story_id)
            .count()
    }
}

/// Handle to the storage engine.
///
/// Cheap to clone; all clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) inner: Arc<RwLock<Tables>>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a multi-table mutation with snapshot-rollback semantics.
    ///
    /// The closure receives the tables under the write lock. If it returns
    /// an error, every table is restored to its pre-call state before the
    /// error propagates; readers never observe the partial mutation either
    /// way, since the lock is held throughout.
    pub(crate) fn transaction<T, E>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut tables = self.inner.write();
        let snapshot = tables.clone();
        match f(&mut tables) {
            Ok(value) => Ok(value),
            Err(err) => {
                *tables = snapshot;
                Err(err)
            }
        }
    }
}
