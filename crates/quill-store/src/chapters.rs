//! Chapter repository operations, including position maintenance.
//!
//! Chapters are ordered by a 1-based, dense `position` within their parent:
//! the story for chaptered stories, the owning book for book-based stories.
//! Every mutation renumbers the affected sibling run so the invariant holds
//! on exit from every public method.

use crate::error::{StoreError, StoreResult};
use crate::memory::{Store, Tables};
use quill_core::{BookId, ChapterId, StoryId};
use quill_domain::{Chapter, Markdown, StructureKind};

/// Returns sibling chapter ids under the given parent, ordered by position.
fn siblings(tables: &Tables, story_id: StoryId, book_id: Option<BookId>) -> Vec<ChapterId> {
    let mut ids: Vec<(u32, ChapterId)> = tables
        .chapters
        .values()
        .filter(|c| c.story_id == story_id && c.book_id == book_id)
        .map(|c| (c.position, c.id))
        .collect();
    ids.sort_unstable();
    ids.into_iter().map(|(_, id)| id).collect()
}

/// Rewrites positions 1..=n over an ordered id list.
fn renumber(tables: &mut Tables, ordered: &[ChapterId]) {
    for (index, id) in ordered.iter().enumerate() {
        if let Some(chapter) = tables.chapters.get_mut(id) {
            chapter.position = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }
    }
}

/// Validates that a chapter operation fits the story structure and resolves
/// the effective parent book.
fn check_parent(
    tables: &Tables,
    story_id: StoryId,
    book_id: Option<BookId>,
) -> StoreResult<Option<BookId>> {
    let story = tables
        .stories
        .get(&story_id)
        .ok_or_else(|| StoreError::not_found("Story", story_id))?;

    match (story.kind(), book_id) {
        (StructureKind::Chaptered, None) => Ok(None),
        (StructureKind::BookBased, Some(book_id)) => {
            let book = tables
                .books
                .get(&book_id)
                .ok_or_else(|| StoreError::not_found("Book", book_id))?;
            if book.story_id != story_id {
                return Err(StoreError::not_found("Book", book_id));
            }
            Ok(Some(book_id))
        }
        (StructureKind::BookBased, None) => Err(StoreError::StructureMismatch {
            actual: StructureKind::BookBased,
            operation: "adding a chapter directly to the story",
            required: "a chaptered story (book-based chapters live under a book)",
        }),
        (actual, _) => Err(StoreError::StructureMismatch {
            actual,
            operation: "managing chapters",
            required: "a chaptered or book-based story",
        }),
    }
}

impl Store {
    /// Inserts a chapter, appending or at `position` (1-based, clamped to
    /// the end of the sibling run).
    pub fn insert_chapter(
        &self,
        story_id: StoryId,
        book_id: Option<BookId>,
        title: impl Into<String>,
        body: Markdown,
        position: Option<u32>,
    ) -> StoreResult<Chapter> {
        let mut tables = self.inner.write();
        let book_id = check_parent(&tables, story_id, book_id)?;

        let mut ordered = siblings(&tables, story_id, book_id);
        let index = position.map_or(ordered.len(), |p| {
            (p.saturating_sub(1) as usize).min(ordered.len())
        });

        let chapter = Chapter::new(story_id, book_id, title, body, 0);
        ordered.insert(index, chapter.id);
        tables.chapters.insert(chapter.id, chapter.clone());
        renumber(&mut tables, &ordered);

        if let Some(story) = tables.stories.get_mut(&story_id) {
            story.touch();
        }

        let chapter = tables.chapters[&chapter.id].clone();
        tracing::debug!(story_id = %story_id, chapter_id = %chapter.id, position = chapter.position, "chapter inserted");
        Ok(chapter)
    }

    /// Returns all chapters of a story in reading order.
    ///
    /// For book-based stories, chapters are ordered by book position first.
    pub fn chapters_of_story(&self, story_id: StoryId) -> StoreResult<Vec<Chapter>> {
        let tables = self.inner.read();
        let story = tables
            .stories
            .get(&story_id)
            .ok_or_else(|| StoreError::not_found("Story", story_id))?;

        match story.kind() {
            StructureKind::OneShot => Err(StoreError::StructureMismatch {
                actual: StructureKind::OneShot,
                operation: "listing chapters",
                required: "a chaptered or book-based story",
            }),
            StructureKind::Chaptered => {
                let mut chapters: Vec<Chapter> = tables
                    .chapters
                    .values()
                    .filter(|c| c.story_id == story_id)
                    .cloned()
                    .collect();
                chapters.sort_by_key(|c| c.position);
                Ok(chapters)
            }
            StructureKind::BookBased => {
                let mut book_positions: Vec<(u32, BookId)> = tables
                    .books
                    .values()
                    .filter(|b| b.story_id == story_id)
                    .map(|b| (b.position, b.id))
                    .collect();
                book_positions.sort_unstable();

                let mut chapters: Vec<Chapter> = tables
                    .chapters
                    .values()
                    .filter(|c| c.story_id == story_id)
                    .cloned()
                    .collect();
                let book_rank = |id: Option<BookId>| {
                    book_positions
                        .iter()
                        .position(|(_, b)| Some(*b) == id)
                        .unwrap_or(usize::MAX)
                };
                chapters.sort_by_key(|c| (book_rank(c.book_id), c.position));
                Ok(chapters)
            }
        }
    }

    /// Returns the chapters of a single book, ordered.
    pub fn chapters_of_book(&self, story_id: StoryId, book_id: BookId) -> StoreResult<Vec<Chapter>> {
        let tables = self.inner.read();
        let book = tables
            .books
            .get(&book_id)
            .ok_or_else(|| StoreError::not_found("Book", book_id))?;
        if book.story_id != story_id {
            return Err(StoreError::not_found("Book", book_id));
        }

        let mut chapters: Vec<Chapter> = tables
            .chapters
            .values()
            .filter(|c| c.book_id == Some(book_id))
            .cloned()
            .collect();
        chapters.sort_by_key(|c| c.position);
        Ok(chapters)
    }

    /// Fetches a chapter, checking it belongs to the story.
    pub fn chapter(&self, story_id: StoryId, chapter_id: ChapterId) -> StoreResult<Chapter> {
        self.inner
            .read()
            .chapters
            .get(&chapter_id)
            .filter(|c| c.story_id == story_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Chapter", chapter_id))
    }

    /// Updates a chapter's title, body, and/or position.
    ///
    /// A position change reorders the chapter within its current parent;
    /// out-of-range positions clamp to the end.
    pub fn update_chapter(
        &self,
        story_id: StoryId,
        chapter_id: ChapterId,
        title: Option<String>,
        body: Option<Markdown>,
        position: Option<u32>,
    ) -> StoreResult<Chapter> {
        let mut tables = self.inner.write();
        let chapter = tables
            .chapters
            .get_mut(&chapter_id)
            .filter(|c| c.story_id == story_id)
            .ok_or_else(|| StoreError::not_found("Chapter", chapter_id))?;
        let book_id = chapter.book_id;

        if let Some(title) = title {
            chapter.title = title;
        }
        if let Some(body) = body {
            chapter.body = body;
        }
        chapter.touch();

        if let Some(position) = position {
            let mut ordered = siblings(&tables, story_id, book_id);
            ordered.retain(|id| *id != chapter_id);
            let index = (position.saturating_sub(1) as usize).min(ordered.len());
            ordered.insert(index, chapter_id);
            renumber(&mut tables, &ordered);
        }

        if let Some(story) = tables.stories.get_mut(&story_id) {
            story.touch();
        }
        Ok(tables.chapters[&chapter_id].clone())
    }

    /// Deletes a chapter and closes the position gap.
    pub fn delete_chapter(&self, story_id: StoryId, chapter_id: ChapterId) -> StoreResult<()> {
        let mut tables = self.inner.write();
        let chapter = tables
            .chapters
            .get(&chapter_id)
            .filter(|c| c.story_id == story_id)
            .ok_or_else(|| StoreError::not_found("Chapter", chapter_id))?;
        let book_id = chapter.book_id;

        tables.chapters.remove(&chapter_id);
        let ordered = siblings(&tables, story_id, book_id);
        renumber(&mut tables, &ordered);

        if let Some(story) = tables.stories.get_mut(&story_id) {
            story.touch();
        }
        tracing::debug!(story_id = %story_id, chapter_id = %chapter_id, "chapter deleted");
        Ok(())
    }
}
