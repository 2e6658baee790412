//! Story structure conversion.
//!
//! Stories move along a linear chain of structures:
//!
//! ```text
//! OneShot  ⇄  Chaptered  ⇄  BookBased
//! ```
//!
//! Only adjacent transitions are defined. Each one runs inside a single
//! store transaction: row counts are checked before the mutation, the
//! mutation is applied, and the counts are re-checked after. Any violation
//! rolls the snapshot back, so no caller can ever observe a story with (for
//! example) a one-shot structure and leftover chapter rows.

use crate::error::{StoreError, StoreResult};
use crate::memory::{Store, Tables};
use quill_core::StoryId;
use quill_domain::{Book, Chapter, Markdown, Story, StoryStructure, StructureKind};

impl Store {
    /// Converts a story to the target structure.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidTransition`] when the target equals the current
    ///   structure, is not adjacent on the chain, or a guard fails (e.g.
    ///   `Chaptered → OneShot` with more than one chapter).
    /// - [`StoreError::Corrupted`] when a postcondition re-count disagrees
    ///   with the transition table; the story is left untouched.
    pub fn convert_story(&self, story_id: StoryId, target: StructureKind) -> StoreResult<Story> {
        self.transaction(|tables| {
            let story = tables
                .stories
                .get(&story_id)
                .ok_or_else(|| StoreError::not_found("Story", story_id))?
                .clone();
            let from = story.kind();

            if from == target {
                return Err(StoreError::InvalidTransition {
                    from,
                    to: target,
                    reason: "story already has this structure".into(),
                });
            }
            if !from.is_adjacent(target) {
                return Err(StoreError::InvalidTransition {
                    from,
                    to: target,
                    reason: "only adjacent structures can be converted directly".into(),
                });
            }

            match (from, target) {
                (StructureKind::OneShot, StructureKind::Chaptered) => {
                    one_shot_to_chaptered(tables, story)
                }
                (StructureKind::Chaptered, StructureKind::OneShot) => {
                    chaptered_to_one_shot(tables, story)
                }
                (StructureKind::Chaptered, StructureKind::BookBased) => {
                    chaptered_to_book_based(tables, story)
                }
                (StructureKind::BookBased, StructureKind::Chaptered) => {
                    book_based_to_chaptered(tables, story)
                }
                // Adjacency was checked above
                (from, to) => Err(StoreError::InvalidTransition {
                    from,
                    to,
                    reason: "no transition defined".into(),
                }),
            }
        })
        .inspect(|story| {
            tracing::info!(story_id = %story.id, target = %target, "story structure converted");
        })
    }
}

/// Precondition check: exact row counts for the story.
fn require_counts(
    tables: &Tables,
    story_id: StoryId,
    chapters: usize,
    books: usize,
    stage: &str,
) -> StoreResult<()> {
    let actual_chapters = tables.chapter_count(story_id);
    let actual_books = tables.book_count(story_id);
    if actual_chapters == chapters && actual_books == books {
        Ok(())
    } else {
        Err(StoreError::Corrupted(format!(
            "{stage}: expected {chapters} chapters / {books} books, found {actual_chapters} / {actual_books}"
        )))
    }
}

/// Stores the updated story and returns it.
fn commit_story(tables: &mut Tables, mut story: Story, structure: StoryStructure) -> Story {
    story.structure = structure;
    story.touch();
    tables.stories.insert(story.id, story.clone());
    story
}

/// `OneShot → Chaptered`: the body becomes chapter 1.
fn one_shot_to_chaptered(tables: &mut Tables, story: Story) -> StoreResult<Story> {
    let StoryStructure::OneShot { body } = story.structure.clone() else {
        return Err(StoreError::Corrupted(
            "one-shot conversion on a non-one-shot story".into(),
        ));
    };
    require_counts(tables, story.id, 0, 0, "pre: one_shot -> chaptered")?;

    let chapter = Chapter::new(story.id, None, "Chapter 1", body, 1);
    tables.chapters.insert(chapter.id, chapter);
    let story = commit_story(tables, story, StoryStructure::Chaptered);

    require_counts(tables, story.id, 1, 0, "post: one_shot -> chaptered")?;
    Ok(story)
}

/// `Chaptered → OneShot`: the only chapter's body becomes the story body.
fn chaptered_to_one_shot(tables: &mut Tables, story: Story) -> StoreResult<Story> {
    let chapter_count = tables.chapter_count(story.id);
    if chapter_count != 1 {
        return Err(StoreError::InvalidTransition {
            from: StructureKind::Chaptered,
            to: StructureKind::OneShot,
            reason: format!("requires exactly 1 chapter, story has {chapter_count}"),
        });
    }
    require_counts(tables, story.id, 1, 0, "pre: chaptered -> one_shot")?;

    let chapter_id = tables
        .chapters
        .values()
        .find(|c| c.story_id == story.id)
        .map(|c| c.id)
        .ok_or_else(|| StoreError::Corrupted("counted chapter disappeared".into()))?;
    let body = tables
        .chapters
        .remove(&chapter_id)
        .map(|c| c.body)
        .unwrap_or_else(|| Markdown::from_sanitized(""));

    let story = commit_story(tables, story, StoryStructure::OneShot { body });

    require_counts(tables, story.id, 0, 0, "post: chaptered -> one_shot")?;
    Ok(story)
}

/// `Chaptered → BookBased`: every chapter moves into a new "Book 1",
/// preserving order.
fn chaptered_to_book_based(tables: &mut Tables, story: Story) -> StoreResult<Story> {
    let chapter_count = tables.chapter_count(story.id);
    require_counts(tables, story.id, chapter_count, 0, "pre: chaptered -> book_based")?;

    let book = Book::new(story.id, "Book 1", 1);
    let book_id = book.id;
    tables.books.insert(book_id, book);

    for chapter in tables.chapters.values_mut() {
        if chapter.story_id == story.id {
            chapter.book_id = Some(book_id);
        }
    }

    let story = commit_story(tables, story, StoryStructure::BookBased);

    require_counts(tables, story.id, chapter_count, 1, "post: chaptered -> book_based")?;
    if tables
        .chapters
        .values()
        .any(|c| c.story_id == story.id && c.book_id != Some(book_id))
    {
        return Err(StoreError::Corrupted(
            "post: chaptered -> book_based: chapter left outside the new book".into(),
        ));
    }
    Ok(story)
}

/// `BookBased → Chaptered`: the only book's chapters flatten to the story.
fn book_based_to_chaptered(tables: &mut Tables, story: Story) -> StoreResult<Story> {
    let book_count = tables.book_count(story.id);
    if book_count != 1 {
        return Err(StoreError::InvalidTransition {
            from: StructureKind::BookBased,
            to: StructureKind::Chaptered,
            reason: format!("requires exactly 1 book, story has {book_count}"),
        });
    }
    let chapter_count = tables.chapter_count(story.id);
    require_counts(tables, story.id, chapter_count, 1, "pre: book_based -> chaptered")?;

    let book_id = tables
        .books
        .values()
        .find(|b| b.story_id == story.id)
        .map(|b| b.id)
        .ok_or_else(|| StoreError::Corrupted("counted book disappeared".into()))?;
    tables.books.remove(&book_id);

    for chapter in tables.chapters.values_mut() {
        if chapter.story_id == story.id {
            chapter.book_id = None;
        }
    }

    let story = commit_story(tables, story, StoryStructure::Chaptered);

    require_counts(tables, story.id, chapter_count, 0, "post: book_based -> chaptered")?;
    if tables
        .chapters
        .values()
        .any(|c| c.story_id == story.id && c.book_id.is_some())
    {
        return Err(StoreError::Corrupted(
            "post: book_based -> chaptered: chapter still owned by a book".into(),
        ));
    }
    Ok(story)
}
