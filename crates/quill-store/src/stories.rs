//! Story repository operations.

use crate::error::{StoreError, StoreResult};
use crate::memory::Store;
use chrono::Utc;
use quill_core::{AuthorId, StoryId};
use quill_domain::{Markdown, PublicationStatus, Story, StoryStructure, StructureKind};

impl Store {
    /// Creates a new draft story and returns it.
    pub fn create_story(
        &self,
        author_id: AuthorId,
        title: impl Into<String>,
        summary: Option<String>,
        structure: StoryStructure,
    ) -> Story {
        let story = Story::new_draft(author_id, title, summary, structure);
        self.inner.write().stories.insert(story.id, story.clone());
        tracing::debug!(story_id = %story.id, "story created");
        story
    }

    /// Fetches a story by id.
    pub fn story(&self, id: StoryId) -> StoreResult<Story> {
        self.inner
            .read()
            .stories
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Story", id))
    }

    /// Replaces a story's title and summary, and its body for one-shots.
    ///
    /// `body` must be `None` unless the story is a one-shot.
    pub fn update_story(
        &self,
        id: StoryId,
        title: String,
        summary: Option<String>,
        body: Option<Markdown>,
    ) -> StoreResult<Story> {
        let mut tables = self.inner.write();
        let story = tables
            .stories
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Story", id))?;

        match (&mut story.structure, body) {
            (StoryStructure::OneShot { body: current }, Some(new_body)) => *current = new_body,
            (StoryStructure::OneShot { .. } | StoryStructure::Chaptered | StoryStructure::BookBased, None) => {}
            (_, Some(_)) => {
                return Err(StoreError::StructureMismatch {
                    actual: story.kind(),
                    operation: "updating the story body",
                    required: "a one-shot story",
                });
            }
        }

        story.title = title;
        story.summary = summary;
        story.touch();
        Ok(story.clone())
    }

    /// Deletes a story, cascading to its books and chapters.
    pub fn delete_story(&self, id: StoryId) -> StoreResult<()> {
        let mut tables = self.inner.write();
        if tables.stories.remove(&id).is_none() {
            return Err(StoreError::not_found("Story", id));
        }
        tables.books.retain(|_, b| b.story_id != id);
        tables.chapters.retain(|_, c| c.story_id != id);
        tracing::debug!(story_id = %id, "story deleted");
        Ok(())
    }

    /// Publishes a story.
    ///
    /// Re-publishing is a conflict, as is publishing a chaptered or
    /// book-based story with no chapters.
    pub fn publish_story(&self, id: StoryId) -> StoreResult<Story> {
        let mut tables = self.inner.write();
        let chapter_count = tables.chapter_count(id);
        let story = tables
            .stories
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Story", id))?;

        if story.is_published() {
            return Err(StoreError::Conflict("story is already published".into()));
        }
        if story.kind() != StructureKind::OneShot && chapter_count == 0 {
            return Err(StoreError::Conflict(
                "cannot publish a story with no chapters".into(),
            ));
        }

        story.status = PublicationStatus::Published {
            published_at: Utc::now(),
        };
        story.touch();
        tracing::info!(story_id = %id, "story published");
        Ok(story.clone())
    }

    /// Reverts a story to draft.
    pub fn unpublish_story(&self, id: StoryId) -> StoreResult<Story> {
        let mut tables = self.inner.write();
        let story = tables
            .stories
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Story", id))?;

        if !story.is_published() {
            return Err(StoreError::Conflict("story is not published".into()));
        }

        story.status = PublicationStatus::Draft;
        story.touch();
        tracing::info!(story_id = %id, "story unpublished");
        Ok(story.clone())
    }

    /// Returns the author id of a story without cloning it.
    pub fn story_author(&self, id: StoryId) -> StoreResult<AuthorId> {
        self.inner
            .read()
            .stories
            .get(&id)
            .map(|s| s.author_id.clone())
            .ok_or_else(|| StoreError::not_found("Story", id))
    }
}
