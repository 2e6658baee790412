//! Tag repository operations.
//!
//! Tags are created implicitly on first attach; names are stored normalized
//! and unique. Usage counts are computed from the story table, not stored.

use crate::error::{StoreError, StoreResult};
use crate::memory::Store;
use quill_core::{StoryId, TagId};
use quill_domain::Tag;

impl Store {
    /// Attaches a tag to a story by raw name, creating the tag on first use.
    ///
    /// The name is normalized before lookup. Attaching a tag the story
    /// already carries is a conflict.
    pub fn attach_tag(&self, story_id: StoryId, raw_name: &str) -> StoreResult<Tag> {
        let name = Tag::normalize(raw_name);
        let mut tables = self.inner.write();

        if !tables.stories.contains_key(&story_id) {
            return Err(StoreError::not_found("Story", story_id));
        }

        let tag = match tables.tags.values().find(|t| t.name == name) {
            Some(existing) => existing.clone(),
            None => {
                let tag = Tag::new(name);
                tables.tags.insert(tag.id, tag.clone());
                tag
            }
        };

        let story = tables
            .stories
            .get_mut(&story_id)
            .ok_or_else(|| StoreError::not_found("Story", story_id))?;
        if story.tags.contains(&tag.id) {
            return Err(StoreError::Conflict(format!(
                "tag '{}' is already attached",
                tag.name
            )));
        }
        story.tags.push(tag.id);
        story.touch();

        tracing::debug!(story_id = %story_id, tag = %tag.name, "tag attached");
        Ok(tag)
    }

    /// Detaches a tag from a story by normalized name.
    pub fn detach_tag(&self, story_id: StoryId, name: &str) -> StoreResult<()> {
        let name = Tag::normalize(name);
        let mut tables = self.inner.write();

        let tag_id = tables
            .tags
            .values()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .ok_or_else(|| StoreError::not_found("Tag", &name))?;

        let story = tables
            .stories
            .get_mut(&story_id)
            .ok_or_else(|| StoreError::not_found("Story", story_id))?;

        let before = story.tags.len();
        story.tags.retain(|id| *id != tag_id);
        if story.tags.len() == before {
            return Err(StoreError::not_found("Tag", &name));
        }
        story.touch();
        Ok(())
    }

    /// Returns the tags attached to a story, ordered by name.
    pub fn tags_of_story(&self, story_id: StoryId) -> StoreResult<Vec<Tag>> {
        let tables = self.inner.read();
        let story = tables
            .stories
            .get(&story_id)
            .ok_or_else(|| StoreError::not_found("Story", story_id))?;
        let mut tags: Vec<Tag> = story
            .tags
            .iter()
            .filter_map(|id| tables.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    /// Returns all tags with their usage counts, ordered by name.
    pub fn tags_with_counts(&self) -> Vec<(Tag, usize)> {
        let tables = self.inner.read();
        let mut tags: Vec<(Tag, usize)> = tables
            .tags
            .values()
            .map(|tag| {
                let count = tables
                    .stories
                    .values()
                    .filter(|s| s.tags.contains(&tag.id))
                    .count();
                (tag.clone(), count)
            })
            .collect();
        tags.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));
        tags
    }

    /// Deletes a tag, detaching it from every story that carries it.
    pub fn delete_tag(&self, tag_id: TagId) -> StoreResult<()> {
        let mut tables = self.inner.write();
        if tables.tags.remove(&tag_id).is_none() {
            return Err(StoreError::not_found("Tag", tag_id));
        }
        for story in tables.stories.values_mut() {
            story.tags.retain(|id| *id != tag_id);
        }
        Ok(())
    }

    /// Resolves a normalized tag name to its id.
    pub fn tag_id_by_name(&self, name: &str) -> Option<TagId> {
        let name = Tag::normalize(name);
        self.inner
            .read()
            .tags
            .values()
            .find(|t| t.name == name)
            .map(|t| t.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_domain::StoryStructure;

    fn story(store: &Store) -> StoryId {
        store
            .create_story("alice".into(), "Tagged", None, StoryStructure::Chaptered)
            .id
    }

    #[test]
    fn test_attach_creates_tag() {
        let store = Store::new();
        let story_id = story(&store);

        let tag = store.attach_tag(story_id, "Slow   Burn").unwrap();
        assert_eq!(tag.name, "slow-burn");
        assert!(store.story(story_id).unwrap().tags.contains(&tag.id));
    }

    #[test]
    fn test_attach_reuses_existing_tag() {
        let store = Store::new();
        let a = story(&store);
        let b = story(&store);

        let first = store.attach_tag(a, "fantasy").unwrap();
        let second = store.attach_tag(b, "FANTASY").unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_double_attach_is_conflict() {
        let store = Store::new();
        let story_id = story(&store);

        store.attach_tag(story_id, "angst").unwrap();
        let err = store.attach_tag(story_id, "Angst").unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_detach() {
        let store = Store::new();
        let story_id = story(&store);
        store.attach_tag(story_id, "angst").unwrap();

        store.detach_tag(story_id, "angst").unwrap();
        assert!(store.story(story_id).unwrap().tags.is_empty());

        // Second detach is not found
        assert!(store.detach_tag(story_id, "angst").is_err());
    }

    #[test]
    fn test_counts() {
        let store = Store::new();
        let a = story(&store);
        let b = story(&store);

        store.attach_tag(a, "fantasy").unwrap();
        store.attach_tag(b, "fantasy").unwrap();
        store.attach_tag(b, "angst").unwrap();

        let counts = store.tags_with_counts();
        assert_eq!(counts.len(), 2);
        // Ordered by name
        assert_eq!(counts[0].0.name, "angst");
        assert_eq!(counts[0].1, 1);
        assert_eq!(counts[1].0.name, "fantasy");
        assert_eq!(counts[1].1, 2);
    }

    #[test]
    fn test_delete_tag_detaches_everywhere() {
        let store = Store::new();
        let a = story(&store);
        let tag = store.attach_tag(a, "fantasy").unwrap();

        store.delete_tag(tag.id).unwrap();
        assert!(store.story(a).unwrap().tags.is_empty());
        assert!(store.tags_with_counts().is_empty());
    }

    #[test]
    fn test_tag_id_by_name() {
        let store = Store::new();
        let a = story(&store);
        let tag = store.attach_tag(a, "Slow Burn").unwrap();

        assert_eq!(store.tag_id_by_name("slow-burn"), Some(tag.id));
        assert_eq!(store.tag_id_by_name("Slow Burn"), Some(tag.id));
        assert_eq!(store.tag_id_by_name("missing"), None);
    }
}
