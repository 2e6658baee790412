//! Request and response DTOs.
//!
//! Responses are projections of the domain types: timestamps serialize as
//! RFC 3339, structure kinds as their snake_case names, and tags as plain
//! names rather than ids.

use chrono::{DateTime, Utc};
use quill_core::{BookId, ChapterId, StoryId};
use quill_domain::{Book, Chapter, Story, StoryStructure, StructureKind, Tag};
use serde::{Deserialize, Serialize};

/// `POST /stories` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStoryRequest {
    /// Story title.
    pub title: String,
    /// Optional summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Structure chosen at creation.
    pub kind: StructureKind,
    /// Initial body; only meaningful for one-shots.
    #[serde(default)]
    pub body: Option<String>,
}

/// `PUT /stories/{storyId}` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStoryRequest {
    /// New title.
    pub title: String,
    /// New summary; `null` clears it.
    #[serde(default)]
    pub summary: Option<String>,
    /// New body; accepted only for one-shots.
    #[serde(default)]
    pub body: Option<String>,
}

/// `POST /stories/{storyId}/convert` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    /// Structure to convert to.
    pub target: StructureKind,
}

/// Chapter create request, used on story- and book-scoped routes.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChapterRequest {
    /// Chapter title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Optional 1-based insert position; appended when absent.
    #[serde(default)]
    pub position: Option<u32>,
}

/// `PUT .../chapters/{chapterId}` request body. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChapterRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New body.
    #[serde(default)]
    pub body: Option<String>,
    /// New 1-based position.
    #[serde(default)]
    pub position: Option<u32>,
}

/// `POST /stories/{storyId}/books` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookRequest {
    /// Book title.
    pub title: String,
    /// Optional 1-based insert position; appended when absent.
    #[serde(default)]
    pub position: Option<u32>,
}

/// `PUT /stories/{storyId}/books/{bookId}` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New 1-based position.
    #[serde(default)]
    pub position: Option<u32>,
}

/// `POST /stories/{storyId}/tags` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachTagRequest {
    /// Tag name; normalized before use.
    pub name: String,
}

/// Hypermedia links on a single resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceLinks {
    /// Canonical path of the resource.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// A story as serialized to clients.
#[derive(Debug, Clone, Serialize)]
pub struct StoryResponse {
    /// Story id.
    pub id: StoryId,
    /// Author id.
    pub author_id: String,
    /// Title.
    pub title: String,
    /// Summary, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Structure kind.
    pub kind: StructureKind,
    /// `draft` or `published`.
    pub status: &'static str,
    /// Publication timestamp, present once published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// One-shot body; absent for other structures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Attached tag names, sorted.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
    /// Hypermedia links.
    pub links: ResourceLinks,
}

/// Field names a `fields=` selection may name on a story.
pub const STORY_FIELDS: &[&str] = &[
    "id",
    "author_id",
    "title",
    "summary",
    "kind",
    "status",
    "published_at",
    "body",
    "tags",
    "created_at",
    "updated_at",
    "links",
];

impl StoryResponse {
    /// Projects a story plus its resolved tags.
    #[must_use]
    pub fn from_story(story: Story, tags: Vec<Tag>) -> Self {
        let body = match &story.structure {
            StoryStructure::OneShot { body } => Some(body.as_str().to_string()),
            _ => None,
        };
        Self {
            id: story.id,
            author_id: story.author_id.to_string(),
            title: story.title,
            summary: story.summary,
            kind: story.structure.kind(),
            status: if story.status.is_published() {
                "published"
            } else {
                "draft"
            },
            published_at: story.status.published_at(),
            body,
            tags: tags.into_iter().map(|t| t.name).collect(),
            created_at: story.created_at,
            updated_at: story.updated_at,
            links: ResourceLinks {
                self_link: format!("/stories/{}", story.id),
            },
        }
    }
}

/// A chapter as serialized to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterResponse {
    /// Chapter id.
    pub id: ChapterId,
    /// Owning story.
    pub story_id: StoryId,
    /// Owning book, for book-based stories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
    /// Title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// 1-based position among siblings.
    pub position: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Chapter> for ChapterResponse {
    fn from(chapter: Chapter) -> Self {
        Self {
            id: chapter.id,
            story_id: chapter.story_id,
            book_id: chapter.book_id,
            title: chapter.title,
            body: chapter.body.as_str().to_string(),
            position: chapter.position,
            created_at: chapter.created_at,
            updated_at: chapter.updated_at,
        }
    }
}

/// A book as serialized to clients.
#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    /// Book id.
    pub id: BookId,
    /// Owning story.
    pub story_id: StoryId,
    /// Title.
    pub title: String,
    /// 1-based position among the story's books.
    pub position: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            story_id: book.story_id,
            title: book.title,
            position: book.position,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// A tag with its usage count.
#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    /// Normalized tag name.
    pub name: String,
    /// Number of stories carrying the tag.
    pub story_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::TagId;
    use quill_domain::Markdown;

    #[test]
    fn test_story_response_one_shot() {
        let story = Story::new_draft(
            "alice".into(),
            "The Lighthouse",
            Some("A story.".to_string()),
            StoryStructure::OneShot {
                body: Markdown::sanitize("Waves."),
            },
        );
        let tag = Tag {
            id: TagId::generate(),
            name: "sea".to_string(),
        };

        let dto = StoryResponse::from_story(story, vec![tag]);
        assert_eq!(dto.status, "draft");
        assert_eq!(dto.kind, StructureKind::OneShot);
        assert_eq!(dto.body.as_deref(), Some("Waves."));
        assert_eq!(dto.tags, vec!["sea"]);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["kind"], "one_shot");
        assert!(json.get("published_at").is_none());
        assert_eq!(json["links"]["self"], format!("/stories/{}", dto.id));
    }

    #[test]
    fn test_story_response_chaptered_has_no_body() {
        let story = Story::new_draft("alice".into(), "Serial", None, StoryStructure::Chaptered);
        let dto = StoryResponse::from_story(story, Vec::new());
        assert_eq!(dto.body, None);

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("body").is_none());
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn test_create_story_request_kind_names() {
        let req: CreateStoryRequest =
            serde_json::from_str(r#"{"title": "T", "kind": "book_based"}"#).unwrap();
        assert_eq!(req.kind, StructureKind::BookBased);
    }

    #[test]
    fn test_story_fields_cover_response() {
        let story = Story::new_draft("alice".into(), "T", None, StoryStructure::Chaptered);
        let json = serde_json::to_value(StoryResponse::from_story(story, Vec::new())).unwrap();
        for key in json.as_object().unwrap().keys() {
            assert!(STORY_FIELDS.contains(&key.as_str()), "unlisted field {key}");
        }
    }
}
