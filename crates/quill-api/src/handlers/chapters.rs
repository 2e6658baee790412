//! Chapter operations, on both story- and book-scoped routes.

use quill_core::{ApiError, ApiResult, ChapterId, FieldErrors, RequestContext};
use quill_domain::{validate, Markdown};
use quill_extract::response::{JsonResponse, NoContent};
use quill_extract::{path_param, ExtractionContext, FromRequest, Json};

use crate::authz;
use crate::dto::{ChapterResponse, CreateChapterRequest, UpdateChapterRequest};
use crate::handlers::{log_done, story_id, visible_story, HandlerResponse};
use crate::state::ApiState;

use super::books::book_id;

pub(crate) fn chapter_id(req: &ExtractionContext) -> ApiResult<ChapterId> {
    path_param(req, "chapter_id").map_err(|e| ApiError::validation(e.to_string()))
}

fn validate_chapter(title: &str, body: &str) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    validate::validate_title("title", title, &mut errors);
    validate::validate_body("body", body, &mut errors);
    errors.into_result()
}

/// `GET /stories/{storyId}/chapters`
pub async fn list_chapters(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let story = visible_story(&state.store, ctx.caller(), story_id(&req)?)?;
    let chapters: Vec<ChapterResponse> = state
        .store
        .chapters_of_story(story.id)?
        .into_iter()
        .map(ChapterResponse::from)
        .collect();
    Ok(JsonResponse::new(chapters).into_response())
}

/// `POST /stories/{storyId}/chapters`
pub async fn create_chapter(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<CreateChapterRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_chapter(&body.title, &body.body)?;

    let chapter = state.store.insert_chapter(
        id,
        None,
        body.title,
        Markdown::sanitize(&body.body),
        body.position,
    )?;
    log_done(&ctx, "chapter created");
    Ok(JsonResponse::created(ChapterResponse::from(chapter)).into_response())
}

/// `GET /stories/{storyId}/chapters/{chapterId}`
pub async fn get_chapter(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let story = visible_story(&state.store, ctx.caller(), story_id(&req)?)?;
    let chapter = state.store.chapter(story.id, chapter_id(&req)?)?;
    Ok(JsonResponse::new(ChapterResponse::from(chapter)).into_response())
}

/// `PUT /stories/{storyId}/chapters/{chapterId}`
pub async fn update_chapter(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<UpdateChapterRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let mut errors = FieldErrors::new();
    if let Some(title) = &body.title {
        validate::validate_title("title", title, &mut errors);
    }
    if let Some(text) = &body.body {
        validate::validate_body("body", text, &mut errors);
    }
    errors.into_result()?;

    let chapter = state.store.update_chapter(
        id,
        chapter_id(&req)?,
        body.title,
        body.body.map(|b| Markdown::sanitize(&b)),
        body.position,
    )?;
    log_done(&ctx, "chapter updated");
    Ok(JsonResponse::new(ChapterResponse::from(chapter)).into_response())
}

/// `DELETE /stories/{storyId}/chapters/{chapterId}`
pub async fn delete_chapter(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    state.store.delete_chapter(id, chapter_id(&req)?)?;
    log_done(&ctx, "chapter deleted");
    Ok(NoContent.into_response())
}

/// `GET /stories/{storyId}/books/{bookId}/chapters`
pub async fn list_book_chapters(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let story = visible_story(&state.store, ctx.caller(), story_id(&req)?)?;
    let chapters: Vec<ChapterResponse> = state
        .store
        .chapters_of_book(story.id, book_id(&req)?)?
        .into_iter()
        .map(ChapterResponse::from)
        .collect();
    Ok(JsonResponse::new(chapters).into_response())
}

/// `POST /stories/{storyId}/books/{bookId}/chapters`
pub async fn create_book_chapter(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<CreateChapterRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate_chapter(&body.title, &body.body)?;

    let chapter = state.store.insert_chapter(
        id,
        Some(book_id(&req)?),
        body.title,
        Markdown::sanitize(&body.body),
        body.position,
    )?;
    log_done(&ctx, "chapter created");
    Ok(JsonResponse::created(ChapterResponse::from(chapter)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode, Uri};
    use quill_core::{Caller, Role, StoryId};
    use quill_domain::StoryStructure;
    use quill_extract::ExtractionContextBuilder;

    fn author_ctx(id: &str, op: &str) -> RequestContext {
        RequestContext::new()
            .with_operation_id(op)
            .with_caller(Caller::user(id, id.to_string(), vec![Role::Author]))
    }

    fn chaptered(state: &ApiState, author: &str) -> StoryId {
        state
            .store
            .create_story(author.into(), "Serial", None, StoryStructure::Chaptered)
            .id
    }

    fn post_chapter(id: StoryId, body: &str) -> ExtractionContext {
        let uri: Uri = format!("/stories/{id}/chapters").parse().unwrap();
        ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .path_param("story_id", id.to_string())
            .body(body.to_string())
            .build()
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let state = ApiState::new();
        let id = chaptered(&state, "alice");

        let response = create_chapter(
            state.clone(),
            author_ctx("alice", "create_chapter"),
            post_chapter(id, r#"{"title": "One", "body": "It begins."}"#),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let uri: Uri = format!("/stories/{id}/chapters").parse().unwrap();
        let listed = list_chapters(
            state,
            author_ctx("alice", "list_chapters"),
            ExtractionContextBuilder::new()
                .method(Method::GET)
                .uri(uri)
                .path_param("story_id", id.to_string())
                .build(),
        )
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(listed.body()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["title"], "One");
        assert_eq!(json[0]["position"], 1);
    }

    #[tokio::test]
    async fn test_create_on_one_shot_is_conflict() {
        let state = ApiState::new();
        let story = state.store.create_story(
            "alice".into(),
            "Single",
            None,
            StoryStructure::OneShot {
                body: Markdown::sanitize("All."),
            },
        );

        let err = create_chapter(
            state,
            author_ctx("alice", "create_chapter"),
            post_chapter(story.id, r#"{"title": "One", "body": "..."}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_add_chapters() {
        let state = ApiState::new();
        let id = chaptered(&state, "alice");

        let err = create_chapter(
            state,
            author_ctx("bob", "create_chapter"),
            post_chapter(id, r#"{"title": "One", "body": "..."}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Authorization { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let state = ApiState::new();
        let id = chaptered(&state, "alice");
        let chapter = state
            .store
            .insert_chapter(id, None, "One", Markdown::sanitize("Old."), None)
            .unwrap();

        let uri: Uri = format!("/stories/{id}/chapters/{}", chapter.id).parse().unwrap();
        let updated = update_chapter(
            state.clone(),
            author_ctx("alice", "update_chapter"),
            ExtractionContextBuilder::new()
                .method(Method::PUT)
                .uri(uri.clone())
                .header("content-type", "application/json")
                .path_param("story_id", id.to_string())
                .path_param("chapter_id", chapter.id.to_string())
                .body(r#"{"body": "New."}"#.to_string())
                .build(),
        )
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(updated.body()).unwrap();
        assert_eq!(json["body"], "New.");
        assert_eq!(json["title"], "One");

        let deleted = delete_chapter(
            state.clone(),
            author_ctx("alice", "delete_chapter"),
            ExtractionContextBuilder::new()
                .method(Method::DELETE)
                .uri(uri)
                .path_param("story_id", id.to_string())
                .path_param("chapter_id", chapter.id.to_string())
                .build(),
        )
        .await
        .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        assert!(state.store.chapter(id, chapter.id).is_err());
    }

    #[tokio::test]
    async fn test_book_scoped_create() {
        let state = ApiState::new();
        let story = state
            .store
            .create_story("alice".into(), "Saga", None, StoryStructure::BookBased);
        let book = state.store.insert_book(story.id, "Book 1", None).unwrap();

        let uri: Uri = format!("/stories/{}/books/{}/chapters", story.id, book.id)
            .parse()
            .unwrap();
        let response = create_book_chapter(
            state.clone(),
            author_ctx("alice", "create_book_chapter"),
            ExtractionContextBuilder::new()
                .method(Method::POST)
                .uri(uri.clone())
                .header("content-type", "application/json")
                .path_param("story_id", story.id.to_string())
                .path_param("book_id", book.id.to_string())
                .body(r#"{"title": "1.1", "body": "..."}"#.to_string())
                .build(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let listed = list_book_chapters(
            state,
            author_ctx("alice", "list_book_chapters"),
            ExtractionContextBuilder::new()
                .method(Method::GET)
                .uri(uri)
                .path_param("story_id", story.id.to_string())
                .path_param("book_id", book.id.to_string())
                .build(),
        )
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(listed.body()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
    }
}
