//! Tag operations.

use quill_core::{ApiError, FieldErrors, RequestContext};
use quill_domain::{validate, Tag};
use quill_extract::response::{JsonResponse, NoContent};
use quill_extract::{path_param, ExtractionContext, FromRequest, Json};

use crate::authz;
use crate::dto::{AttachTagRequest, TagResponse};
use crate::handlers::{log_done, story_id, HandlerResponse};
use crate::state::ApiState;

/// `GET /tags` — every known tag with its story count, sorted by name.
pub async fn list_tags(
    state: ApiState,
    _ctx: RequestContext,
    _req: ExtractionContext,
) -> HandlerResponse {
    let tags: Vec<TagResponse> = state
        .store
        .tags_with_counts()
        .into_iter()
        .map(|(tag, story_count)| TagResponse {
            name: tag.name,
            story_count,
        })
        .collect();
    Ok(JsonResponse::new(tags).into_response())
}

/// `POST /stories/{storyId}/tags`
pub async fn attach_tag(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<AttachTagRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let mut errors = FieldErrors::new();
    validate::validate_tag_name("name", &Tag::normalize(&body.name), &mut errors);
    errors.into_result()?;

    let tag = state.store.attach_tag(id, &body.name)?;
    log_done(&ctx, "tag attached");

    let tags = state.store.tags_of_story(id)?;
    let names: Vec<String> = tags.into_iter().map(|t| t.name).collect();
    tracing::debug!(story_id = %id, tag = %tag.name, "story now carries {} tag(s)", names.len());
    Ok(JsonResponse::created(names).into_response())
}

/// `DELETE /stories/{storyId}/tags/{tagName}`
pub async fn detach_tag(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let name: String =
        path_param(&req, "tag_name").map_err(|e| ApiError::validation(e.to_string()))?;

    state.store.detach_tag(id, &name)?;
    log_done(&ctx, "tag detached");
    Ok(NoContent.into_response())
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

    fn story(state: &ApiState, author: &str) -> StoryId {
        state
            .store
            .create_story(author.into(), "T", None, StoryStructure::Chaptered)
            .id
    }

    fn attach_req(id: StoryId, body: &str) -> ExtractionContext {
        let uri: Uri = format!("/stories/{id}/tags").parse().unwrap();
        ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .path_param("story_id", id.to_string())
            .body(body.to_string())
            .build()
    }

    #[tokio::test]
    async fn test_attach_normalizes_and_lists() {
        let state = ApiState::new();
        let id = story(&state, "alice");

        let response = attach_tag(
            state.clone(),
            author_ctx("alice", "attach_tag"),
            attach_req(id, r#"{"name": "  Slow Burn "}"#),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(json[0], "slow-burn");

        let listed = list_tags(
            state,
            RequestContext::new(),
            ExtractionContextBuilder::new()
                .method(Method::GET)
                .uri(Uri::from_static("/tags"))
                .build(),
        )
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(listed.body()).unwrap();
        assert_eq!(json[0]["name"], "slow-burn");
        assert_eq!(json[0]["story_count"], 1);
    }

    #[tokio::test]
    async fn test_attach_duplicate_is_conflict() {
        let state = ApiState::new();
        let id = story(&state, "alice");
        state.store.attach_tag(id, "romance").unwrap();

        let err = attach_tag(
            state,
            author_ctx("alice", "attach_tag"),
            attach_req(id, r#"{"name": "Romance"}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_attach_blank_name_rejected() {
        let state = ApiState::new();
        let id = story(&state, "alice");

        let err = attach_tag(
            state,
            author_ctx("alice", "attach_tag"),
            attach_req(id, r#"{"name": "   "}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_detach() {
        let state = ApiState::new();
        let id = story(&state, "alice");
        state.store.attach_tag(id, "romance").unwrap();

        let uri: Uri = format!("/stories/{id}/tags/romance").parse().unwrap();
        let response = detach_tag(
            state.clone(),
            author_ctx("alice", "detach_tag"),
            ExtractionContextBuilder::new()
                .method(Method::DELETE)
                .uri(uri)
                .path_param("story_id", id.to_string())
                .path_param("tag_name", "romance")
                .build(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.store.tags_of_story(id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detach_by_non_owner_forbidden() {
        let state = ApiState::new();
        let id = story(&state, "alice");
        state.store.attach_tag(id, "romance").unwrap();

        let uri: Uri = format!("/stories/{id}/tags/romance").parse().unwrap();
        let err = detach_tag(
            state,
            author_ctx("bob", "detach_tag"),
            ExtractionContextBuilder::new()
                .method(Method::DELETE)
                .uri(uri)
                .path_param("story_id", id.to_string())
                .path_param("tag_name", "romance")
                .build(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Authorization { .. }));
    }
}
