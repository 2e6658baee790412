//! Story operations.

use quill_core::{ApiError, FieldErrors, RequestContext};
use quill_domain::validate;
use quill_domain::{Markdown, StoryStructure, StructureKind};
use quill_extract::response::{JsonResponse, NoContent};
use quill_extract::{ExtractionContext, FromRequest, Json, Query};
use quill_store::StoryQuery;

use crate::authz;
use crate::dto::{ConvertRequest, CreateStoryRequest, UpdateStoryRequest};
use crate::handlers::{log_done, story_id, story_response, visible_story, HandlerResponse};
use crate::listing::{envelope, ListParams};
use crate::state::ApiState;

fn validate_story_fields(
    title: &str,
    summary: Option<&str>,
    body: Option<&str>,
) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    validate::validate_title("title", title, &mut errors);
    validate::validate_summary("summary", summary, &mut errors);
    if let Some(body) = body {
        validate::validate_body("body", body, &mut errors);
    }
    errors.into_result()
}

/// `POST /stories`
pub async fn create_story(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let user = authz::require_author(&ctx)?;
    let Json(body) = Json::<CreateStoryRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    validate_story_fields(&body.title, body.summary.as_deref(), body.body.as_deref())?;
    if body.body.is_some() && body.kind != StructureKind::OneShot {
        return Err(ApiError::validation(
            "body is only accepted for one-shot stories",
        ));
    }

    let structure = match body.kind {
        StructureKind::OneShot => StoryStructure::OneShot {
            body: Markdown::sanitize(body.body.as_deref().unwrap_or("")),
        },
        StructureKind::Chaptered => StoryStructure::Chaptered,
        StructureKind::BookBased => StoryStructure::BookBased,
    };

    let story = state.store.create_story(
        user.user_id.clone(),
        body.title,
        body.summary,
        structure,
    );
    log_done(&ctx, "story created");

    let dto = story_response(&state.store, story)?;
    Ok(JsonResponse::created(dto).into_response())
}

/// `GET /stories` — public browse, published only.
pub async fn list_stories(
    state: ApiState,
    _ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let Query(params) = Query::<ListParams>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let (query, selection) = params.into_query(true)?;

    let page = state.store.query_stories(&query);
    let body = envelope(&req, page, &selection, |story| {
        story_response(&state.store, story)
    })?;
    Ok(JsonResponse::new(body).into_response())
}

/// `GET /stories/mine` — the caller's stories, drafts included.
pub async fn list_my_stories(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let user = authz::require_author(&ctx)?;
    let Query(params) = Query::<ListParams>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let (query, selection) = params.into_query(false)?;
    let query = StoryQuery {
        author: Some(user.user_id.clone()),
        ..query
    };

    let page = state.store.query_stories(&query);
    let body = envelope(&req, page, &selection, |story| {
        story_response(&state.store, story)
    })?;
    Ok(JsonResponse::new(body).into_response())
}

/// `GET /stories/{storyId}`
pub async fn get_story(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    let story = visible_story(&state.store, ctx.caller(), id)?;
    let dto = story_response(&state.store, story)?;
    Ok(JsonResponse::new(dto).into_response())
}

/// `PUT /stories/{storyId}`
pub async fn update_story(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<UpdateStoryRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    validate_story_fields(&body.title, body.summary.as_deref(), body.body.as_deref())?;

    let story = state.store.update_story(
        id,
        body.title,
        body.summary,
        body.body.map(|b| Markdown::sanitize(&b)),
    )?;
    log_done(&ctx, "story updated");

    let dto = story_response(&state.store, story)?;
    Ok(JsonResponse::new(dto).into_response())
}

/// `DELETE /stories/{storyId}`
pub async fn delete_story(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    state.store.delete_story(id)?;
    log_done(&ctx, "story deleted");
    Ok(NoContent.into_response())
}

/// `POST /stories/{storyId}/publish`
pub async fn publish_story(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let story = state.store.publish_story(id)?;
    quill_telemetry::metrics::record_publish();
    log_done(&ctx, "story published");
    let dto = story_response(&state.store, story)?;
    Ok(JsonResponse::new(dto).into_response())
}

/// `POST /stories/{storyId}/unpublish`
pub async fn unpublish_story(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let story = state.store.unpublish_story(id)?;
    log_done(&ctx, "story unpublished");
    let dto = story_response(&state.store, story)?;
    Ok(JsonResponse::new(dto).into_response())
}

/// `POST /stories/{storyId}/convert`
pub async fn convert_story(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<ConvertRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let from = state.store.story(id)?.kind();
    let result = state.store.convert_story(id, body.target);
    quill_telemetry::metrics::record_conversion(
        &from.to_string(),
        &body.target.to_string(),
        result.is_ok(),
    );
    let story = result?;
    log_done(&ctx, "story converted");
    let dto = story_response(&state.store, story)?;
    Ok(JsonResponse::new(dto).into_response())
}
