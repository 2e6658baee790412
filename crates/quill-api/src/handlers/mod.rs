//! Operation handlers, grouped by resource.

pub mod books;
pub mod chapters;
pub mod stories;
pub mod tags;

use bytes::Bytes;
use http::Response;
use quill_core::{ApiError, ApiResult, Caller, RequestContext, StoryId};
use quill_domain::Story;
use quill_extract::{path_param, ExtractionContext};
use quill_store::Store;

use crate::authz;
use crate::dto::StoryResponse;

/// Shorthand for the response type every handler produces.
pub type HandlerResponse = ApiResult<Response<Bytes>>;

/// Extracts the `story_id` path parameter.
pub(crate) fn story_id(req: &ExtractionContext) -> ApiResult<StoryId> {
    path_param(req, "story_id").map_err(|e| ApiError::validation(e.to_string()))
}

/// Fetches a story, enforcing draft visibility: drafts are only visible to
/// their author or an admin, and otherwise indistinguishable from absent.
pub(crate) fn visible_story(
    store: &Store,
    caller: &Caller,
    id: StoryId,
) -> ApiResult<Story> {
    let story = store.story(id)?;
    if !story.is_published() && !authz::can_view_draft(caller, &story.author_id) {
        return Err(ApiError::not_found_resource("Story", id.to_string()));
    }
    Ok(story)
}

/// Projects a story into its response DTO, resolving tag names.
pub(crate) fn story_response(store: &Store, story: Story) -> ApiResult<StoryResponse> {
    let tags = store.tags_of_story(story.id)?;
    Ok(StoryResponse::from_story(story, tags))
}

/// Logs the operation outcome at debug level.
pub(crate) fn log_done(ctx: &RequestContext, detail: &str) {
    tracing::debug!(
        request_id = %ctx.request_id(),
        operation = ctx.operation_id().unwrap_or("unknown"),
        caller = %ctx.caller().log_id(),
        "{detail}"
    );
}
