//! Book operations for book-based stories.

use quill_core::{ApiError, ApiResult, BookId, FieldErrors, RequestContext};
use quill_domain::validate;
use quill_extract::response::{JsonResponse, NoContent};
use quill_extract::{path_param, ExtractionContext, FromRequest, Json};

use crate::authz;
use crate::dto::{BookResponse, CreateBookRequest, UpdateBookRequest};
use crate::handlers::{log_done, story_id, visible_story, HandlerResponse};
use crate::state::ApiState;

pub(crate) fn book_id(req: &ExtractionContext) -> ApiResult<BookId> {
    path_param(req, "book_id").map_err(|e| ApiError::validation(e.to_string()))
}

/// `GET /stories/{storyId}/books`
pub async fn list_books(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let story = visible_story(&state.store, ctx.caller(), story_id(&req)?)?;
    let books: Vec<BookResponse> = state
        .store
        .books_of_story(story.id)?
        .into_iter()
        .map(BookResponse::from)
        .collect();
    Ok(JsonResponse::new(books).into_response())
}

/// `POST /stories/{storyId}/books`
pub async fn create_book(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<CreateBookRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;
    validate::require_valid_title("title", &body.title)?;

    let book = state.store.insert_book(id, body.title, body.position)?;
    log_done(&ctx, "book created");
    Ok(JsonResponse::created(BookResponse::from(book)).into_response())
}

/// `GET /stories/{storyId}/books/{bookId}`
pub async fn get_book(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let story = visible_story(&state.store, ctx.caller(), story_id(&req)?)?;
    let book = state.store.book(story.id, book_id(&req)?)?;
    Ok(JsonResponse::new(BookResponse::from(book)).into_response())
}

/// `PUT /stories/{storyId}/books/{bookId}`
pub async fn update_book(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    let Json(body) = Json::<UpdateBookRequest>::from_request(&req)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let mut errors = FieldErrors::new();
    if let Some(title) = &body.title {
        validate::validate_title("title", title, &mut errors);
    }
    errors.into_result()?;

    let book = state
        .store
        .update_book(id, book_id(&req)?, body.title, body.position)?;
    log_done(&ctx, "book updated");
    Ok(JsonResponse::new(BookResponse::from(book)).into_response())
}

/// `DELETE /stories/{storyId}/books/{bookId}` — cascades to the book's
/// chapters.
pub async fn delete_book(
    state: ApiState,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HandlerResponse {
    let id = story_id(&req)?;
    authz::require_owner(&ctx, &state.store, id)?;
    state.store.delete_book(id, book_id(&req)?)?;
    log_done(&ctx, "book deleted");
    Ok(NoContent.into_response())
}
