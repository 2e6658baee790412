//! Authorization checks shared across handlers.
//!
//! Every mutating use case starts with one of these: missing credentials are
//! a 401, a real caller without rights is a 403.

use quill_core::{ApiError, ApiResult, Caller, RequestContext, Role, UserCaller};
use quill_store::Store;

use quill_core::StoryId;

/// Requires an authenticated caller with the author role (admins qualify).
pub fn require_author(ctx: &RequestContext) -> ApiResult<&UserCaller> {
    let user = ctx
        .caller()
        .as_user()
        .ok_or_else(|| ApiError::authentication("authentication required"))?;
    if ctx.caller().has_role(Role::Author) || ctx.caller().is_admin() {
        Ok(user)
    } else {
        Err(ApiError::authorization_for_operation(
            "author role required",
            ctx.operation_id().unwrap_or("unknown"),
        ))
    }
}

/// Requires the caller to own the story or be an admin. Resolves the owner
/// through the store so a missing story surfaces as 404 before any 403.
pub fn require_owner(ctx: &RequestContext, store: &Store, story_id: StoryId) -> ApiResult<()> {
    let author = store.story_author(story_id)?;
    if ctx.caller().as_user().is_none() {
        return Err(ApiError::authentication("authentication required"));
    }
    if ctx.caller().owns_or_admin(&author) {
        Ok(())
    } else {
        Err(ApiError::authorization_for_operation(
            "not the story's author",
            ctx.operation_id().unwrap_or("unknown"),
        ))
    }
}

/// Whether the caller may see a draft belonging to `author`.
pub fn can_view_draft(caller: &Caller, author: &quill_core::AuthorId) -> bool {
    caller.owns_or_admin(author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_domain::StoryStructure;

    fn ctx_with(caller: Caller) -> RequestContext {
        RequestContext::new()
            .with_operation_id("test_op")
            .with_caller(caller)
    }

    fn author_caller(id: &str) -> Caller {
        Caller::user(id, id.to_string(), vec![Role::Author])
    }

    #[test]
    fn test_anonymous_is_authentication_error() {
        let ctx = ctx_with(Caller::anonymous());
        let err = require_author(&ctx).unwrap_err();
        assert!(matches!(err, ApiError::Authentication { .. }));
    }

    #[test]
    fn test_author_passes() {
        let ctx = ctx_with(author_caller("alice"));
        assert!(require_author(&ctx).is_ok());
    }

    #[test]
    fn test_owner_check() {
        let store = Store::new();
        let story = store.create_story("alice".into(), "T", None, StoryStructure::Chaptered);

        let ctx = ctx_with(author_caller("alice"));
        assert!(require_owner(&ctx, &store, story.id).is_ok());

        let ctx = ctx_with(author_caller("bob"));
        let err = require_owner(&ctx, &store, story.id).unwrap_err();
        assert!(matches!(err, ApiError::Authorization { .. }));
    }

    #[test]
    fn test_admin_bypasses_ownership() {
        let store = Store::new();
        let story = store.create_story("alice".into(), "T", None, StoryStructure::Chaptered);

        let ctx = ctx_with(Caller::user("root", "root", vec![Role::Admin]));
        assert!(require_owner(&ctx, &store, story.id).is_ok());
    }

    #[test]
    fn test_missing_story_is_not_found() {
        let store = Store::new();
        let ctx = ctx_with(author_caller("alice"));
        let err = require_owner(&ctx, &store, StoryId::generate()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
