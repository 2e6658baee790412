//! Core types for the Quill fiction-publishing API.
//!
//! This crate defines the vocabulary shared by every other Quill crate:
//!
//! - [`ApiError`] — the standard error type, with HTTP status mapping and a
//!   serializable JSON envelope.
//! - [`Caller`] — the authenticated (or anonymous) caller of a request.
//! - [`RequestContext`] — per-request metadata threaded through handlers.
//! - Typed identifiers ([`StoryId`], [`BookId`], [`ChapterId`], [`TagId`],
//!   [`AuthorId`]) so that a chapter id can never be passed where a story id
//!   is expected.

pub mod context;
pub mod error;
pub mod id;
pub mod identity;

pub use context::RequestContext;
pub use error::{ApiError, ApiResult, ErrorCategory, ErrorDetail, ErrorEnvelope, FieldErrors};
pub use id::{AuthorId, BookId, ChapterId, StoryId, TagId};
pub use identity::{Caller, Role, UserCaller};
