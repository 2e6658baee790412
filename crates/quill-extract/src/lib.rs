//! Request extractors and response builders for the Quill publishing API.
//!
//! Handlers receive an [`ExtractionContext`] carrying the buffered request,
//! and pull typed values out of it with [`FromRequest`] extractors:
//! [`Path`] for route parameters, [`Query`] for the query string, and
//! [`Json`] for request bodies. Responses go back through the builders in
//! [`response`], and listings are wrapped by [`pagination::Paginated`] with
//! `self`/`next`/`prev` links.
//!
//! # Example
//!
//! ```rust
//! use quill_extract::{ExtractionContextBuilder, FromRequest, Json, Path};
//! use http::{Method, Uri};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct StoryPath {
//!     story_id: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct CreateChapter {
//!     title: String,
//! }
//!
//! let ctx = ExtractionContextBuilder::new()
//!     .method(Method::POST)
//!     .uri(Uri::from_static("/stories/s-1/chapters"))
//!     .path_param("story_id", "s-1")
//!     .body(r#"{"title": "Chapter 1"}"#)
//!     .build();
//!
//! let (Path(path), Json(req)) =
//!     <(Path<StoryPath>, Json<CreateChapter>)>::from_request(&ctx).unwrap();
//! assert_eq!(path.story_id, "s-1");
//! assert_eq!(req.title, "Chapter 1");
//! ```

mod context;
mod error;
mod extractor;
pub mod fields;
mod json;
pub mod pagination;
mod path;
mod query;
pub mod response;

pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{ExtractionError, ExtractionSource};
pub use extractor::FromRequest;
pub use json::Json;
pub use path::{path_param, Path};
pub use query::Query;
