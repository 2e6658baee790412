//! Response builders.
//!
//! | Builder | Content-Type | Description |
//! |---------|--------------|-------------|
//! | [`JsonResponse`] | `application/json` | JSON serialized response |
//! | [`NoContent`] | N/A | 204 No Content |
//!
//! # Example
//!
//! ```rust
//! use quill_extract::response::JsonResponse;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct StoryCreated {
//!     id: String,
//! }
//!
//! let response = JsonResponse::created(StoryCreated { id: "s-1".into() });
//! assert_eq!(response.status(), http::StatusCode::CREATED);
//! ```

use bytes::Bytes;
use http::{header, Response, StatusCode};
use serde::Serialize;

/// JSON response builder.
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Creates a JSON response with status 201 Created.
    #[must_use]
    pub fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a reference to the data.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Builds the HTTP response.
    ///
    /// # Panics
    ///
    /// Panics if JSON serialization fails, which cannot happen for the
    /// response DTOs this crate serves.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let body = serde_json::to_vec(&self.data).expect("JSON serialization failed");

        Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))
            .expect("failed to build response")
    }
}

/// 204 No Content response.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl NoContent {
    /// Builds the HTTP response.
    ///
    /// # Panics
    ///
    /// Panics if the response builder fails, which cannot happen for a
    /// bodiless response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Bytes::new())
            .expect("failed to build response")
    }
}

/// Builds a JSON error response from pre-serialized envelope bytes.
///
/// # Panics
///
/// Panics if the response builder fails, which cannot happen with a valid
/// status code.
#[must_use]
pub fn json_error(status: StatusCode, body: Bytes) -> Response<Bytes> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .expect("failed to build response")
}
