//! JSON body extractor.

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};
use serde::de::DeserializeOwned;
use std::ops::Deref;

/// Maximum accepted request body (2 MiB, comfortably above the largest
/// allowed chapter body plus JSON overhead).
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Extractor for JSON request bodies.
///
/// # Example
///
/// ```rust
/// use quill_extract::{ExtractionContextBuilder, FromRequest, Json};
/// use http::{Method, Uri};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateStory {
///     title: String,
///     kind: String,
/// }
///
/// let ctx = ExtractionContextBuilder::new()
///     .method(Method::POST)
///     .uri(Uri::from_static("/stories"))
///     .body(r#"{"title": "The Lighthouse", "kind": "one_shot"}"#)
///     .build();
///
/// let Json(req) = Json::<CreateStory>::from_request(&ctx).unwrap();
/// assert_eq!(req.title, "The Lighthouse");
/// ```
///
/// For endpoints where the body is optional, extract `Option<Json<T>>`,
/// which yields `None` on an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consumes the Json and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromRequest for Json<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        let body = ctx.body();

        if body.len() > MAX_BODY_SIZE {
            return Err(ExtractionError::payload_too_large(MAX_BODY_SIZE, body.len()));
        }
        if body.is_empty() {
            return Err(ExtractionError::deserialization_failed(
                ExtractionSource::Body,
                "empty request body",
            ));
        }
        if let Some(ct) = ctx.content_type() {
            let media = ct.split(';').next().unwrap_or(ct).trim();
            if !media.eq_ignore_ascii_case("application/json") {
                return Err(ExtractionError::unsupported_media_type(
                    "application/json",
                    Some(media),
                ));
            }
        }

        let value: T = serde_json::from_slice(body).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())
        })?;

        Ok(Json(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExtractionContextBuilder;
    use http::{Method, Uri};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct CreateStory {
        title: String,
        #[serde(default)]
        summary: Option<String>,
    }

    fn post_ctx(body: &str) -> ExtractionContext {
        ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/stories"))
            .header("content-type", "application/json")
            .body(body.to_string())
            .build()
    }

    #[test]
    fn test_valid_json() {
        let ctx = post_ctx(r#"{"title": "The Lighthouse"}"#);
        let Json(req) = Json::<CreateStory>::from_request(&ctx).unwrap();
        assert_eq!(req.title, "The Lighthouse");
        assert_eq!(req.summary, None);
    }

    #[test]
    fn test_malformed_json() {
        let ctx = post_ctx(r#"{"title": "#);
        assert!(Json::<CreateStory>::from_request(&ctx).is_err());
    }

    #[test]
    fn test_empty_body() {
        let ctx = post_ctx("");
        assert!(Json::<CreateStory>::from_request(&ctx).is_err());
    }

    #[test]
    fn test_optional_json_on_empty_body() {
        let ctx = post_ctx("");
        let extracted = <Option<Json<CreateStory>>>::from_request(&ctx).unwrap();
        assert!(extracted.is_none());
    }

    #[test]
    fn test_wrong_content_type() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/stories"))
            .header("content-type", "text/xml")
            .body(r#"{"title": "x"}"#)
            .build();
        let err = Json::<CreateStory>::from_request(&ctx).unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_content_type_with_charset() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static("/stories"))
            .header("content-type", "application/json; charset=utf-8")
            .body(r#"{"title": "x"}"#)
            .build();
        assert!(Json::<CreateStory>::from_request(&ctx).is_ok());
    }
}
