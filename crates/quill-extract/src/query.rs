//! Query string extractor.

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};
use serde::de::DeserializeOwned;
use std::ops::Deref;

/// Extractor for URL query string parameters.
///
/// `Query<T>` deserializes the query string into `T`. Use `Option<T>` fields
/// with `#[serde(default)]` for optional parameters.
///
/// # Example
///
/// ```rust
/// use quill_extract::{ExtractionContextBuilder, FromRequest, Query};
/// use http::{Method, Uri};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct ListQuery {
///     #[serde(default)]
///     page: Option<u32>,
///     #[serde(default)]
///     sort: Option<String>,
///     #[serde(default)]
///     q: Option<String>,
/// }
///
/// let ctx = ExtractionContextBuilder::new()
///     .method(Method::GET)
///     .uri(Uri::from_static("/stories?page=2&sort=-updated_at"))
///     .build();
///
/// let Query(query) = Query::<ListQuery>::from_request(&ctx).unwrap();
/// assert_eq!(query.page, Some(2));
/// assert_eq!(query.sort.as_deref(), Some("-updated_at"));
/// assert_eq!(query.q, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consumes the Query and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromRequest for Query<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        let query_string = ctx.query_string().unwrap_or("");

        let value: T = serde_urlencoded::from_str(query_string).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Query, e.to_string())
        })?;

        Ok(Query(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExtractionContextBuilder;
    use http::{Method, Uri};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct ListQuery {
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        tag: Option<String>,
    }

    fn make_ctx(uri: &'static str) -> ExtractionContext {
        ExtractionContextBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static(uri))
            .build()
    }

    #[test]
    fn test_optional_params() {
        let ctx = make_ctx("/stories?page=3&tag=romance");
        let Query(query) = Query::<ListQuery>::from_request(&ctx).unwrap();
        assert_eq!(query.page, Some(3));
        assert_eq!(query.tag.as_deref(), Some("romance"));
    }

    #[test]
    fn test_no_params() {
        let ctx = make_ctx("/stories");
        let Query(query) = Query::<ListQuery>::from_request(&ctx).unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.tag, None);
    }

    #[test]
    fn test_url_decoding() {
        let ctx = make_ctx("/stories?tag=slow%20burn");
        let Query(query) = Query::<ListQuery>::from_request(&ctx).unwrap();
        assert_eq!(query.tag.as_deref(), Some("slow burn"));
    }

    #[test]
    fn test_invalid_type() {
        let ctx = make_ctx("/stories?page=banana");
        let result = Query::<ListQuery>::from_request(&ctx);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().extraction_source(),
            ExtractionSource::Query
        );
    }
}
