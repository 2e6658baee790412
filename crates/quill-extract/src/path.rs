//! Path parameter extractor.

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};
use serde::de::DeserializeOwned;
use std::ops::Deref;

/// Extractor for route path parameters.
///
/// `Path<T>` deserializes the parameters captured by the router into `T`.
///
/// # Example
///
/// ```rust
/// use quill_extract::{ExtractionContextBuilder, FromRequest, Path};
/// use http::{Method, Uri};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct ChapterPath {
///     story_id: String,
///     chapter_id: String,
/// }
///
/// let ctx = ExtractionContextBuilder::new()
///     .method(Method::GET)
///     .uri(Uri::from_static("/stories/s-1/chapters/c-2"))
///     .path_param("story_id", "s-1")
///     .path_param("chapter_id", "c-2")
///     .build();
///
/// let Path(path) = Path::<ChapterPath>::from_request(&ctx).unwrap();
/// assert_eq!(path.story_id, "s-1");
/// assert_eq!(path.chapter_id, "c-2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Consumes the Path and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Path<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: DeserializeOwned> FromRequest for Path<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        if ctx.path_params().is_empty() {
            return Err(ExtractionError::missing(
                ExtractionSource::Path,
                "<path parameters>",
            ));
        }

        // Round-trip through urlencoded form so serde handles string-to-type
        // coercion uniformly with the query extractor.
        let encoded: String = ctx
            .path_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let value: T = serde_urlencoded::from_str(&encoded).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Path, e.to_string())
        })?;

        Ok(Path(value))
    }
}

/// Extracts and parses a single path parameter by name.
///
/// # Example
///
/// ```rust
/// use quill_extract::{path_param, ExtractionContextBuilder};
/// use http::{Method, Uri};
///
/// let ctx = ExtractionContextBuilder::new()
///     .method(Method::GET)
///     .uri(Uri::from_static("/chapters/7"))
///     .path_param("position", "7")
///     .build();
///
/// let position: u32 = path_param(&ctx, "position").unwrap();
/// assert_eq!(position, 7);
/// ```
///
/// # Errors
///
/// Returns an error if the parameter is missing or cannot be parsed.
pub fn path_param<T: std::str::FromStr>(
    ctx: &ExtractionContext,
    name: &str,
) -> Result<T, ExtractionError> {
    let value = ctx
        .path_params()
        .get(name)
        .ok_or_else(|| ExtractionError::missing(ExtractionSource::Path, name))?;

    value.parse().map_err(|_| {
        ExtractionError::invalid_value(
            ExtractionSource::Path,
            name,
            format!("failed to parse as {}", std::any::type_name::<T>()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExtractionContextBuilder;
    use http::{Method, Uri};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct StoryPath {
        story_id: String,
    }

    fn ctx_with(name: &str, value: &str) -> ExtractionContext {
        ExtractionContextBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static("/stories/x"))
            .path_param(name, value)
            .build()
    }

    #[test]
    fn test_struct_extraction() {
        let ctx = ctx_with("story_id", "s-1");
        let Path(path) = Path::<StoryPath>::from_request(&ctx).unwrap();
        assert_eq!(path.story_id, "s-1");
    }

    #[test]
    fn test_missing_params() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::GET)
            .uri(Uri::from_static("/stories"))
            .build();
        assert!(Path::<StoryPath>::from_request(&ctx).is_err());
    }

    #[test]
    fn test_path_param_parses() {
        let ctx = ctx_with("position", "42");
        let position: u32 = path_param(&ctx, "position").unwrap();
        assert_eq!(position, 42);
    }

    #[test]
    fn test_path_param_parse_failure() {
        let ctx = ctx_with("position", "not-a-number");
        let result: Result<u32, _> = path_param(&ctx, "position");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_param_missing() {
        let ctx = ctx_with("story_id", "s-1");
        let result: Result<String, _> = path_param(&ctx, "chapter_id");
        assert!(result.is_err());
    }
}
