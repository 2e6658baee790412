//! Extraction failures.

use http::StatusCode;
use std::fmt;

/// Where in the request an extraction was reading from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Route path parameters.
    Path,
    /// Query string parameters.
    Query,
    /// Request body.
    Body,
    /// HTTP headers.
    Header,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::Header => write!(f, "header"),
        }
    }
}

/// An extraction failure, carrying enough to build a client-facing 4xx.
///
/// # Example
///
/// ```rust
/// use quill_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::missing(ExtractionSource::Path, "story_id");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert!(err.to_string().contains("story_id"));
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    source: ExtractionSource,
    kind: ErrorKind,
    field: Option<String>,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    Missing,
    InvalidValue,
    DeserializationFailed,
    PayloadTooLarge,
    UnsupportedMediaType,
}

impl ExtractionError {
    /// A required parameter was absent.
    #[must_use]
    pub fn missing(source: ExtractionSource, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            source,
            kind: ErrorKind::Missing,
            message: format!("missing required {source} parameter: {field}"),
            field: Some(field),
        }
    }

    /// A parameter was present but unusable.
    #[must_use]
    pub fn invalid_value(
        source: ExtractionSource,
        field: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            source,
            kind: ErrorKind::InvalidValue,
            message: format!("invalid {source} parameter '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Deserializing the source failed as a whole.
    #[must_use]
    pub fn deserialization_failed(source: ExtractionSource, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            source,
            kind: ErrorKind::DeserializationFailed,
            message: format!("failed to deserialize {source}: {error}"),
            field: None,
        }
    }

    /// Body exceeded the configured limit.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            source: ExtractionSource::Body,
            kind: ErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
            field: None,
        }
    }

    /// Content-Type did not match what the endpoint accepts.
    #[must_use]
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual_str = actual.unwrap_or("none");
        Self {
            source: ExtractionSource::Header,
            kind: ErrorKind::UnsupportedMediaType,
            message: format!("unsupported content type: expected '{expected}', got '{actual_str}'"),
            field: None,
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.source
    }

    /// Returns the field name if the failure names one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// HTTP status code for this failure.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Missing | ErrorKind::InvalidValue | ErrorKind::DeserializationFailed => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Machine-readable error code for the error envelope.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Missing => "MISSING_PARAMETER",
            ErrorKind::InvalidValue => "INVALID_PARAMETER",
            ErrorKind::DeserializationFailed => "DESERIALIZATION_FAILED",
            ErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}
