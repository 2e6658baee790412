//! Field validation rules shared by create and update paths.
//!
//! Rules are applied into a [`FieldErrors`] accumulator so a single response
//! can report every offending field at once.

use quill_core::{ApiResult, FieldErrors};

/// Maximum title length for stories, books, and chapters (chars).
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum story summary length (chars).
pub const MAX_SUMMARY_CHARS: usize = 2000;

/// Maximum markdown body size (bytes).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Maximum normalized tag name length (chars).
pub const MAX_TAG_CHARS: usize = 64;

/// Validates a title field.
pub fn validate_title(field: &str, title: &str, errors: &mut FieldErrors) {
    if title.trim().is_empty() {
        errors.add(field, "must not be empty");
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        errors.add(field, format!("must be at most {MAX_TITLE_CHARS} characters"));
    }
}

/// Validates an optional summary field.
pub fn validate_summary(field: &str, summary: Option<&str>, errors: &mut FieldErrors) {
    if let Some(summary) = summary {
        if summary.chars().count() > MAX_SUMMARY_CHARS {
            errors.add(
                field,
                format!("must be at most {MAX_SUMMARY_CHARS} characters"),
            );
        }
    }
}

/// Validates a markdown body before sanitization.
pub fn validate_body(field: &str, body: &str, errors: &mut FieldErrors) {
    if body.len() > MAX_BODY_BYTES {
        errors.add(field, format!("must be at most {MAX_BODY_BYTES} bytes"));
    }
}

/// Validates an already-normalized tag name.
pub fn validate_tag_name(field: &str, normalized: &str, errors: &mut FieldErrors) {
    if normalized.is_empty() {
        errors.add(field, "must not be empty");
    }
    if normalized.chars().count() > MAX_TAG_CHARS {
        errors.add(field, format!("must be at most {MAX_TAG_CHARS} characters"));
    }
}

/// Convenience for the common single-title case.
pub fn require_valid_title(field: &str, title: &str) -> ApiResult<()> {
    let mut errors = FieldErrors::new();
    validate_title(field, title, &mut errors);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_title() {
        let mut errors = FieldErrors::new();
        validate_title("title", "The Lighthouse", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut errors = FieldErrors::new();
        validate_title("title", "   ", &mut errors);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_long_title_rejected() {
        let mut errors = FieldErrors::new();
        validate_title("title", &"x".repeat(MAX_TITLE_CHARS + 1), &mut errors);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_title_at_limit_accepted() {
        let mut errors = FieldErrors::new();
        validate_title("title", &"x".repeat(MAX_TITLE_CHARS), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_summary_none_accepted() {
        let mut errors = FieldErrors::new();
        validate_summary("summary", None, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_long_summary_rejected() {
        let mut errors = FieldErrors::new();
        validate_summary(
            "summary",
            Some(&"x".repeat(MAX_SUMMARY_CHARS + 1)),
            &mut errors,
        );
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_oversized_body_rejected() {
        let mut errors = FieldErrors::new();
        validate_body("body", &"x".repeat(MAX_BODY_BYTES + 1), &mut errors);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_tag_name_rules() {
        let mut errors = FieldErrors::new();
        validate_tag_name("name", "slow-burn", &mut errors);
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        validate_tag_name("name", "", &mut errors);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        validate_tag_name("name", &"t".repeat(MAX_TAG_CHARS + 1), &mut errors);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_multiple_fields_accumulate() {
        let mut errors = FieldErrors::new();
        validate_title("title", "", &mut errors);
        validate_summary("summary", Some(&"x".repeat(MAX_SUMMARY_CHARS + 1)), &mut errors);
        assert_eq!(errors.len(), 2);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_require_valid_title() {
        assert!(require_valid_title("title", "ok").is_ok());
        assert!(require_valid_title("title", "").is_err());
    }
}
