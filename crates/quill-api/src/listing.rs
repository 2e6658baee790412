//! The shared listing query surface.
//!
//! Listing endpoints accept `page`, `page_size`, `sort`, `q`, `tag`, and
//! `fields`. This module parses and validates those into a [`StoryQuery`]
//! plus a [`FieldSelection`], and wraps result pages into the response
//! envelope.

use quill_core::{ApiError, ApiResult, FieldErrors};
use quill_domain::Story;
use quill_extract::fields::FieldSelection;
use quill_extract::pagination::{Links, Paginated};
use quill_extract::ExtractionContext;
use quill_store::{Page, SortKey, StoryQuery, MAX_PAGE_SIZE};
use serde::Deserialize;
use serde_json::Value;

use crate::dto::{StoryResponse, STORY_FIELDS};

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Comma list of sort fields, `-` prefix for descending.
    #[serde(default)]
    pub sort: Option<String>,
    /// Case-insensitive title/summary search.
    #[serde(default)]
    pub q: Option<String>,
    /// Tag name filter.
    #[serde(default)]
    pub tag: Option<String>,
    /// Comma list of response fields to keep.
    #[serde(default)]
    pub fields: Option<String>,
}

impl ListParams {
    /// Validates the parameters into a story query.
    ///
    /// # Errors
    ///
    /// Returns a validation [`ApiError`] for `page_size=0`, unknown sort
    /// fields, or unknown `fields=` names.
    pub fn into_query(self, published_only: bool) -> ApiResult<(StoryQuery, FieldSelection)> {
        let mut field_errors = FieldErrors::new();

        if self.page_size == Some(0) {
            field_errors.add("page_size", "must be at least 1");
        }

        let sort = match &self.sort {
            Some(raw) => match SortKey::parse_list(raw) {
                Ok(keys) => keys,
                Err(message) => {
                    field_errors.add("sort", message);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let mut selection = FieldSelection::parse(self.fields.as_deref());
        for name in selection.names() {
            if !STORY_FIELDS.contains(&name) {
                field_errors.add("fields", format!("unknown field: {name}"));
            }
        }
        if !selection.is_empty() {
            // Responses always identify the object.
            selection.insert("id");
        }

        if !field_errors.is_empty() {
            return Err(ApiError::validation_with_fields(
                "invalid listing parameters",
                field_errors,
            ));
        }

        let query = StoryQuery {
            q: self.q,
            tag: self.tag,
            author: None,
            published_only,
            sort,
            page: self.page.unwrap_or(1).max(1),
            page_size: self.page_size.unwrap_or(quill_store::DEFAULT_PAGE_SIZE),
        };
        Ok((query, selection))
    }
}

/// Wraps a story page into the paginated envelope, resolving tags and
/// applying the field selection.
pub fn envelope(
    req: &ExtractionContext,
    page: Page<Story>,
    selection: &FieldSelection,
    to_response: impl Fn(Story) -> ApiResult<StoryResponse>,
) -> ApiResult<Paginated<Value>> {
    let total_pages = page.total_pages();
    let links = Links::build(req.path(), req.query_string(), page.page, total_pages);

    let mut items = Vec::with_capacity(page.items.len());
    for story in page.items {
        let dto = to_response(story)?;
        let value = serde_json::to_value(dto)
            .map_err(|e| ApiError::internal_with_source("serializing story", e))?;
        items.push(selection.apply(value));
    }

    Ok(Paginated::new(
        items,
        page.total,
        page.page,
        page.page_size,
        total_pages,
        links,
    ))
}

/// Clamp guard shared with the store; exposed for config validation.
pub const PAGE_SIZE_CAP: u32 = MAX_PAGE_SIZE;
