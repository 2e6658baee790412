//! Bearer token resolution.
//!
//! The server resolves the `Authorization` header into a [`Caller`] before
//! dispatch. No header means anonymous browsing; a present but malformed
//! or unknown token is a 401, never silently anonymous.

use std::collections::HashMap;

use quill_core::{ApiError, ApiResult, Caller};

use crate::config::AuthSettings;

/// Immutable token-to-caller table built at startup.
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    entries: HashMap<String, Caller>,
}

impl TokenTable {
    /// Builds the table from configuration.
    #[must_use]
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let entries = settings
            .tokens
            .iter()
            .map(|entry| {
                let display = entry
                    .display_name
                    .clone()
                    .unwrap_or_else(|| entry.user_id.clone());
                (
                    entry.token.clone(),
                    Caller::user(entry.user_id.as_str(), display, entry.roles.clone()),
                )
            })
            .collect();
        Self { entries }
    }

    /// Number of configured tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves an `Authorization` header value into a caller.
    pub fn resolve(&self, authorization: Option<&str>) -> ApiResult<Caller> {
        let Some(header) = authorization else {
            return Ok(Caller::anonymous());
        };

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::authentication("Authorization header must be 'Bearer <token>'")
            })?;

        self.entries
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::authentication("unknown token"))
    }
}
