//! Sparse field selection.
//!
//! Clients may pass `fields=id,title,status` on listing and fetch endpoints
//! to trim response objects down to the named fields. Shaping happens on the
//! serialized JSON value, so it works uniformly across resource types.

use indexmap::IndexSet;
use serde_json::Value;

/// A parsed `fields=` selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    names: IndexSet<String>,
}

impl FieldSelection {
    /// Parses a comma-separated field list. `None` or an all-whitespace list
    /// means no selection (full objects).
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let names = raw
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    /// Whether no fields were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether a field was requested.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Adds a field to the selection. Callers use this to force mandatory
    /// members such as `id` into every projection.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Iterates over the requested field names in request order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Projects a JSON object down to the selected fields, preserving the
    /// object's own key order. Unknown names are ignored. With an empty
    /// selection, or on non-object values, the value passes through intact.
    #[must_use]
    pub fn apply(&self, value: Value) -> Value {
        if self.is_empty() {
            return value;
        }
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(k, _)| self.names.contains(k.as_str()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Applies the selection to every element of a JSON array.
    #[must_use]
    pub fn apply_all(&self, value: Value) -> Value {
        if self.is_empty() {
            return value;
        }
        match value {
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.apply(v)).collect())
            }
            other => self.apply(other),
        }
    }
}
