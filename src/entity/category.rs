// src/entity/category.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category assigned at creation when no usable category data is supplied.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Where a payload's category data came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryInput {
    /// `categories` was an array; only its string elements are kept.
    List(Vec<String>),
    /// `category` was a (possibly comma-separated) string.
    Legacy(String),
    /// Neither field was present in a usable shape.
    Absent,
}

impl CategoryInput {
    /// Pick the category source: an array `categories` wins, then a string
    /// `category`. Any other shape counts as absent.
    pub fn from_payload(categories: Option<&Value>, category: Option<&Value>) -> Self {
        if let Some(Value::Array(items)) = categories {
            return CategoryInput::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            );
        }
        match category {
            Some(Value::String(s)) => CategoryInput::Legacy(s.clone()),
            _ => CategoryInput::Absent,
        }
    }

    /// Resolve to a category list, or `None` when there was nothing to use.
    ///
    /// List entries are kept verbatim but blank ones are dropped; the legacy
    /// string is split on commas and each piece trimmed.
    pub fn resolve(&self) -> Option<Vec<String>> {
        match self {
            CategoryInput::List(items) => Some(
                items
                    .iter()
                    .filter(|c| !c.trim().is_empty())
                    .cloned()
                    .collect(),
            ),
            CategoryInput::Legacy(s) => Some(split_legacy_category(s)),
            CategoryInput::Absent => None,
        }
    }
}

/// Split a legacy `category` string on commas, trimming each piece and
/// dropping empty ones.
pub fn split_legacy_category(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Usage count of one category across all notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}
