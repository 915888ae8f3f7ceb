// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{CategoryInput, DEFAULT_CATEGORY};

/// A single note as persisted in the backing file.
///
/// The record is kept as the JSON object it was read as. Only `id`, `title`
/// and `categories` carry meaning for the store; every other field, and any
/// field holding an unexpected type, is written back exactly as loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Note(Map<String, Value>);

impl Note {
    pub fn new(title: String, now: DateTime<Utc>) -> Self {
        let mut record = Map::new();
        record.insert("id".to_string(), json!(now.timestamp_millis()));
        record.insert("title".to_string(), Value::String(title));
        record.insert("content".to_string(), Value::String(String::new()));
        record.insert("topics".to_string(), Value::Array(Vec::new()));
        record.insert("categories".to_string(), json!([DEFAULT_CATEGORY]));
        record.insert("created_at".to_string(), Value::String(format_created_at(&now)));
        Self(record)
    }

    pub fn from_record(record: Map<String, Value>) -> Self {
        Self(record)
    }

    pub fn as_record(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Creation time in UTC milliseconds, when the stored id is an integer.
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.0.get("content").and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.0.get("created_at").and_then(Value::as_str)
    }

    /// String entries of `topics`; empty when the field is not a list.
    pub fn topics(&self) -> Vec<&str> {
        string_items(self.0.get("topics"))
    }

    /// String entries of `categories`; empty when the field is not a list.
    pub fn categories(&self) -> Vec<&str> {
        string_items(self.0.get("categories"))
    }

    /// Build a new note from a create payload.
    ///
    /// Returns `None` when the payload has no string `title`. `content` and
    /// `topics` are taken as given.
    pub fn from_payload(payload: &NotePayload, now: DateTime<Utc>) -> Option<Self> {
        let title = payload.title()?.to_string();
        let mut note = Note::new(title, now);

        if let Some(content) = payload.get("content") {
            note.0.insert("content".to_string(), content.clone());
        }
        if let Some(topics) = payload.get("topics") {
            note.0.insert("topics".to_string(), topics.clone());
        }
        if let Some(categories) = payload.category_input().resolve() {
            if !categories.is_empty() {
                note.0.insert("categories".to_string(), json!(categories));
            }
        }

        Some(note)
    }

    /// Overwrite `topics`, `content` and `title` with whatever the payload
    /// holds for them.
    ///
    /// Categories are replaced only when the payload carries usable category
    /// data, and an empty result is kept as-is (no `Uncategorized` fallback).
    pub fn apply_patch(&mut self, payload: &NotePayload) {
        for field in ["topics", "content", "title"] {
            if let Some(value) = payload.get(field) {
                self.0.insert(field.to_string(), value.clone());
            }
        }
        if let Some(categories) = payload.category_input().resolve() {
            self.0.insert("categories".to_string(), json!(categories));
        }
    }
}

fn string_items(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Format a timestamp the way `created_at` is stored: microsecond precision
/// and a literal `Z`.
pub(crate) fn format_created_at(now: &DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// JSON object body accepted by create and patch.
///
/// Fields are looked up by presence, so an explicit `null` counts as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotePayload(Map<String, Value>);

impl NotePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field`, returning the payload for chaining.
    pub fn with(mut self, field: &str, value: Value) -> Self {
        self.0.insert(field.to_string(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn category_input(&self) -> CategoryInput {
        CategoryInput::from_payload(self.0.get("categories"), self.0.get("category"))
    }
}
