use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::entity::{split_legacy_category, CategoryCount, Note, NotePayload, DEFAULT_CATEGORY};
use crate::error::{JotterError, Result};

pub const DEFAULT_NOTES_FILE: &str = "notes.json";

/// Note collection backed by a single JSON file.
///
/// The file holds an array of notes, most recent first. Every operation reads
/// the whole file and every mutation rewrites it; nothing is cached between
/// calls, so edits made to the file by other processes are picked up on the
/// next operation.
#[derive(Debug, Clone)]
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    /// Open a store over `path`. The file does not need to exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every note, upgrading legacy `category` strings.
    ///
    /// A missing file, a file that is not JSON, or one that is not an array
    /// of objects yields an empty collection. Records are otherwise kept
    /// whatever their field types. If any record was upgraded the normalized
    /// collection is written back immediately.
    pub fn load(&self) -> Vec<Note> {
        let (notes, upgraded) = match self.read_normalized() {
            Ok(loaded) => loaded,
            Err(JotterError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "notes file does not exist yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable notes file");
                return Vec::new();
            }
        };

        if upgraded > 0 {
            info!(upgraded, "normalized legacy category fields");
            if let Err(e) = self.save(&notes) {
                warn!(error = %e, "failed to persist normalized notes");
            }
        }

        notes
    }

    /// Overwrite the backing file with `notes`.
    pub fn save(&self, notes: &[Note]) -> Result<()> {
        let text = serde_json::to_string_pretty(notes)?;
        fs::write(&self.path, text)?;
        debug!(path = %self.path.display(), count = notes.len(), "saved notes");
        Ok(())
    }

    fn read_normalized(&self) -> Result<(Vec<Note>, usize)> {
        let text = fs::read_to_string(&self.path)?;
        let mut records: Vec<Map<String, Value>> = serde_json::from_str(&text)?;

        let upgraded = records
            .iter_mut()
            .map(normalize_record)
            .filter(|changed| *changed)
            .count();

        let notes = records.into_iter().map(Note::from_record).collect();
        Ok((notes, upgraded))
    }

    /// All notes, most recently created first.
    pub fn list_notes(&self) -> Vec<Note> {
        self.load()
    }

    /// Create a note from `payload`, stamped with the current time.
    pub fn create_note(&self, payload: NotePayload) -> Result<Note> {
        self.create_note_at(payload, Utc::now())
    }

    /// Create a note from `payload` as if it were `now`.
    pub fn create_note_at(&self, payload: NotePayload, now: DateTime<Utc>) -> Result<Note> {
        let note = Note::from_payload(&payload, now)
            .ok_or_else(|| JotterError::Validation("title is required".to_string()))?;

        let mut notes = self.load();
        notes.insert(0, note.clone());
        self.save(&notes)?;

        info!(id = now.timestamp_millis(), "created note");
        Ok(note)
    }

    /// Count how many notes use each category, in first-seen order.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        count_categories(&self.load())
    }

    pub fn get_note(&self, id: i64) -> Result<Note> {
        self.load()
            .into_iter()
            .find(|n| n.id() == Some(id))
            .ok_or(JotterError::NoteNotFound(id))
    }

    /// Apply `payload` to the note with `id` and persist the collection.
    pub fn patch_note(&self, id: i64, payload: NotePayload) -> Result<Note> {
        let mut notes = self.load();
        let note = notes
            .iter_mut()
            .find(|n| n.id() == Some(id))
            .ok_or(JotterError::NoteNotFound(id))?;

        note.apply_patch(&payload);
        let updated = note.clone();
        self.save(&notes)?;

        info!(id, "updated note");
        Ok(updated)
    }

    /// Remove the first note with `id` and persist the collection.
    pub fn delete_note(&self, id: i64) -> Result<i64> {
        let mut notes = self.load();
        let pos = notes
            .iter()
            .position(|n| n.id() == Some(id))
            .ok_or(JotterError::NoteNotFound(id))?;

        notes.remove(pos);
        self.save(&notes)?;

        info!(id, "deleted note");
        Ok(id)
    }
}

/// Give a record lacking a `categories` key one, converting a legacy
/// `category` string when present. Returns true if a legacy field was
/// converted.
fn normalize_record(record: &mut Map<String, Value>) -> bool {
    if record.contains_key("categories") {
        return false;
    }

    let legacy = match record.get("category") {
        Some(Value::String(raw)) => Some(split_legacy_category(raw)),
        _ => None,
    };

    match legacy {
        Some(categories) => {
            record.insert(
                "categories".to_string(),
                Value::Array(categories.into_iter().map(Value::String).collect()),
            );
            record.shift_remove("category");
            true
        }
        None => {
            record.insert("categories".to_string(), Value::Array(Vec::new()));
            false
        }
    }
}

/// Tally category usage. A note whose `categories` is not a list counts once
/// under its `category` string, or under `Uncategorized`.
fn count_categories(notes: &[Note]) -> Vec<CategoryCount> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for note in notes {
        match note.get("categories") {
            Some(Value::Array(items)) => {
                for name in items.iter().filter_map(Value::as_str) {
                    if !name.is_empty() {
                        *counts.entry(name.to_string()).or_insert(0) += 1;
                    }
                }
            }
            _ => {
                let name = note
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_CATEGORY);
                *counts.entry(name.to_string()).or_insert(0) += 1;
            }
        }
    }

    counts
        .into_iter()
        .map(|(name, count)| CategoryCount { name, count })
        .collect()
}
