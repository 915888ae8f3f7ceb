use std::path::Path;

use serde_json::{json, Value};

use crate::config::Config;
use crate::entity::{Note, NotePayload};
use crate::error::Result;
use crate::http;
use crate::storage::NoteStore;

/// Turn repeated CLI values into a payload field; no values means "not given".
fn list_field(values: Vec<String>) -> Option<Value> {
    if values.is_empty() {
        None
    } else {
        Some(json!(values))
    }
}

fn id_label(note: &Note) -> String {
    note.get("id").map(Value::to_string).unwrap_or_default()
}

fn print_note(note: &Note) {
    println!("{} - {}", id_label(note), note.title().unwrap_or_default());
    println!("  created: {}", note.created_at().unwrap_or_default());
    println!("  categories: {}", note.categories().join(", "));
    let topics = note.topics();
    if !topics.is_empty() {
        println!("  topics: {}", topics.join(", "));
    }
    if let Some(content) = note.content().filter(|c| !c.is_empty()) {
        println!();
        println!("{}", content);
    }
}

pub fn handle_serve(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(http::serve(&config))
}

pub fn handle_list(notes_file: &Path, json: bool) -> Result<()> {
    let store = NoteStore::open(notes_file);
    let notes = store.list_notes();

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
    } else if notes.is_empty() {
        println!("No notes found.");
    } else {
        for note in &notes {
            println!(
                "{}  {}  [{}]",
                id_label(note),
                note.title().unwrap_or_default(),
                note.categories().join(", ")
            );
        }
    }

    Ok(())
}

pub fn handle_add(
    notes_file: &Path,
    title: String,
    content: Option<String>,
    topics: Vec<String>,
    categories: Vec<String>,
    json: bool,
) -> Result<()> {
    let store = NoteStore::open(notes_file);
    let mut payload = NotePayload::new()
        .with("title", Value::String(title))
        .with("topics", json!(topics));
    if let Some(content) = content {
        payload = payload.with("content", Value::String(content));
    }
    if let Some(categories) = list_field(categories) {
        payload = payload.with("categories", categories);
    }

    let note = store.create_note(payload)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!(
            "Created note {} - {}",
            id_label(&note),
            note.title().unwrap_or_default()
        );
    }

    Ok(())
}

pub fn handle_get(notes_file: &Path, id: i64, json: bool) -> Result<()> {
    let store = NoteStore::open(notes_file);
    let note = store.get_note(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        print_note(&note);
    }

    Ok(())
}

pub fn handle_edit(
    notes_file: &Path,
    id: i64,
    title: Option<String>,
    content: Option<String>,
    topics: Vec<String>,
    categories: Vec<String>,
    json: bool,
) -> Result<()> {
    let store = NoteStore::open(notes_file);
    let mut payload = NotePayload::new();
    if let Some(title) = title {
        payload = payload.with("title", Value::String(title));
    }
    if let Some(content) = content {
        payload = payload.with("content", Value::String(content));
    }
    if let Some(topics) = list_field(topics) {
        payload = payload.with("topics", topics);
    }
    if let Some(categories) = list_field(categories) {
        payload = payload.with("categories", categories);
    }

    let note = store.patch_note(id, payload)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!(
            "Updated note {} - {}",
            id_label(&note),
            note.title().unwrap_or_default()
        );
    }

    Ok(())
}

pub fn handle_delete(notes_file: &Path, id: i64) -> Result<()> {
    let store = NoteStore::open(notes_file);
    let deleted = store.delete_note(id)?;
    println!("Deleted note {}", deleted);
    Ok(())
}

pub fn handle_categories(notes_file: &Path, json: bool) -> Result<()> {
    let store = NoteStore::open(notes_file);
    let counts = store.category_counts();

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else if counts.is_empty() {
        println!("No categories found.");
    } else {
        for c in &counts {
            println!("{:>4}  {}", c.count, c.name);
        }
    }

    Ok(())
}
