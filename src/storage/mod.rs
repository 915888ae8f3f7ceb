mod json_store;

pub use json_store::{NoteStore, DEFAULT_NOTES_FILE};
