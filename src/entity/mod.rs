mod category;
mod note;

pub use category::{split_legacy_category, CategoryCount, CategoryInput, DEFAULT_CATEGORY};
pub use note::{Note, NotePayload};
