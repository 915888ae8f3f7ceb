pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod storage;

pub use config::Config;
pub use entity::{CategoryCount, Note, NotePayload};
pub use error::{JotterError, Result};
pub use storage::NoteStore;
