use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_NOTES_FILE;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the server and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backing JSON file holding every note.
    pub notes_path: PathBuf,
    /// Interface the HTTP server binds to.
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_path: PathBuf::from(DEFAULT_NOTES_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Config for a given notes file with the default bind address.
    pub fn with_notes_path(notes_path: impl Into<PathBuf>) -> Self {
        Self {
            notes_path: notes_path.into(),
            ..Self::default()
        }
    }

    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
