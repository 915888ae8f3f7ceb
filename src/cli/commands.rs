use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_HOST, DEFAULT_PORT};
use crate::storage::DEFAULT_NOTES_FILE;

#[derive(Parser, Debug)]
#[command(name = "jotter")]
#[command(version, about = "A small note-taking backend over a flat JSON file")]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON file holding the notes
    #[arg(
        long,
        global = true,
        env = "JOTTER_NOTES_FILE",
        default_value = DEFAULT_NOTES_FILE
    )]
    pub notes_file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the notes JSON API over HTTP
    Serve {
        /// Interface to bind
        #[arg(long, env = "JOTTER_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind
        #[arg(long, env = "JOTTER_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// List notes, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new note
    Add {
        /// Note title
        title: String,

        /// Note body
        #[arg(long)]
        content: Option<String>,

        /// Topics (can be specified multiple times)
        #[arg(long = "topic", short = 't')]
        topics: Vec<String>,

        /// Categories (can be specified multiple times)
        #[arg(long = "category", short = 'c')]
        categories: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single note
    Get {
        /// Note ID
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change fields of an existing note
    Edit {
        /// Note ID
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        content: Option<String>,

        /// Replace topics (can be specified multiple times)
        #[arg(long = "topic", short = 't')]
        topics: Vec<String>,

        /// Replace categories (can be specified multiple times)
        #[arg(long = "category", short = 'c')]
        categories: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: i64,
    },

    /// Show how many notes use each category
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
