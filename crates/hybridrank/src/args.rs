//! Command-line arguments for the `hybridrank` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::KeywordBackend;

/// Hybrid semantic + keyword search over a directory of text documents
#[derive(Debug, Parser)]
#[command(name = "hybridrank", version, about)]
pub struct Cli {
    /// Configuration file (TOML); defaults to the user config directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest every .txt and .md file under DIR and rank them for QUERY
    Search {
        /// Directory to load documents from
        dir: PathBuf,

        /// Free-text query
        query: String,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of results to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Keyword lookup backend, overriding the configuration
        #[arg(long, value_enum)]
        backend: Option<KeywordBackend>,
    },
    /// Show how a file would be split into chunks
    Chunk {
        /// File to split
        file: PathBuf,

        /// Emit chunks as JSON
        #[arg(long)]
        json: bool,
    },
}
