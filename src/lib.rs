//! Omnivore Export: save your read-it-later library as local HTML files
//!
//! This crate exports documents saved in Omnivore to self-contained HTML
//! snapshots, filtered by label, using either an in-process archiver or the
//! external `monolith` command.

pub mod archive;
pub mod config;
pub mod export;
pub mod omnivore;
pub mod query;
pub mod report;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("OMNIVORE_API_TOKEN is not set")]
    MissingToken,

    #[error("failed to create base dir {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to search: {0}")]
    SearchTransport(#[source] reqwest::Error),

    #[error("failed to search: API returned HTTP {status}")]
    SearchStatus { status: u16 },

    #[error("failed to search: {message}")]
    SearchApi { message: String },

    #[error("failed to archive {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("failed to archive {url}: HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("failed to create archive file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("failed to run command '{command}': {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

// Re-export commonly used types
pub use archive::ArchiveEngine;
pub use config::ExportConfig;
pub use export::{run, ExportReport};
pub use omnivore::{Client, SearchItem};
pub use report::Reporter;
