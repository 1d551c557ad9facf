//! Run configuration
//!
//! Everything the export driver needs is resolved once from CLI flags into an
//! immutable [`ExportConfig`]. The API token is deliberately not part of the
//! config: it is read from the environment at run time so a missing token is
//! reported as a precondition failure, not a parse error.

use crate::{ExportError, Result};
use std::path::PathBuf;

/// Default folder exports are written into
pub const DEFAULT_OUTPUT_DIR: &str = "omnivore-exports";

/// Labels excluded by default when no include-labels are given
pub const DEFAULT_SKIP_LABELS: &[&str] = &["omnivore-exporter-skip", "Newsletter"];

/// Production Omnivore GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://api-prod.omnivore.app/api/graphql";

/// Environment variable holding the API bearer token
pub const TOKEN_ENV_VAR: &str = "OMNIVORE_API_TOKEN";

/// Resolved options for one export run
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory the HTML files are written into (created if missing)
    pub output_dir: PathBuf,

    /// Gzip-compress snapshot output and append `.gz` to filenames.
    ///
    /// Note: the filename suffix follows this flag even with the external
    /// engine, which never compresses. A `.gz` name produced by monolith
    /// holds plain HTML.
    pub compress: bool,

    /// Archive with the external `monolith` command instead of the
    /// in-process snapshot engine
    pub use_monolith: bool,

    /// Only export items carrying at least one of these labels
    pub labels: Vec<String>,

    /// Export everything except items carrying one of these labels.
    /// Ignored entirely when `labels` is non-empty.
    pub skip_labels: Vec<String>,

    /// Verbose diagnostics; also passes `--silent` to monolith
    pub debug: bool,

    /// Colorize progress output
    pub color: bool,

    /// GraphQL endpoint, overridable for self-hosted instances
    pub api_url: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compress: false,
            use_monolith: false,
            labels: Vec::new(),
            skip_labels: DEFAULT_SKIP_LABELS.iter().map(|s| s.to_string()).collect(),
            debug: false,
            color: true,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Reads the API bearer token from the environment
///
/// An unset or empty `OMNIVORE_API_TOKEN` is a fatal precondition failure.
pub fn api_token() -> Result<String> {
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => Err(ExportError::MissingToken),
    }
}
