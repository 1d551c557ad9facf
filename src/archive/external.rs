//! External archiver wrapping the `monolith` command
//!
//! The command must be resolvable on `PATH`; each archive call probes for it
//! and fails with a descriptive error when it is absent. Output compression
//! is monolith's own concern and the compress flag is never applied here.

use crate::{ExportError, Result};
use std::path::Path;
use tokio::process::Command;

/// Name of the external archiver executable
pub const ARCHIVE_COMMAND: &str = "monolith";

/// Archiver invoking `monolith [--silent] --output <dest> <url>`
#[derive(Debug)]
pub struct ExternalArchiver {
    silent: bool,
}

impl ExternalArchiver {
    /// `debug` adds monolith's `--silent` flag to each invocation
    pub fn new(debug: bool) -> Self {
        Self { silent: debug }
    }

    /// Archives `url` into the file at `dest` via the external command
    pub async fn archive(&self, url: &str, dest: &Path) -> Result<()> {
        let command_path = find_command_path(ARCHIVE_COMMAND).await?;

        let mut command = Command::new(&command_path);
        if self.silent {
            command.arg("--silent");
        }
        command.arg("--output").arg(dest).arg(url);

        tracing::debug!(command = %command_path, url, "running external archiver");

        let output = command.output().await.map_err(ExportError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = if stderr.trim().is_empty() {
                format!("exit code {:?}", output.status.code())
            } else {
                stderr.trim().to_string()
            };
            return Err(ExportError::CommandFailed {
                command: ARCHIVE_COMMAND.to_string(),
                reason,
            });
        }

        Ok(())
    }
}

/// Resolves an executable on the process's search path
///
/// Probes with `which` on Unix and `where` on Windows, matching how the
/// command itself will be resolved when invoked.
async fn find_command_path(command: &str) -> Result<String> {
    #[cfg(windows)]
    let which_cmd = "where";
    #[cfg(not(windows))]
    let which_cmd = "which";

    let output = Command::new(which_cmd)
        .arg(command)
        .output()
        .await
        .map_err(ExportError::Io)?;

    if !output.status.success() {
        return Err(ExportError::CommandNotFound {
            command: command.to_string(),
        });
    }

    let path = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    if path.is_empty() {
        return Err(ExportError::CommandNotFound {
            command: command.to_string(),
        });
    }

    Ok(path)
}
