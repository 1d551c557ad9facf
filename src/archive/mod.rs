//! Archival engines
//!
//! Two interchangeable ways of turning a URL into a stored HTML snapshot:
//! the in-process [`SnapshotArchiver`] and the external
//! [`ExternalArchiver`] wrapping the `monolith` command. The engine is
//! selected once per run from the configuration; the export driver only sees
//! [`ArchiveEngine::archive`].

mod external;
mod snapshot;

pub use external::{ExternalArchiver, ARCHIVE_COMMAND};
pub use snapshot::SnapshotArchiver;

use crate::{ExportConfig, Result};
use std::path::Path;

/// The selected archival engine for a run
#[derive(Debug)]
pub enum ArchiveEngine {
    /// In-process fetch-and-inline snapshot
    Snapshot(SnapshotArchiver),
    /// External `monolith` subprocess
    External(ExternalArchiver),
}

impl ArchiveEngine {
    /// Selects and builds the engine for this run's configuration
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        if config.use_monolith {
            Ok(Self::External(ExternalArchiver::new(config.debug)))
        } else {
            Ok(Self::Snapshot(SnapshotArchiver::new(config.compress)?))
        }
    }

    /// Human-readable engine name for progress output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Snapshot(_) => "snapshot",
            Self::External(_) => ARCHIVE_COMMAND,
        }
    }

    /// Archives `url` into the file at `dest`
    pub async fn archive(&self, url: &str, dest: &Path) -> Result<()> {
        match self {
            Self::Snapshot(archiver) => archiver.archive(url, dest).await,
            Self::External(archiver) => archiver.archive(url, dest).await,
        }
    }
}
