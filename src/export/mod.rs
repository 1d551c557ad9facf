//! Export driver
//!
//! Orchestrates one run: output directory, token, query, a single search,
//! then a strictly sequential loop over the results. Each item ends in
//! exactly one of three terminal outcomes: skipped (destination exists),
//! exported, or failed. Per-item failures never abort the loop; the fatal
//! preconditions (directory creation, token, search) abort before any item
//! is touched.

use crate::archive::ArchiveEngine;
use crate::omnivore::{Client, ClientOpts, SearchOpts};
use crate::{config, query, ExportConfig, ExportError, Reporter, Result};

/// Tally of terminal item outcomes for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Items archived and written this run
    pub exported: usize,
    /// Items whose destination file already existed
    pub skipped: usize,
    /// Items whose archival failed (run continued)
    pub failed: usize,
}

/// Runs one export pass to completion
pub async fn run(config: &ExportConfig) -> Result<ExportReport> {
    let reporter = Reporter::new(config.color);

    std::fs::create_dir_all(&config.output_dir).map_err(|source| ExportError::CreateDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let token = config::api_token()?;

    if !config.labels.is_empty() {
        reporter.line(&format!(
            "Exporting only articles with labels: {:?}",
            config.labels
        ));
    } else if !config.skip_labels.is_empty() {
        reporter.line(&format!(
            "Exporting all articles except those with labels: {:?}",
            config.skip_labels
        ));
    }

    let search_query = query::build_search_query(&config.labels, &config.skip_labels);

    if config.compress && !config.use_monolith {
        reporter.line("Compressing enabled");
    }

    let engine = ArchiveEngine::from_config(config)?;
    reporter.line(&format!("Using: {}", engine.name()));
    reporter.line(&format!("Search query: {search_query}"));
    reporter.line(&format!(
        "Exporting to folder {} ...",
        config.output_dir.display()
    ));

    let client = Client::new(ClientOpts {
        token,
        api_url: config.api_url.clone(),
    })?;

    let items = client
        .search(SearchOpts {
            query: search_query,
        })
        .await?;

    let mut report = ExportReport::default();

    for item in &items {
        let dest = config
            .output_dir
            .join(output_file_name(&item.title, config.compress));

        if dest.is_file() {
            report.skipped += 1;
            reporter.skip(&format!("Skipping {} {} (exists)", item.id, item.title));
            continue;
        }

        reporter.info(&format!("Exporting '{}'...", item.title));

        match engine.archive(&item.url, &dest).await {
            Ok(()) => report.exported += 1,
            Err(e) => {
                report.failed += 1;
                tracing::debug!(url = %item.url, error = %e, "archive failed");
                reporter.fail(&format!("Failed to export '{}' (ignoring)", item.title));
            }
        }
    }

    tracing::info!(
        exported = report.exported,
        skipped = report.skipped,
        failed = report.failed,
        "export finished"
    );

    Ok(report)
}

/// Derives the destination filename from an item title
///
/// The title is used verbatim; filesystem-unsafe characters are not
/// sanitized, so a title containing a path separator fails at file creation
/// for that item. The `.gz` suffix follows the compress flag even when the
/// external engine, which never compresses, is active.
pub fn output_file_name(title: &str, compress: bool) -> String {
    let mut name = format!("{title}.html");
    if compress {
        name.push_str(".gz");
    }
    name
}
