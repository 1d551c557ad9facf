//! Omnivore Export command-line interface

use clap::{Args, Parser, Subcommand};
use omnivore_export::config::{DEFAULT_API_URL, DEFAULT_OUTPUT_DIR, DEFAULT_SKIP_LABELS};
use omnivore_export::{export, ExportConfig, Reporter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Omnivore Export
///
/// A tool to export Omnivore documents to local HTML files.
#[derive(Parser, Debug)]
#[command(name = "omnivore-export")]
#[command(version)]
#[command(about = "A tool to export Omnivore documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export all documents to HTML files
    #[command(alias = "e")]
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Verbose diagnostics
    #[arg(long)]
    debug: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Gzip-compress the exported files
    #[arg(long)]
    compress: bool,

    /// Use monolith to archive if available in PATH
    #[arg(short = 'm', long)]
    use_monolith: bool,

    /// Output directory for the exported files
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Export only articles labeled with label (repeatable)
    #[arg(short = 'l', long = "labels")]
    labels: Vec<String>,

    /// Skip articles labeled with label (repeatable)
    #[arg(long = "skip-labels", default_values_t = DEFAULT_SKIP_LABELS.iter().map(|s| s.to_string()))]
    skip_labels: Vec<String>,

    /// Omnivore GraphQL endpoint (for self-hosted instances)
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export(args) => {
            setup_logging(args.debug);

            let config = ExportConfig {
                output_dir: args.output_dir,
                compress: args.compress,
                use_monolith: args.use_monolith,
                labels: args.labels,
                skip_labels: args.skip_labels,
                debug: args.debug,
                color: !args.no_color,
                api_url: args.api_url,
            };

            let reporter = Reporter::new(config.color);
            let report = export::run(&config).await?;
            reporter.done(report.exported);
        }
    }

    Ok(())
}

/// Sets up the tracing subscriber from the debug flag
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("omnivore_export=debug,info")
    } else {
        EnvFilter::new("omnivore_export=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .init();
}
