//! Wikiscribe main entry point
//!
//! This is the command-line interface for the wikiscribe space exporter.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wikiscribe::config::{assemble_config, validate, CliOptions};
use wikiscribe::Exporter;

/// Wikiscribe: export a wiki space to a Markdown tree
///
/// Wikiscribe crawls every page of a documentation space reachable from
/// the root URL, converts the pages to Markdown with working relative
/// links, and mirrors referenced images. Missing --url/--out switch the
/// run into interactive prompting.
#[derive(Parser, Debug)]
#[command(name = "wikiscribe")]
#[command(version)]
#[command(about = "Export a wiki space to a Markdown tree", long_about = None)]
struct Cli {
    /// Root URL of the wiki space, e.g. https://wiki.example.com/spaces/project
    #[arg(long)]
    url: Option<String>,

    /// Output directory (created if missing)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Maximum number of pages to crawl
    #[arg(long)]
    max_pages: Option<usize>,

    /// Delay in seconds between requests (politeness)
    #[arg(long)]
    delay: Option<f64>,

    /// Do not download page assets (images)
    #[arg(long)]
    no_assets: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Assemble and validate configuration; errors here are the only fatal ones
    let config = assemble_config(CliOptions {
        url: cli.url,
        out: cli.out,
        max_pages: cli.max_pages,
        delay: cli.delay,
        no_assets: cli.no_assets,
    })?;
    validate(&config)?;

    let exporter = Exporter::new(config)?;
    let summary = exporter.run().await?;

    println!("{}", summary.format());
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wikiscribe=info,warn"),
            1 => EnvFilter::new("wikiscribe=debug,info"),
            2 => EnvFilter::new("wikiscribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
