//! Shop-Scrape main entry point
//!
//! This is the command-line interface for the Shop-Scrape catalogue crawler.

use anyhow::Context;
use clap::Parser;
use shop_scrape::config::{load_config_with_hash, Config};
use shop_scrape::output::write_artifacts;
use shop_scrape::url::{extract_host, parse_entry_url};
use shop_scrape::{scrape, ScrapeError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Shop-Scrape: a catalogue crawler for retail shops
///
/// Walks the shop's category hierarchy, pages through its product listing,
/// harvests every product page and writes `hierarchy.json` and
/// `products.json` into a directory named after the shop's host.
#[derive(Parser, Debug)]
#[command(name = "scrape")]
#[command(version)]
#[command(about = "A catalogue crawler for retail shops", long_about = None)]
struct Cli {
    /// Shop entry URL, e.g. https://demo-shop.natek.eu
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory under which the per-host artifact directory is created
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(dir) => {
            tracing::info!("Scrape completed, artifacts in {}", dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Scrape failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shop_scrape=info,scrape=info,warn"),
            1 => EnvFilter::new("shop_scrape=debug,scrape=debug,info"),
            2 => EnvFilter::new("shop_scrape=trace,scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<PathBuf> {
    let entry = cli
        .url
        .context("No URL given. Usage: scrape <url>")?;
    let url = parse_entry_url(&entry).with_context(|| format!("Invalid URL '{}'", entry))?;

    let config = load(cli.config.as_deref())?;
    if config.find_site(url.as_str()).is_none() {
        return Err(ScrapeError::UnsupportedSite {
            url: url.to_string(),
        })
        .context("Supported sites are listed under [[site]] in the configuration");
    }

    let host = extract_host(&url).context("Entry URL has no host")?;
    let base_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));

    let result = scrape(&config, &entry)
        .await
        .with_context(|| format!("Crawl of {} failed", url))?;

    let dir = write_artifacts(&result, &base_dir, &host)
        .with_context(|| format!("Failed to write artifacts under {}", base_dir.display()))?;
    Ok(dir)
}

/// Loads the configuration file if one was given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}
