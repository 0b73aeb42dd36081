//! Recycling Tracker main entry point
//!
//! This is the command-line interface for the Arc Raiders recycling scraper.

use anyhow::Context;
use clap::Parser;
use recycling_tracker::catalog::load_catalog;
use recycling_tracker::config::{load_config_with_hash, Config};
use recycling_tracker::crawler::{scrape, ScrapeMode};
use recycling_tracker::output::{print_scrape_summary, print_statistics, CatalogStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Recycling Tracker: what every Arc Raiders item breaks down into
///
/// Scrapes the item pages of the Arc Raiders wiki, extracts their recycling
/// and salvaging results, and writes a JSON catalog for the tracker page.
#[derive(Parser, Debug)]
#[command(name = "recycling-tracker")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes item recycling data from the Arc Raiders wiki", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scrape the Loot index page instead of the configured categories
    #[arg(long, conflicts_with = "stats")]
    loot: bool,

    /// Catalog path, overriding `output.catalog-path`
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show statistics for an existing catalog and exit
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_configuration(path)?,
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.output.catalog_path = output.display().to_string();
    }

    if cli.stats {
        handle_stats(&config)?;
    } else {
        let mode = if cli.loot {
            ScrapeMode::Loot
        } else {
            ScrapeMode::Categories
        };
        handle_scrape(&config, mode, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("recycling_tracker=info,warn"),
            1 => EnvFilter::new("recycling_tracker=debug,info"),
            2 => EnvFilter::new("recycling_tracker=trace,debug"),
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

fn load_configuration(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e).with_context(|| format!("loading {}", path.display()))
        }
    }
}

/// Handles the --stats mode: loads and validates the catalog, then prints statistics
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.catalog_path);
    println!("Catalog: {}\n", path.display());

    let catalog = load_catalog(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    print_statistics(&CatalogStatistics::from_catalog(&catalog));

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, mode: ScrapeMode, quiet: bool) -> anyhow::Result<()> {
    match mode {
        ScrapeMode::Categories => tracing::info!(
            "Scraping {} categories from {}",
            config.categories.len(),
            config.scraper.base_url
        ),
        ScrapeMode::Loot => tracing::info!("Scraping Loot index: {}", config.loot.url),
    }

    match scrape(config, mode).await {
        Ok(result) => {
            if !result.is_complete() {
                tracing::warn!(
                    "Scrape finished with {} failed categories and {} failed items",
                    result.failed_categories.len(),
                    result.failed_items.len()
                );
            }
            if !quiet {
                print_scrape_summary(&result);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e).context("scrape failed")
        }
    }
}
