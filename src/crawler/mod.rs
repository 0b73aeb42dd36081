//! Crawler module for wiki page fetching and aggregation
//!
//! This module contains the network side of the pipeline, including:
//! - HTTP fetching with rate limiting and retry logic
//! - Item link discovery on listing pages
//! - Overall scrape coordination

mod coordinator;
mod fetcher;
mod links;
mod rate_limiter;
mod retry;

pub use coordinator::{
    run_scrape, AggregationResult, CategoryAggregator, ScrapeMode, LOOT_CATEGORY,
};
pub use fetcher::{build_http_client, Fetcher};
pub use links::{AnchorScan, ExclusionRules, ItemLink, LinkDiscovery, LinkStrategy, TableLinks};
pub use rate_limiter::RateLimiter;
pub use retry::RetryPolicy;

use crate::catalog::CatalogWriter;
use crate::config::Config;
use crate::Result;

/// Runs a complete scrape and persists the catalog
///
/// This is the main entry point for a scrape. It will:
/// 1. Build the HTTP client, rate limiter and retry policy
/// 2. Discover item links on each listing page
/// 3. Fetch and extract every item page
/// 4. Write the catalog atomically to `output.catalog-path`
///
/// The catalog file is only touched once aggregation has finished.
///
/// # Returns
///
/// * `Ok(AggregationResult)` - Scrape finished and the catalog was written
/// * `Err(TrackerError)` - Setup or the final write failed
pub async fn scrape(config: &Config, mode: ScrapeMode) -> Result<AggregationResult> {
    let writer = CatalogWriter::new(&config.output.catalog_path);
    writer.cleanup_stale_temp()?;

    let result = run_scrape(config, mode).await?;

    writer.write(&result.catalog)?;

    Ok(result)
}
