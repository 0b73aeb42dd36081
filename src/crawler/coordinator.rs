//! Scrape coordinator - category aggregation
//!
//! This module contains the main scrape loop, which:
//! - Walks the configured categories (or the single Loot listing) in order
//! - Discovers item links on each listing page
//! - Fetches and extracts every item page
//! - Records failures without aborting the run
//! - Assembles the catalog and its metadata

use crate::catalog::{
    round_seconds, timestamp_now, Catalog, FailureRecord, Item, Metadata, CATALOG_VERSION,
};
use crate::config::{CategoryEntry, Config};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::{ExclusionRules, ItemLink, LinkDiscovery};
use crate::extract::ItemExtractor;
use crate::Result;
use indexmap::IndexMap;
use std::time::Instant;
use url::Url;

/// Name of the synthetic category used for the Loot index
pub const LOOT_CATEGORY: &str = "Loot";

/// Which listing pages a scrape walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrapeMode {
    /// Every configured category page
    #[default]
    Categories,

    /// The Loot index page, as a single "Loot" category
    Loot,
}

impl ScrapeMode {
    /// The categories this mode scrapes
    pub fn categories(self, config: &Config) -> Vec<CategoryEntry> {
        match self {
            Self::Categories => config.categories.clone(),
            Self::Loot => vec![CategoryEntry {
                name: LOOT_CATEGORY.to_string(),
                url: config.loot.url.clone(),
            }],
        }
    }
}

/// Everything one scrape produced
#[derive(Debug, Clone)]
pub struct AggregationResult {
    pub catalog: Catalog,
    pub failed_categories: Vec<FailureRecord>,
    pub failed_items: Vec<FailureRecord>,
}

impl AggregationResult {
    /// True when no category and no item failed
    pub fn is_complete(&self) -> bool {
        self.failed_categories.is_empty() && self.failed_items.is_empty()
    }
}

/// Drives link discovery and item extraction across categories
pub struct CategoryAggregator {
    fetcher: Fetcher,
    discovery: LinkDiscovery,
    extractor: ItemExtractor,
    base_url: String,
    wiki_prefix: String,
}

impl CategoryAggregator {
    /// Creates an aggregator with its own HTTP client, rate limiter and retry policy
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryAggregator)` - Ready to run
    /// * `Err(TrackerError)` - The HTTP client or content selector could not be built
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::from_config(config)?,
            discovery: LinkDiscovery::new(&config.scraper.content_selector)?,
            extractor: ItemExtractor::new(&config.sections),
            base_url: config.scraper.base_url.clone(),
            wiki_prefix: config.scraper.wiki_path_prefix.clone(),
        })
    }

    /// Scrapes the given categories in order
    ///
    /// A category whose listing page cannot be fetched contributes an empty
    /// item list and a failure record. An item page that cannot be fetched is
    /// kept with no materials and a failure record.
    pub async fn run(&self, categories: &[CategoryEntry]) -> AggregationResult {
        let start_time = Instant::now();
        let mut scraped: IndexMap<String, Vec<Item>> = IndexMap::new();
        let mut failed_categories = Vec::new();
        let mut failed_items = Vec::new();
        let mut items_scraped: usize = 0;

        for (index, category) in categories.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Scraping category {}",
                index + 1,
                categories.len(),
                category.name
            );

            let links = match self.category_links(category).await {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!("Failed to scrape category {}: {}", category.name, e);
                    failed_categories.push(FailureRecord::new(&category.name, &category.url, &e));
                    scraped.insert(category.name.clone(), Vec::new());
                    continue;
                }
            };

            if links.is_empty() {
                tracing::warn!("No item links found on {}", category.url);
            } else {
                tracing::info!("Found {} items in {}", links.len(), category.name);
            }

            let mut items = Vec::with_capacity(links.len());
            for link in &links {
                let item = match self.scrape_item(link, &category.name).await {
                    Ok(item) => item,
                    Err(e) => {
                        tracing::warn!("Failed to scrape item {}: {}", link.name, e);
                        failed_items.push(FailureRecord::new(&link.name, &link.url, &e));
                        Item {
                            name: link.name.clone(),
                            category: category.name.clone(),
                            url: link.url.clone(),
                            materials: Vec::new(),
                        }
                    }
                };
                items.push(item);

                items_scraped += 1;
                if items_scraped % 10 == 0 {
                    let rate = items_scraped as f64 / start_time.elapsed().as_secs_f64();
                    tracing::info!(
                        "Progress: {} items scraped, {:.2} items/sec",
                        items_scraped,
                        rate
                    );
                }
            }

            scraped.insert(category.name.clone(), items);
        }

        let elapsed = start_time.elapsed();
        let total_items: usize = scraped.values().map(Vec::len).sum();
        tracing::info!(
            "Scrape completed: {} items in {} categories in {:?} ({} failed categories, {} failed items)",
            total_items,
            categories.len(),
            elapsed,
            failed_categories.len(),
            failed_items.len()
        );

        let metadata = Metadata {
            version: CATALOG_VERSION.to_string(),
            scraped_at: timestamp_now(),
            total_items: total_items as u64,
            categories_count: categories.len() as u64,
            elapsed_seconds: round_seconds(elapsed.as_secs_f64()),
            failed_categories: failed_categories.len() as u64,
            failed_items: failed_items.len() as u64,
        };

        AggregationResult {
            catalog: Catalog {
                categories: scraped,
                metadata,
            },
            failed_categories,
            failed_items,
        }
    }

    /// Fetches a listing page and discovers its item links
    async fn category_links(&self, category: &CategoryEntry) -> Result<Vec<ItemLink>> {
        let page = Url::parse(&self.base_url)?.join(&category.url)?;
        let html = self.fetcher.fetch_html(page.as_str()).await?;
        let rules = ExclusionRules::new(self.wiki_prefix.as_str()).excluding(page.path());

        Ok(self.discovery.discover(&html, &page, &rules))
    }

    /// Fetches one item page and extracts its materials
    async fn scrape_item(&self, link: &ItemLink, category: &str) -> Result<Item> {
        tracing::debug!("Scraping item {} ({})", link.name, link.url);
        let html = self.fetcher.fetch_html(&link.url).await?;

        let item = self
            .extractor
            .build_item(&link.name, category, &link.url, &html);
        if item.materials.is_empty() {
            tracing::debug!("No recycling data for {}", link.name);
        }

        Ok(item)
    }
}

/// Runs a scrape over the listing pages selected by `mode`
///
/// # Example
///
/// ```no_run
/// use recycling_tracker::config::Config;
/// use recycling_tracker::crawler::{run_scrape, ScrapeMode};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let result = run_scrape(&Config::default(), ScrapeMode::Loot).await?;
/// println!("{} items", result.catalog.item_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: &Config, mode: ScrapeMode) -> Result<AggregationResult> {
    let aggregator = CategoryAggregator::new(config)?;
    Ok(aggregator.run(&mode.categories(config)).await)
}
