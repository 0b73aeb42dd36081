//! Output module for console summaries
//!
//! This module handles:
//! - Computing catalog statistics
//! - Printing statistics and failure reports

pub mod stats;

pub use stats::{print_failures, print_statistics, CatalogStatistics};

use crate::crawler::AggregationResult;

/// Prints the statistics and failures of a finished scrape
pub fn print_scrape_summary(result: &AggregationResult) {
    print_statistics(&CatalogStatistics::from_catalog(&result.catalog));
    println!();
    print_failures("Failed categories", &result.failed_categories);
    print_failures("Failed items", &result.failed_items);
}
