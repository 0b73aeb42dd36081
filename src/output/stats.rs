//! Statistics generation from a catalog
//!
//! This module summarizes a scraped or loaded catalog for the console.

use crate::catalog::{Catalog, FailureRecord, Provenance};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Catalog statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStatistics {
    /// Item count per category, in category order
    pub items_by_category: IndexMap<String, usize>,

    /// Total number of items
    pub total_items: usize,

    /// Items with at least one material
    pub items_with_materials: usize,

    /// Items with no recycling or salvaging data
    pub items_without_materials: usize,

    /// Distinct material names, provenance tag removed
    pub distinct_materials: BTreeSet<String>,

    /// Number of salvaging-derived material entries
    pub salvage_entries: usize,

    /// Number of recycling-derived material entries
    pub recycling_entries: usize,

    /// When the catalog was scraped
    pub scraped_at: String,

    /// Failure counts as recorded in the metadata
    pub failed_categories: u64,
    pub failed_items: u64,
}

impl CatalogStatistics {
    /// Computes statistics from a catalog
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self {
            items_by_category: IndexMap::new(),
            total_items: 0,
            items_with_materials: 0,
            items_without_materials: 0,
            distinct_materials: BTreeSet::new(),
            salvage_entries: 0,
            recycling_entries: 0,
            scraped_at: catalog.metadata.scraped_at.clone(),
            failed_categories: catalog.metadata.failed_categories,
            failed_items: catalog.metadata.failed_items,
        };

        for (category, items) in &catalog.categories {
            stats
                .items_by_category
                .insert(category.clone(), items.len());
            stats.total_items += items.len();

            for item in items {
                if item.materials.is_empty() {
                    stats.items_without_materials += 1;
                } else {
                    stats.items_with_materials += 1;
                }

                for material in &item.materials {
                    let (provenance, name) = material.provenance();
                    match provenance {
                        Provenance::Recycling => stats.recycling_entries += 1,
                        Provenance::Salvaging => stats.salvage_entries += 1,
                    }
                    stats.distinct_materials.insert(name.to_string());
                }
            }
        }

        stats
    }

    /// Percentage of items with material data
    pub fn coverage(&self) -> f64 {
        if self.total_items == 0 {
            0.0
        } else {
            (self.items_with_materials as f64 / self.total_items as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CatalogStatistics) {
    println!("=== Catalog Statistics ===\n");

    println!("Overview:");
    if !stats.scraped_at.is_empty() {
        println!("  Scraped at: {}", stats.scraped_at);
    }
    println!("  Total items: {}", stats.total_items);
    println!("  Categories: {}", stats.items_by_category.len());
    println!("  Distinct materials: {}", stats.distinct_materials.len());
    println!();

    println!("Items by Category:");
    for (category, count) in &stats.items_by_category {
        println!("  {}: {}", category, count);
    }
    println!();

    println!("Material Entries:");
    println!("  Recycling: {}", stats.recycling_entries);
    println!("  Salvaging: {}", stats.salvage_entries);
    println!();

    if stats.failed_categories > 0 || stats.failed_items > 0 {
        println!("Failures:");
        println!("  Categories: {}", stats.failed_categories);
        println!("  Items: {}", stats.failed_items);
        println!();
    }

    println!(
        "Coverage: {:.1}% ({} / {} items have material data)",
        stats.coverage(),
        stats.items_with_materials,
        stats.total_items
    );
}

/// Prints failure records to stdout
pub fn print_failures(title: &str, failures: &[FailureRecord]) {
    if failures.is_empty() {
        return;
    }

    println!("{} ({}):", title, failures.len());
    for failure in failures {
        println!("  - {} ({}): {}", failure.name, failure.url, failure.error);
    }
    println!();
}
