use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// Name prefix that marks a salvaging-derived material in the flat list
pub const SALVAGE_PREFIX: &str = "(Salvage) ";

/// Schema version written into new catalogs
pub const CATALOG_VERSION: &str = "1.0";

/// Where a material came from on the item page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Recycling,
    Salvaging,
}

/// A named quantity yielded by disassembling an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub quantity: u64,
}

impl Material {
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    /// Returns this material with its name tagged for the given provenance.
    ///
    /// Recycling materials are left untouched; salvaging materials get the
    /// [`SALVAGE_PREFIX`].
    pub fn tagged(self, provenance: Provenance) -> Self {
        match provenance {
            Provenance::Recycling => self,
            Provenance::Salvaging => Self {
                name: format!("{SALVAGE_PREFIX}{}", self.name),
                quantity: self.quantity,
            },
        }
    }

    /// Undoes [`Material::tagged`]: the provenance and the bare name.
    pub fn provenance(&self) -> (Provenance, &str) {
        match self.name.strip_prefix(SALVAGE_PREFIX) {
            Some(bare) => (Provenance::Salvaging, bare),
            None => (Provenance::Recycling, self.name.as_str()),
        }
    }
}

/// One catalog entry: a game item and its materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub url: String,
    pub materials: Vec<Material>,
}

/// A category or item that could not be scraped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub name: String,
    pub url: String,
    pub error: String,
}

impl FailureRecord {
    pub fn new(name: &str, url: &str, error: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            error: error.to_string(),
        }
    }
}

/// Run summary stored next to the categories
///
/// Every field has a default so catalogs written by older versions, which
/// lack some of these keys, still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub version: String,
    /// ISO-8601 UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`
    pub scraped_at: String,
    pub total_items: u64,
    pub categories_count: u64,
    pub elapsed_seconds: f64,
    pub failed_categories: u64,
    pub failed_items: u64,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            scraped_at: String::new(),
            total_items: 0,
            categories_count: 0,
            elapsed_seconds: 0.0,
            failed_categories: 0,
            failed_items: 0,
        }
    }
}

/// The full persisted collection of categories and items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: IndexMap<String, Vec<Item>>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Catalog {
    /// Total number of items across all categories
    pub fn item_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Rounds a duration in seconds to two decimals, as stored in the metadata
pub fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Current UTC time in the catalog's timestamp format
pub fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
