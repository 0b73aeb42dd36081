//! Catalog data model and persistence
//!
//! This module holds the types that make up the persisted catalog, the
//! atomic writer, and the validating loader used by the display layer.

mod loader;
mod types;
mod writer;

pub use loader::{load_catalog, parse_catalog, validate_schema};
pub use types::{
    round_seconds, timestamp_now, Catalog, FailureRecord, Item, Material, Metadata, Provenance,
    CATALOG_VERSION, SALVAGE_PREFIX,
};
pub use writer::CatalogWriter;
