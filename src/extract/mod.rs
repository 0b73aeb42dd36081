//! Material extraction from item pages
//!
//! This module contains the parsing side of the pipeline:
//! - Locating recycling/salvaging sections by heading keywords
//! - Choosing a strategy per markup shape (labeled table, table, list, text)
//! - Parsing quantity expressions
//! - Assembling a page's materials into a catalog item

mod item;
mod quantity;
mod section;
mod strategy;

pub use item::ItemExtractor;
pub use quantity::{parse_material_text, parse_quantity, split_segments};
pub use section::{section_content, NodeKind, SectionLocator};
pub(crate) use strategy::spaced_text;
pub use strategy::{
    Extracted, Extraction, GenericTableStrategy, LabeledTableStrategy, ListStrategy,
    MaterialParser, MaterialStrategy, TextStrategy,
};
