//! Catalog loading with schema validation
//!
//! The display layer relies on a small structural contract. A file that
//! breaks it is rejected with an error naming the offending field.

use crate::catalog::types::Catalog;
use crate::{CatalogError, CatalogResult};
use serde_json::{Map, Value};
use std::path::Path;

/// Reads and validates a catalog file
pub fn load_catalog(path: &Path) -> CatalogResult<Catalog> {
    tracing::debug!("Loading catalog from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Parses and validates catalog JSON text
pub fn parse_catalog(content: &str) -> CatalogResult<Catalog> {
    let value: Value = serde_json::from_str(content)?;
    validate_schema(&value)?;

    let mut catalog: Catalog = serde_json::from_value(value)?;

    // Older files may omit the per-item category
    for (name, items) in catalog.categories.iter_mut() {
        for item in items.iter_mut().filter(|item| item.category.is_empty()) {
            item.category = name.clone();
        }
    }

    Ok(catalog)
}

/// Checks the structural contract of a catalog document
///
/// * `categories` is present and is an object
/// * every category value is an array of objects
/// * every item has string `name` and `url` and an array `materials`
/// * every material has a string `name` and a non-negative integer `quantity`
/// * `metadata`, when present, is an object with correctly typed fields
///
/// A document that passes always deserializes into a [`Catalog`].
pub fn validate_schema(value: &Value) -> CatalogResult<()> {
    let root = value.as_object().ok_or_else(|| CatalogError::InvalidType {
        field: "<root>".to_string(),
        expected: "an object",
    })?;

    let categories = root
        .get("categories")
        .ok_or_else(|| CatalogError::MissingField {
            field: "categories".to_string(),
        })?
        .as_object()
        .ok_or_else(|| CatalogError::InvalidType {
            field: "categories".to_string(),
            expected: "an object",
        })?;

    for (category, items) in categories {
        let field = format!("categories.{}", category);
        let items = items.as_array().ok_or_else(|| CatalogError::InvalidType {
            field: field.clone(),
            expected: "an array of items",
        })?;

        for (index, item) in items.iter().enumerate() {
            validate_item(&format!("{}[{}]", field, index), item)?;
        }
    }

    if let Some(metadata) = root.get("metadata") {
        validate_metadata(metadata)?;
    }

    Ok(())
}

/// What a JSON value must be to deserialize into a catalog field
#[derive(Debug, Clone, Copy)]
enum Expected {
    String,
    Count,
    Number,
}

impl Expected {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Count => value.is_u64(),
            Self::Number => value.is_number(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Count => "a non-negative integer",
            Self::Number => "a number",
        }
    }
}

fn object<'a>(field: &str, value: &'a Value) -> CatalogResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| CatalogError::InvalidType {
        field: field.to_string(),
        expected: "an object",
    })
}

fn check_type(field: String, value: &Value, expected: Expected) -> CatalogResult<()> {
    if expected.matches(value) {
        Ok(())
    } else {
        Err(CatalogError::InvalidType {
            field,
            expected: expected.describe(),
        })
    }
}

fn require(
    parent: &str,
    object: &Map<String, Value>,
    key: &str,
    expected: Expected,
) -> CatalogResult<()> {
    let field = format!("{}.{}", parent, key);
    match object.get(key) {
        Some(value) => check_type(field, value, expected),
        None => Err(CatalogError::MissingField { field }),
    }
}

fn validate_item(field: &str, item: &Value) -> CatalogResult<()> {
    let item = object(field, item)?;

    require(field, item, "name", Expected::String)?;
    require(field, item, "url", Expected::String)?;
    if let Some(category) = item.get("category") {
        check_type(format!("{}.category", field), category, Expected::String)?;
    }

    let materials = item
        .get("materials")
        .ok_or_else(|| CatalogError::MissingField {
            field: format!("{}.materials", field),
        })?
        .as_array()
        .ok_or_else(|| CatalogError::InvalidType {
            field: format!("{}.materials", field),
            expected: "an array",
        })?;

    for (index, material) in materials.iter().enumerate() {
        let field = format!("{}.materials[{}]", field, index);
        let material = object(&field, material)?;
        require(&field, material, "name", Expected::String)?;
        require(&field, material, "quantity", Expected::Count)?;
    }

    Ok(())
}

fn validate_metadata(metadata: &Value) -> CatalogResult<()> {
    const FIELDS: [(&str, Expected); 7] = [
        ("version", Expected::String),
        ("scraped_at", Expected::String),
        ("total_items", Expected::Count),
        ("categories_count", Expected::Count),
        ("elapsed_seconds", Expected::Number),
        ("failed_categories", Expected::Count),
        ("failed_items", Expected::Count),
    ];

    let metadata = object("metadata", metadata)?;
    for (key, expected) in FIELDS {
        // Absent fields take their defaults
        if let Some(value) = metadata.get(key) {
            check_type(format!("metadata.{}", key), value, expected)?;
        }
    }

    Ok(())
}
