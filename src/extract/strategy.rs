//! Material extraction strategies
//!
//! A located section contains tables, lists and loose text in no fixed
//! shape. Each [`MaterialStrategy`] recognizes one shape; the
//! [`MaterialParser`] tries them in priority order and the first that
//! accepts a node extracts from it.

use crate::catalog::{Material, Provenance};
use crate::extract::quantity::{parse_material_text, parse_quantity, split_segments};
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th, td").expect("valid selector"));
static LIST_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("valid selector"));

/// Header substrings that mark a labeled results column
const RECYCLING_LABEL: &str = "recycling";
const SALVAGING_LABEL: &str = "salvag";

/// A material found in a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub material: Material,
    /// Set when the markup itself says which topic the material belongs to
    /// (a labeled table column); `None` means "whatever the section is about"
    pub provenance: Option<Provenance>,
}

impl Extracted {
    fn unlabeled(material: Material) -> Self {
        Self {
            material,
            provenance: None,
        }
    }
}

/// Result of running one strategy on one node
#[derive(Debug, Default)]
pub struct Extraction {
    pub materials: Vec<Extracted>,
    /// No further content of the section should be read
    pub ends_section: bool,
}

impl Extraction {
    fn unlabeled(materials: impl IntoIterator<Item = Material>) -> Self {
        Self {
            materials: materials.into_iter().map(Extracted::unlabeled).collect(),
            ends_section: false,
        }
    }
}

/// One markup shape the parser knows how to read
pub trait MaterialStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this strategy can read `node`
    fn accepts(&self, node: ElementRef<'_>) -> bool;

    /// Extracts materials for the requested topics
    fn extract(&self, node: ElementRef<'_>, topics: &[Provenance]) -> Extraction;
}

/// Table whose header names a recycling and/or salvaging results column
///
/// ```text
/// Item | → | Recycling results        | Salvaging results
/// Gun  | → | Steel x5, Electronics x2 | Scrap x1
/// ```
pub struct LabeledTableStrategy;

/// Plain `material | quantity` table
pub struct GenericTableStrategy;

/// `ul`/`ol` with one material per item
pub struct ListStrategy;

/// Loose text, one material per line
pub struct TextStrategy;

/// Column indices of the labeled results columns, if any
fn labeled_columns(table: ElementRef<'_>) -> Option<(Option<usize>, Option<usize>)> {
    let header = table.select(&ROWS).next()?;
    let labels: Vec<String> = header
        .select(&CELLS)
        .map(|cell| cell.text().collect::<String>().trim().to_lowercase())
        .collect();

    let recycling = labels.iter().rposition(|l| l.contains(RECYCLING_LABEL));
    let salvaging = labels.iter().rposition(|l| l.contains(SALVAGING_LABEL));

    if recycling.is_none() && salvaging.is_none() {
        None
    } else {
        Some((recycling, salvaging))
    }
}

impl MaterialStrategy for LabeledTableStrategy {
    fn name(&self) -> &'static str {
        "labeled-table"
    }

    fn accepts(&self, node: ElementRef<'_>) -> bool {
        node.value().name() == "table" && labeled_columns(node).is_some()
    }

    fn extract(&self, node: ElementRef<'_>, topics: &[Provenance]) -> Extraction {
        let Some((recycling_idx, salvaging_idx)) = labeled_columns(node) else {
            return Extraction::default();
        };

        let wanted: Vec<(usize, Provenance)> = [
            (recycling_idx, Provenance::Recycling),
            (salvaging_idx, Provenance::Salvaging),
        ]
        .into_iter()
        .filter_map(|(idx, topic)| Some((idx?, topic)))
        .filter(|(_, topic)| topics.contains(topic))
        .collect();

        let mut materials = Vec::new();
        for row in node.select(&ROWS).skip(1) {
            let cells: Vec<ElementRef<'_>> = row.select(&CELLS).collect();
            for &(idx, topic) in &wanted {
                let Some(cell) = cells.get(idx) else {
                    continue;
                };
                let text = spaced_text(*cell);
                materials.extend(split_segments(&text).filter_map(parse_material_text).map(
                    |material| Extracted {
                        material,
                        provenance: Some(topic),
                    },
                ));
            }
        }

        // The table answers the question; anything after it is page furniture
        Extraction {
            materials,
            ends_section: true,
        }
    }
}

impl MaterialStrategy for GenericTableStrategy {
    fn name(&self) -> &'static str {
        "generic-table"
    }

    fn accepts(&self, node: ElementRef<'_>) -> bool {
        node.value().name() == "table"
    }

    fn extract(&self, node: ElementRef<'_>, _topics: &[Provenance]) -> Extraction {
        let materials = node.select(&ROWS).skip(1).filter_map(|row| {
            let mut cells = row.select(&CELLS);
            let name = spaced_text(cells.next()?);
            let quantity = parse_quantity(&spaced_text(cells.next()?))?;
            (!name.is_empty()).then(|| Material::new(name, quantity))
        });
        Extraction::unlabeled(materials)
    }
}

impl MaterialStrategy for ListStrategy {
    fn name(&self) -> &'static str {
        "list"
    }

    fn accepts(&self, node: ElementRef<'_>) -> bool {
        matches!(node.value().name(), "ul" | "ol")
    }

    fn extract(&self, node: ElementRef<'_>, _topics: &[Provenance]) -> Extraction {
        let materials = node
            .select(&LIST_ITEMS)
            .filter_map(|item| parse_material_text(&spaced_text(item)));
        Extraction::unlabeled(materials)
    }
}

impl MaterialStrategy for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn accepts(&self, _node: ElementRef<'_>) -> bool {
        true
    }

    fn extract(&self, node: ElementRef<'_>, _topics: &[Provenance]) -> Extraction {
        let materials = text_lines(node)
            .into_iter()
            .filter_map(|line| parse_material_text(&line));
        Extraction::unlabeled(materials)
    }
}

/// Tries each strategy in order; the first that accepts a node wins
pub struct MaterialParser {
    strategies: Vec<Box<dyn MaterialStrategy>>,
}

impl Default for MaterialParser {
    fn default() -> Self {
        Self::new(vec![
            Box::new(LabeledTableStrategy),
            Box::new(GenericTableStrategy),
            Box::new(ListStrategy),
            Box::new(TextStrategy),
        ])
    }
}

impl MaterialParser {
    pub fn new(strategies: Vec<Box<dyn MaterialStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extracts materials from one content node of a section
    ///
    /// # Arguments
    ///
    /// * `node` - A table, list or container element
    /// * `topics` - The topics the caller wants; only labeled table columns
    ///   are filtered by this
    ///
    /// # Returns
    ///
    /// `None` if no strategy accepts the node
    pub fn parse(&self, node: ElementRef<'_>, topics: &[Provenance]) -> Option<Extraction> {
        let strategy = self.strategies.iter().find(|s| s.accepts(node))?;
        tracing::debug!(
            "Parsing <{}> with {} strategy",
            node.value().name(),
            strategy.name()
        );
        Some(strategy.extract(node, topics))
    }
}

/// Text of an element with whitespace-trimmed text nodes joined by a space
pub(crate) fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-empty lines of an element's text; `br` and block children break lines
fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut buffer = String::new();

    for node in element.descendants() {
        if let Some(text) = node.value().as_text() {
            buffer.push_str(text);
        } else if let Some(child) = node.value().as_element() {
            if matches!(child.name(), "br" | "p" | "div" | "li" | "tr") {
                buffer.push('\n');
            }
        }
    }

    buffer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
