//! Item page extraction
//!
//! Combines section location and material parsing into one catalog entry
//! per item page.

use crate::catalog::{Item, Material, Provenance};
use crate::config::SectionConfig;
use crate::extract::section::{section_content, SectionLocator};
use crate::extract::strategy::MaterialParser;
use scraper::{ElementRef, Html};

/// Turns one item page into a catalog entry
///
/// The page is searched for a recycling section and a salvaging section.
/// When both searches land on the same heading (for example "Recycled &
/// Salvaged Materials") the section is read once for both topics. Salvaging
/// materials are tagged and placed after the recycling ones.
pub struct ItemExtractor {
    recycling: SectionLocator,
    salvaging: SectionLocator,
    parser: MaterialParser,
}

impl ItemExtractor {
    pub fn new(sections: &SectionConfig) -> Self {
        Self {
            recycling: SectionLocator::new(&sections.recycling_keywords),
            salvaging: SectionLocator::new(&sections.salvaging_keywords),
            parser: MaterialParser::default(),
        }
    }

    /// Builds the catalog entry for an item page
    pub fn build_item(&self, name: &str, category: &str, url: &str, html: &str) -> Item {
        Item {
            name: name.to_string(),
            category: category.to_string(),
            url: url.to_string(),
            materials: self.extract_materials(html),
        }
    }

    /// Extracts the flattened, provenance-tagged material list of a page
    ///
    /// A page without a matching heading has no materials; that is not an
    /// error.
    pub fn extract_materials(&self, html: &str) -> Vec<Material> {
        let document = Html::parse_document(html);
        let recycling = self.recycling.locate(&document);
        let salvaging = self.salvaging.locate(&document);

        let mut found = Vec::new();
        match (recycling, salvaging) {
            (Some(shared), Some(other)) if shared.id() == other.id() => {
                self.collect(
                    shared,
                    &[Provenance::Recycling, Provenance::Salvaging],
                    Provenance::Recycling,
                    &mut found,
                );
            }
            (recycling, salvaging) => {
                if let Some(heading) = recycling {
                    self.collect(
                        heading,
                        &[Provenance::Recycling],
                        Provenance::Recycling,
                        &mut found,
                    );
                }
                if let Some(heading) = salvaging {
                    self.collect(
                        heading,
                        &[Provenance::Salvaging],
                        Provenance::Salvaging,
                        &mut found,
                    );
                }
            }
        }

        let (recycled, salvaged): (Vec<_>, Vec<_>) = found
            .into_iter()
            .partition(|(provenance, _)| *provenance == Provenance::Recycling);

        recycled
            .into_iter()
            .chain(salvaged)
            .map(|(provenance, material)| material.tagged(provenance))
            .collect()
    }

    fn collect(
        &self,
        heading: ElementRef<'_>,
        topics: &[Provenance],
        section_topic: Provenance,
        found: &mut Vec<(Provenance, Material)>,
    ) {
        for node in section_content(heading) {
            let Some(extraction) = self.parser.parse(node, topics) else {
                continue;
            };

            found.extend(
                extraction
                    .materials
                    .into_iter()
                    .map(|e| (e.provenance.unwrap_or(section_topic), e.material)),
            );

            if extraction.ends_section {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ItemExtractor {
        ItemExtractor::new(&SectionConfig::default())
    }

    fn pairs(materials: &[Material]) -> Vec<(&str, u64)> {
        materials
            .iter()
            .map(|m| (m.name.as_str(), m.quantity))
            .collect()
    }

    #[test]
    fn test_combined_heading_is_read_once() {
        let html = r#"<div class="mw-parser-output">
            <h2>Recycled &amp; Salvaged Materials</h2>
            <ul><li>Steel (5)</li><li>Polymer x3</li></ul>
            <h2>Trivia</h2><ul><li>Gold (9)</li></ul>
        </div>"#;

        let materials = extractor().extract_materials(html);
        assert_eq!(pairs(&materials), vec![("Steel", 5), ("Polymer", 3)]);
    }

    #[test]
    fn test_separate_sections_tag_salvage() {
        let html = r#"
            <h2>Salvaging</h2><ul><li>Scrap x1</li></ul>
            <h2>Recycling</h2><p>Metal Parts: 2</p>
            <h3>Sources</h3><p>Copper: 8</p>"#;

        let materials = extractor().extract_materials(html);
        assert_eq!(
            pairs(&materials),
            vec![("Metal Parts", 2), ("(Salvage) Scrap", 1)]
        );
    }

    #[test]
    fn test_labeled_table_under_shared_heading() {
        let html = r#"
            <h2>Recycling and salvaging</h2>
            <table>
                <tr><th>Item</th><th>Recycling results</th><th>Salvaging results</th></tr>
                <tr><td>Ferro</td><td>Metal Parts x4</td><td>Rubber Parts x2</td></tr>
            </table>
            <p>Crafting note - 7</p>"#;

        let materials = extractor().extract_materials(html);
        assert_eq!(
            pairs(&materials),
            vec![("Metal Parts", 4), ("(Salvage) Rubber Parts", 2)]
        );
    }

    #[test]
    fn test_every_block_in_a_wrapper_is_read() {
        let html = r#"
            <h2>Recycling</h2>
            <div>
                <ul><li>Steel (5)</li></ul>
                <ul><li>Wire (2)</li></ul>
            </div>
            <div>
                <p>Fabric: 3</p>
                <table>
                    <tr><th>Material</th><th>Qty</th></tr>
                    <tr><td>Copper</td><td>4</td></tr>
                </table>
            </div>"#;

        let materials = extractor().extract_materials(html);
        assert_eq!(
            pairs(&materials),
            vec![("Steel", 5), ("Wire", 2), ("Fabric", 3), ("Copper", 4)]
        );
    }

    #[test]
    fn test_no_section_no_materials() {
        let html = r#"<h2>Description</h2><ul><li>Steel (5)</li></ul>"#;
        assert!(extractor().extract_materials(html).is_empty());
    }

    #[test]
    fn test_build_item() {
        let item = extractor().build_item(
            "Widget",
            "Loot",
            "https://arcraiders.wiki/wiki/Widget",
            "<h3>Recycling</h3><ol><li>2x Wires</li></ol>",
        );

        assert_eq!(item.name, "Widget");
        assert_eq!(item.category, "Loot");
        assert_eq!(item.materials, vec![Material::new("Wires", 2)]);
    }
}
