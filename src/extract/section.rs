//! Section location
//!
//! A section is the part of an item page between a heading whose text
//! matches a topic keyword and the next `h2`–`h4`. Wikis wrap section content
//! in arbitrary containers, so the walk follows document order rather than
//! siblings.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4").expect("valid selector"));
static TABLES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static LISTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul, ol").expect("valid selector"));

/// How the section walk treats an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `h2`–`h4`: ends the section
    Heading,
    Table,
    /// `ul` or `ol`
    List,
    /// `div`, `p` or `section`
    Container,
    Other,
}

impl NodeKind {
    pub fn of(element: ElementRef<'_>) -> Self {
        match element.value().name() {
            "h2" | "h3" | "h4" => Self::Heading,
            "table" => Self::Table,
            "ul" | "ol" => Self::List,
            "div" | "p" | "section" => Self::Container,
            _ => Self::Other,
        }
    }
}

/// Finds the heading of one topic's section
#[derive(Debug, Clone)]
pub struct SectionLocator {
    keywords: Vec<String>,
}

impl SectionLocator {
    /// Creates a locator; keywords match case-insensitively as substrings
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns the first `h2`–`h4` in document order whose text contains any keyword
    pub fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&HEADINGS).find(|heading| {
            let text = heading.text().collect::<String>().to_lowercase();
            self.keywords.iter().any(|kw| text.contains(kw.as_str()))
        })
    }
}

/// Collects the content nodes of the section that starts at `heading`
///
/// Returned nodes are tables, lists, or text containers, in document order.
/// A container holding a table, list or section heading is descended into,
/// so every block inside it is reached and a nested heading still ends the
/// walk. Any other container is returned whole as a text block. Once a node
/// is returned its descendants are not visited again.
pub fn section_content(heading: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut content = Vec::new();
    let mut next = next_element(heading, false);

    while let Some(element) = next {
        let descend = match NodeKind::of(element) {
            NodeKind::Heading => break,
            NodeKind::Table | NodeKind::List => {
                content.push(element);
                false
            }
            NodeKind::Container if has_block_content(element) => true,
            NodeKind::Container => {
                content.push(element);
                false
            }
            NodeKind::Other => true,
        };
        next = next_element(element, descend);
    }

    content
}

fn has_block_content(element: ElementRef<'_>) -> bool {
    element.select(&HEADINGS).next().is_some()
        || element.select(&TABLES).next().is_some()
        || element.select(&LISTS).next().is_some()
}

/// The next element in document order, optionally skipping `element`'s subtree
fn next_element(element: ElementRef<'_>, descend: bool) -> Option<ElementRef<'_>> {
    if descend {
        if let Some(child) = element.children().find_map(ElementRef::wrap) {
            return Some(child);
        }
    }

    let mut current = element;
    loop {
        if let Some(sibling) = current.next_siblings().find_map(ElementRef::wrap) {
            return Some(sibling);
        }
        current = current.parent().and_then(ElementRef::wrap)?;
    }
}
