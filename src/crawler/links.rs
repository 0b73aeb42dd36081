//! Item link discovery on listing pages
//!
//! A listing page (a category page or the Loot index) enumerates links to
//! item pages. Two layouts are understood:
//! - An item table, where the first cell of each row links the item
//! - Loose links anywhere in the page content
//!
//! Strategies are tried in that order; the first one that applies to the
//! content region is the only one used.

use crate::extract::spaced_text;
use crate::{ConfigError, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static TABLES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static DATA_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid selector"));

/// A discovered item page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLink {
    /// Visible link text
    pub name: String,

    /// Absolute URL of the item page
    pub url: String,
}

/// Which resolved links count as item pages
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    /// Path prefix of article pages, e.g. `/wiki/`
    pub wiki_prefix: String,

    /// Exact paths never treated as items (the listing page itself)
    pub excluded_paths: Vec<String>,
}

impl ExclusionRules {
    pub fn new(wiki_prefix: impl Into<String>) -> Self {
        Self {
            wiki_prefix: wiki_prefix.into(),
            excluded_paths: Vec::new(),
        }
    }

    /// Adds an excluded path
    pub fn excluding(mut self, path: impl Into<String>) -> Self {
        self.excluded_paths.push(path.into());
        self
    }

    /// Same site as the listing page and under the wiki prefix
    fn is_wiki_page(&self, url: &Url, page: &Url) -> bool {
        url.origin() == page.origin() && url.path().starts_with(&self.wiki_prefix)
    }

    /// `Category:`, `File:`, `Special:` and similar pages
    fn is_namespaced(&self, url: &Url) -> bool {
        url.path().contains(':')
    }

    fn is_excluded(&self, url: &Url) -> bool {
        self.excluded_paths.iter().any(|p| p == url.path())
    }
}

/// A candidate anchor, already resolved against the listing page
struct Candidate {
    name: String,
    url: Url,
}

fn resolve(anchor: ElementRef<'_>, page: &Url) -> Option<Candidate> {
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let url = page.join(href).ok()?;
    let name = spaced_text(anchor);
    if name.is_empty() {
        return None;
    }

    Some(Candidate { name, url })
}

/// One way of reading item links off a listing page
pub trait LinkStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this strategy handles the given content region
    fn applies(&self, content: ElementRef<'_>) -> bool;

    /// Item links in document order, possibly with duplicates
    fn extract(&self, content: ElementRef<'_>, page: &Url, rules: &ExclusionRules)
        -> Vec<ItemLink>;
}

/// First-column links of the first table's data rows
#[derive(Debug, Default)]
pub struct TableLinks;

/// Every wiki article link in the content region
#[derive(Debug, Default)]
pub struct AnchorScan;

impl LinkStrategy for TableLinks {
    fn name(&self) -> &'static str {
        "table"
    }

    fn applies(&self, content: ElementRef<'_>) -> bool {
        content.select(&TABLES).next().is_some()
    }

    fn extract(
        &self,
        content: ElementRef<'_>,
        page: &Url,
        rules: &ExclusionRules,
    ) -> Vec<ItemLink> {
        let Some(table) = content.select(&TABLES).next() else {
            return Vec::new();
        };

        table
            .select(&ROWS)
            .skip(1)
            .filter_map(|row| row.select(&DATA_CELLS).next())
            .filter_map(|cell| {
                // Image links usually precede the name link in the first cell
                cell.select(&ANCHORS)
                    .filter_map(|a| resolve(a, page))
                    .find(|c| rules.is_wiki_page(&c.url, page) && !rules.is_namespaced(&c.url))
            })
            .map(|c| ItemLink {
                name: c.name,
                url: c.url.to_string(),
            })
            .collect()
    }
}

impl LinkStrategy for AnchorScan {
    fn name(&self) -> &'static str {
        "anchor scan"
    }

    fn applies(&self, _content: ElementRef<'_>) -> bool {
        true
    }

    fn extract(
        &self,
        content: ElementRef<'_>,
        page: &Url,
        rules: &ExclusionRules,
    ) -> Vec<ItemLink> {
        content
            .select(&ANCHORS)
            .filter_map(|a| resolve(a, page))
            .filter(|c| {
                rules.is_wiki_page(&c.url, page)
                    && !rules.is_namespaced(&c.url)
                    && c.url.fragment().is_none()
                    && !rules.is_excluded(&c.url)
            })
            .map(|c| ItemLink {
                name: c.name,
                url: c.url.to_string(),
            })
            .collect()
    }
}

/// Extracts item links from listing pages
pub struct LinkDiscovery {
    content: Selector,
    strategies: Vec<Box<dyn LinkStrategy>>,
}

impl LinkDiscovery {
    /// Creates a discovery pass scoped to the element matching `content_selector`
    pub fn new(content_selector: &str) -> Result<Self> {
        let content = Selector::parse(content_selector).map_err(|e| {
            ConfigError::Validation(format!(
                "invalid content selector '{}': {}",
                content_selector, e
            ))
        })?;

        Ok(Self {
            content,
            strategies: vec![Box::new(TableLinks), Box::new(AnchorScan)],
        })
    }

    /// Returns the item links of a listing page, de-duplicated by URL
    ///
    /// # Arguments
    ///
    /// * `html` - The listing page body
    /// * `page` - The listing page URL, used to resolve relative links
    /// * `rules` - Which links count as item pages
    pub fn discover(&self, html: &str, page: &Url, rules: &ExclusionRules) -> Vec<ItemLink> {
        let document = Html::parse_document(html);
        let content = document
            .select(&self.content)
            .next()
            .unwrap_or_else(|| document.root_element());

        let Some(strategy) = self.strategies.iter().find(|s| s.applies(content)) else {
            return Vec::new();
        };
        tracing::debug!("Reading links of {} with {} strategy", page, strategy.name());

        let mut seen = HashSet::new();
        strategy
            .extract(content, page, rules)
            .into_iter()
            .filter(|link| seen.insert(link.url.clone()))
            .collect()
    }
}
