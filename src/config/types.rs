use serde::Deserialize;

/// Main configuration structure for Recycling Tracker
///
/// Every section is optional; a missing section takes the defaults for the
/// Arc Raiders wiki.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub retry: RetryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub sections: SectionConfig,
    pub output: OutputConfig,
    pub loot: LootConfig,
    #[serde(rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// Request and parsing behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Wiki origin; relative category and loot URLs are resolved against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path prefix every item page link must start with
    #[serde(rename = "wiki-path-prefix")]
    pub wiki_path_prefix: String,

    /// CSS selector of the main content region of a page
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Minimum time between two requests (milliseconds)
    #[serde(rename = "rate-limit-ms")]
    pub rate_limit_ms: u64,

    /// Per-request deadline (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

/// Retry behavior for network requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Delay before each retry (milliseconds); the last one repeats
    #[serde(rename = "delays-ms")]
    pub delays_ms: Vec<u64>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "client-name")]
    pub client_name: String,

    #[serde(rename = "client-version")]
    pub client_version: String,

    /// Optional URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

/// Heading keywords that identify the material sections of an item page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    #[serde(rename = "recycling-keywords")]
    pub recycling_keywords: Vec<String>,

    #[serde(rename = "salvaging-keywords")]
    pub salvaging_keywords: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON catalog file
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,
}

/// The index page listing every loot item
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub url: String,
}

/// A named category and its listing page
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub url: String,
}

const WIKI_ORIGIN: &str = "https://arcraiders.wiki";

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            retry: RetryConfig::default(),
            user_agent: UserAgentConfig::default(),
            sections: SectionConfig::default(),
            output: OutputConfig::default(),
            loot: LootConfig::default(),
            categories: default_categories(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: WIKI_ORIGIN.to_string(),
            wiki_path_prefix: "/wiki/".to_string(),
            content_selector: "div.mw-parser-output".to_string(),
            rate_limit_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delays_ms: vec![1000, 2000, 4000],
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: "ArcRaidersRecyclingTracker".to_string(),
            client_version: "1.0".to_string(),
            contact_url: None,
        }
    }
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            recycling_keywords: vec![
                "recycling".to_string(),
                "recycled".to_string(),
                "recycling results".to_string(),
            ],
            salvaging_keywords: vec![
                "salvaging".to_string(),
                "salvaged".to_string(),
                "salvaging results".to_string(),
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            catalog_path: "output/recycling_data.json".to_string(),
        }
    }
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            url: format!("{WIKI_ORIGIN}/wiki/Loot"),
        }
    }
}

fn default_categories() -> Vec<CategoryEntry> {
    [
        ("Weapons", "Weapons"),
        ("Augments", "Augments"),
        ("Shields", "Shields"),
        ("Healing", "Healing"),
        ("Quick Use", "Quick_Use"),
        ("Grenades", "Grenades"),
        ("Traps", "Traps"),
    ]
    .into_iter()
    .map(|(name, page)| CategoryEntry {
        name: name.to_string(),
        url: format!("{WIKI_ORIGIN}/wiki/{page}"),
    })
    .collect()
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.client_name, self.client_version, contact
            ),
            None => format!("{}/{}", self.client_name, self.client_version),
        }
    }
}
