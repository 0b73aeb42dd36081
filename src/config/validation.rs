use crate::config::types::{
    CategoryEntry, Config, OutputConfig, ScraperConfig, SectionConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_section_config(&config.sections)?;
    validate_output_config(&config.output)?;
    validate_listing_url("loot url", &config.scraper.base_url, &config.loot.url)?;
    validate_categories(&config.scraper.base_url, &config.categories)?;
    Ok(())
}

/// Validates request and parsing settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if !config.wiki_path_prefix.starts_with('/') || !config.wiki_path_prefix.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "wiki-path-prefix must start and end with '/', got '{}'",
            config.wiki_path_prefix
        )));
    }

    if scraper::Selector::parse(&config.content_selector).is_err() {
        return Err(ConfigError::Validation(format!(
            "content-selector is not a valid CSS selector: '{}'",
            config.content_selector
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Client name: non-empty, alphanumeric + hyphens only
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client-name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    if config.client_version.is_empty() {
        return Err(ConfigError::Validation(
            "client-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

fn validate_section_config(config: &SectionConfig) -> Result<(), ConfigError> {
    for (label, keywords) in [
        ("recycling-keywords", &config.recycling_keywords),
        ("salvaging-keywords", &config.salvaging_keywords),
    ] {
        if keywords.is_empty() || keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-empty list of non-empty keywords",
                label
            )));
        }
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.catalog_path.is_empty() {
        return Err(ConfigError::Validation(
            "catalog-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates category entries: non-empty unique names, valid listing URLs
fn validate_categories(base_url: &str, categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in categories {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name '{}'",
                entry.name
            )));
        }

        validate_listing_url(
            &format!("category '{}' url", entry.name),
            base_url,
            &entry.url,
        )?;
    }

    Ok(())
}

fn validate_http_url(label: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", label, value, e)))?;
    require_http(label, &url)
}

/// Listing URLs may be absolute or relative to `base-url`
fn validate_listing_url(label: &str, base_url: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .and_then(|base| base.join(value))
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", label, value, e)))?;
    require_http(label, &url)
}

fn require_http(label: &str, url: &Url) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            label, url
        )));
    }

    Ok(())
}
