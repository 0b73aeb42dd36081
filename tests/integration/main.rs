//! Integration tests for Recycling Tracker
//!
//! These tests use wiremock to serve wiki pages and run the full scrape
//! cycle end-to-end, then persist and reload the catalog.

mod catalog_tests;
mod scrape_tests;

use recycling_tracker::config::{CategoryEntry, Config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock wiki
///
/// Rate limiting and retry delays are shortened to a millisecond.
pub fn create_test_config(server: &MockServer, categories: &[(&str, &str)]) -> Config {
    let mut config = Config::default();
    config.scraper.base_url = server.uri();
    config.scraper.rate_limit_ms = 1;
    config.scraper.request_timeout_secs = 5;
    config.retry.max_retries = 2;
    config.retry.delays_ms = vec![1];
    config.loot.url = format!("{}/wiki/Loot", server.uri());
    config.categories = categories
        .iter()
        .map(|(name, page)| CategoryEntry {
            name: name.to_string(),
            url: format!("{}{}", server.uri(), page),
        })
        .collect();
    config
}

/// Serves `body` as an HTML page at `page`
pub async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Answers every request for `page` with `status`
pub async fn mount_status(server: &MockServer, page: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Wraps page content the way MediaWiki renders it
pub fn wiki_page(content: &str) -> String {
    format!(
        r#"<html><head><title>Arc Raiders Wiki</title></head><body>
        <nav><a href="/wiki/Main_Page">Main Page</a></nav>
        <div class="mw-parser-output">{}</div>
        </body></html>"#,
        content
    )
}
