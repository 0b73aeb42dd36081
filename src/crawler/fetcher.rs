//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured user agent
//! - Rate limiting every request, retries included
//! - Retrying transient failures
//! - Error classification

use crate::config::{Config, UserAgentConfig};
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::retry::RetryPolicy;
use crate::{Result, TrackerError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use recycling_tracker::config::UserAgentConfig;
/// use recycling_tracker::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    // Format: ClientName/Version (+ContactURL)
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// The single HTTP client of a scrape, wrapped in rate limiting and retries
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        Self {
            client,
            limiter,
            retry,
        }
    }

    /// Builds a fetcher from the scraper, retry and user agent settings
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.scraper.request_timeout_secs),
        )?;

        Ok(Self::new(
            client,
            RateLimiter::new(Duration::from_millis(config.scraper.rate_limit_ms)),
            RetryPolicy::from_config(&config.retry),
        ))
    }

    /// Fetches an HTML page, retrying transient failures
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The page body
    /// * `Err(TrackerError::RetryExhausted)` - Every attempt failed transiently
    /// * `Err(TrackerError::ContentMismatch)` - The response was not HTML
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        self.retry.execute(|| self.fetch_once(url)).await
    }

    /// One rate-limited GET
    async fn fetch_once(&self, url: &str) -> Result<String> {
        self.limiter.wait_turn().await;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // A missing Content-Type is given the benefit of the doubt
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(TrackerError::ContentMismatch {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

/// Maps a transport error onto the retryable error variants
fn classify_error(url: &str, error: reqwest::Error) -> TrackerError {
    if error.is_timeout() {
        TrackerError::Timeout {
            url: url.to_string(),
        }
    } else {
        TrackerError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
