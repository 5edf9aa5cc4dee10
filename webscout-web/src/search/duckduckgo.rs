//! DuckDuckGo search client
//!
//! Queries the DuckDuckGo HTML endpoint, which works without an API key,
//! and parses the result page with CSS selectors. Result links come back
//! as DuckDuckGo redirect URLs with the target percent-encoded in the
//! `uddg` parameter, so they are decoded before being returned.

use crate::types::SearchResult;
use scraper::{Html, Selector};
use std::time::Duration;
use urlencoding::decode;

/// Default DuckDuckGo HTML search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const RESULT_SELECTOR: &str = "div.result";
const TITLE_SELECTOR: &str = "a.result__a";
const SNIPPET_SELECTOR: &str = ".result__snippet";

/// Configuration for the DuckDuckGo client
#[derive(Debug, Clone)]
pub struct DuckDuckGoConfig {
    /// Search endpoint URL
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header for search requests
    pub user_agent: String,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(15),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Errors that can occur during DuckDuckGo search operations
#[derive(Debug, thiserror::Error)]
pub enum DuckDuckGoError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// HTML parsing error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Upstream asked us to back off
    #[error("Search rate limited by upstream")]
    RateLimited,
    /// Upstream returned a non-success status
    #[error("Search upstream returned status {status}")]
    UpstreamStatus {
        /// The HTTP status code
        status: u16,
    },
}

/// DuckDuckGo search client using the HTML endpoint
#[derive(Debug)]
pub struct DuckDuckGoClient {
    client: reqwest::Client,
    config: DuckDuckGoConfig,
}

impl DuckDuckGoClient {
    /// Creates a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(DuckDuckGoConfig::default())
    }

    /// Creates a new client with custom configuration
    pub fn with_config(config: DuckDuckGoConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, config }
    }

    /// Performs a web search, returning at most `max_results` results
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, DuckDuckGoError> {
        tracing::debug!("Starting DuckDuckGo search for: '{query}'");

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(DuckDuckGoError::RateLimited);
        }
        if !status.is_success() {
            return Err(DuckDuckGoError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(map_reqwest_error)?;
        let results = parse_results(&html, max_results)?;
        tracing::debug!("DuckDuckGo search found {} results", results.len());
        Ok(results)
    }
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_reqwest_error(error: reqwest::Error) -> DuckDuckGoError {
    if error.is_timeout() {
        DuckDuckGoError::Timeout
    } else {
        DuckDuckGoError::Network(error)
    }
}

/// Parse search results out of a DuckDuckGo HTML response
fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, DuckDuckGoError> {
    let result_selector = Selector::parse(RESULT_SELECTOR)
        .map_err(|e| DuckDuckGoError::Parse(format!("Invalid selector: {e}")))?;
    let title_selector = Selector::parse(TITLE_SELECTOR)
        .map_err(|e| DuckDuckGoError::Parse(format!("Invalid selector: {e}")))?;
    let snippet_selector = Selector::parse(SNIPPET_SELECTOR)
        .map_err(|e| DuckDuckGoError::Parse(format!("Invalid selector: {e}")))?;

    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for element in document.select(&result_selector) {
        if results.len() >= max_results {
            break;
        }

        let Some(title_link) = element.select(&title_selector).next() else {
            continue;
        };
        let title = title_link
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        let Some(href) = title_link.value().attr("href") else {
            continue;
        };

        let url = resolve_result_url(href);
        if title.is_empty() || !url.starts_with("http") {
            continue;
        }

        let snippet = element
            .select(&snippet_selector)
            .next()
            .map(|s| s.text().collect::<Vec<_>>().join(" ").trim().to_string())
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url,
            snippet,
        });
    }

    Ok(results)
}

/// Unwrap DuckDuckGo redirect URLs to their target
fn resolve_result_url(href: &str) -> String {
    let encoded = href
        .split_once("uddg=")
        .map(|(_, rest)| rest.split('&').next().unwrap_or(rest));

    if let Some(encoded_url) = encoded {
        match decode(encoded_url) {
            Ok(decoded) => decoded.to_string(),
            Err(e) => {
                tracing::warn!("Failed to decode redirect URL '{encoded_url}': {e}");
                href.to_string()
            }
        }
    } else if let Some(stripped) = href.strip_prefix("//") {
        format!("https://{stripped}")
    } else {
        href.to_string()
    }
}
