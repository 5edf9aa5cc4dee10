//! Scrape and search pipeline
//!
//! Composes the rate limiter, security validator, fetcher, extractor, and
//! search client into the two operations the tools expose. Every operation
//! runs the same gauntlet: rate limit, validate, fetch, content-type gate,
//! extract, truncate.

use crate::config::WebConfig;
use crate::extract::extract_text;
use crate::fetch::{FetchError, WebFetcher};
use crate::search::duckduckgo::{DuckDuckGoClient, DuckDuckGoError};
use crate::security::SecurityError;
use crate::types::{ScrapeRequest, ScrapedPage, SearchMetadata, SearchRequest, SearchResponse};
use std::sync::Arc;
use std::time::{Duration, Instant};
use webscout_common::rate_limiter::{MinIntervalLimiter, RateLimitChecker, RateLimitError};

/// Marker appended when extracted text is cut off at the length limit
const TRUNCATION_MARKER: &str = "\n\n[Content truncated]";

/// Errors surfaced to tool callers, one variant per failure class
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// URL scheme is not on the allow-list
    #[error("Scheme '{0}' is not allowed")]
    SchemeNotAllowed(String),
    /// Host name is on the block-list
    #[error("Host '{0}' is blocked")]
    BlockedHost(String),
    /// Host resolves to a non-public address
    #[error("Refusing to fetch private address: {0}")]
    PrivateAddress(String),
    /// Response content type is not supported
    #[error("Unsupported content type '{0}'")]
    UnsupportedContentType(String),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Caller is sending requests faster than the minimum interval
    #[error("Too many requests, retry after {}ms", retry_after.as_millis())]
    TooManyRequests {
        /// How long to wait before retrying
        retry_after: Duration,
    },
    /// Upstream returned a non-success status
    #[error("Upstream returned status {status}")]
    UpstreamError {
        /// The HTTP status code
        status: u16,
    },
    /// Fetch failed below the HTTP layer (transport, redirect handling)
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
    /// Search failed below the HTTP layer
    #[error("Search failed: {0}")]
    SearchFailed(String),
}

impl WebError {
    /// Stable machine-readable code for this error class
    pub fn error_type(&self) -> &'static str {
        match self {
            WebError::InvalidUrl(_) => "invalid_url",
            WebError::SchemeNotAllowed(_) => "scheme_not_allowed",
            WebError::BlockedHost(_) => "blocked_host",
            WebError::PrivateAddress(_) => "private_address",
            WebError::UnsupportedContentType(_) => "unsupported_content_type",
            WebError::Timeout => "timeout",
            WebError::TooManyRequests { .. } => "too_many_requests",
            WebError::UpstreamError { .. } => "upstream_error",
            WebError::FetchFailed(_) => "fetch_error",
            WebError::SearchFailed(_) => "search_error",
        }
    }

    /// Whether the caller can reasonably retry after a delay
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebError::Timeout
                | WebError::TooManyRequests { .. }
                | WebError::UpstreamError { status: 500..=599 }
        )
    }
}

impl From<SecurityError> for WebError {
    fn from(error: SecurityError) -> Self {
        match error {
            SecurityError::InvalidUrl { url, reason } => {
                WebError::InvalidUrl(format!("{url}: {reason}"))
            }
            // A host with no usable addresses is treated like a blocked host
            SecurityError::Resolution { host } => WebError::BlockedHost(host),
            SecurityError::ResolutionTimeout { .. } => WebError::Timeout,
            SecurityError::SchemeNotAllowed { scheme } => WebError::SchemeNotAllowed(scheme),
            SecurityError::BlockedHost { host } => WebError::BlockedHost(host),
            SecurityError::PrivateAddress { address, range } => {
                WebError::PrivateAddress(format!("{address} ({range})"))
            }
        }
    }
}

impl From<FetchError> for WebError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Security(security) => security.into(),
            FetchError::Timeout => WebError::Timeout,
            FetchError::UpstreamStatus { status } => WebError::UpstreamError { status },
            FetchError::UnsupportedContentType { content_type } => {
                WebError::UnsupportedContentType(content_type)
            }
            other => WebError::FetchFailed(other.to_string()),
        }
    }
}

impl From<RateLimitError> for WebError {
    fn from(error: RateLimitError) -> Self {
        WebError::TooManyRequests {
            retry_after: error.retry_after,
        }
    }
}

impl From<DuckDuckGoError> for WebError {
    fn from(error: DuckDuckGoError) -> Self {
        match error {
            DuckDuckGoError::Timeout => WebError::Timeout,
            DuckDuckGoError::RateLimited => WebError::UpstreamError { status: 429 },
            DuckDuckGoError::UpstreamStatus { status } => WebError::UpstreamError { status },
            other => WebError::SearchFailed(other.to_string()),
        }
    }
}

/// The scrape and search pipeline behind the MCP tools
pub struct WebPipeline {
    config: WebConfig,
    rate_limiter: Arc<dyn RateLimitChecker>,
    fetcher: WebFetcher,
    search_client: DuckDuckGoClient,
}

impl WebPipeline {
    /// Create a pipeline from configuration with default components
    pub fn new(config: WebConfig) -> Self {
        let rate_limiter = Arc::new(MinIntervalLimiter::with_min_interval(
            config.min_request_interval,
        ));
        let fetcher = WebFetcher::new(config.clone());
        let search_client = DuckDuckGoClient::new();
        Self {
            config,
            rate_limiter,
            fetcher,
            search_client,
        }
    }

    /// Create a pipeline with caller-supplied components
    pub fn with_components(
        config: WebConfig,
        rate_limiter: Arc<dyn RateLimitChecker>,
        fetcher: WebFetcher,
        search_client: DuckDuckGoClient,
    ) -> Self {
        Self {
            config,
            rate_limiter,
            fetcher,
            search_client,
        }
    }

    /// The configuration this pipeline runs with
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Fetch a page and extract its text content
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapedPage, WebError> {
        self.rate_limiter.check_rate_limit("scrape_url")?;

        let document = self.fetcher.fetch(&request.url).await?;
        let text = extract_text(&document.body);
        let (text, text_truncated) = truncate_chars(&text, self.config.max_content_length);

        tracing::info!(
            "Scraped {} ({} chars{})",
            document.url,
            text.chars().count(),
            if text_truncated { ", truncated" } else { "" }
        );

        Ok(ScrapedPage {
            url: document.url.to_string(),
            text,
            truncated: text_truncated || document.body_truncated,
        })
    }

    /// Run a web search and return structured results
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, WebError> {
        self.rate_limiter.check_rate_limit("web_search")?;

        let max_results = request.resolved_max_results(self.config.default_search_results);
        let started = Instant::now();
        let results = self.search_client.search(&request.query, max_results).await?;
        let search_time_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            "Search for '{}' returned {} results in {}ms",
            request.query,
            results.len(),
            search_time_ms
        );

        Ok(SearchResponse {
            metadata: SearchMetadata {
                query: request.query.clone(),
                results_count: results.len(),
                search_time_ms,
            },
            results,
        })
    }
}

/// Truncate to a character count, appending a marker when cut
fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut truncated = text[..byte_index].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            (truncated, true)
        }
        None => (text.to_string(), false),
    }
}
