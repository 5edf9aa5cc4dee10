//! Core types for scrape and search operations
//!
//! This module defines the data structures used for scrape requests,
//! search requests and responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum number of search results that can be requested
pub const MIN_SEARCH_RESULTS: usize = 1;

/// Maximum number of search results that can be requested
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Default number of search results
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

// ============================================================================
// Scrape Types
// ============================================================================

/// Request to scrape a web page into plain text
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeRequest {
    /// The URL to scrape (must be a public HTTP/HTTPS URL)
    #[schemars(length(min = 1, max = 2048))]
    pub url: String,
}

/// Plain text extracted from a scraped page
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapedPage {
    /// The URL the content was fetched from, after following redirects
    pub url: String,

    /// Extracted plain text
    pub text: String,

    /// Whether the text was cut off at the content length limit
    pub truncated: bool,
}

impl ScrapedPage {
    /// Render the page as a markdown block for tool output
    pub fn to_markdown(&self) -> String {
        format!("## Content from {}\n\n{}", self.url, self.text)
    }
}

// ============================================================================
// Search Types
// ============================================================================

/// Request structure for web search operations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// The search query string
    #[schemars(length(min = 1, max = 500))]
    pub query: String,

    /// Number of search results to return (optional, defaults to 5)
    #[serde(default = "default_max_results")]
    #[schemars(range(min = 1, max = 20))]
    pub max_results: Option<usize>,
}

fn default_max_results() -> Option<usize> {
    Some(DEFAULT_SEARCH_RESULTS)
}

impl SearchRequest {
    /// Resolve the requested result count, clamped to the supported range
    pub fn resolved_max_results(&self, default: usize) -> usize {
        clamp_max_results(self.max_results.unwrap_or(default))
    }
}

/// Clamp a requested result count to the supported range
pub fn clamp_max_results(requested: usize) -> usize {
    requested.clamp(MIN_SEARCH_RESULTS, MAX_SEARCH_RESULTS)
}

/// Individual search result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    /// Page title
    pub title: String,

    /// Page URL
    pub url: String,

    /// Page description/snippet
    pub snippet: String,
}

/// Metadata about the search operation
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchMetadata {
    /// The search query that was executed
    pub query: String,

    /// Number of results returned
    pub results_count: usize,

    /// Time taken for the search operation in milliseconds
    pub search_time_ms: u64,
}

/// Response structure for web search operations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    /// Search results
    pub results: Vec<SearchResult>,

    /// Metadata about the search operation
    pub metadata: SearchMetadata,
}

impl SearchResponse {
    /// Render the response as a markdown block for tool output
    pub fn to_markdown(&self) -> String {
        if self.results.is_empty() {
            return format!(
                "## Search Results for: {}\n\nNo results found.",
                self.metadata.query
            );
        }

        let mut output = format!("## Search Results for: {}\n", self.metadata.query);
        for (index, result) in self.results.iter().enumerate() {
            output.push_str(&format!(
                "\n{}. **{}**\n   URL: {}\n   {}\n",
                index + 1,
                result.title,
                result.url,
                result.snippet
            ));
        }
        output
    }
}
