//! WebScout Web
//!
//! Core crate for safe web scraping and search functionality.
//! Provides URL security validation, pinned-address fetching with manual
//! redirect handling, HTML-to-text extraction, and DuckDuckGo search.
//!
//! This crate contains pure web domain logic with no MCP protocol dependency.
//! The MCP tool adapters live in `webscout-tools`.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod search;
pub mod security;
pub mod types;

// Re-export key types
pub use config::WebConfig;
pub use extract::extract_text;
pub use fetch::{FetchError, FetchedDocument, WebFetcher};
pub use pipeline::{WebError, WebPipeline};
pub use search::duckduckgo::{DuckDuckGoClient, DuckDuckGoError};
pub use security::{SecurityError, SecurityPolicy, SecurityValidator, ValidatedUrl};
pub use types::{
    ScrapeRequest, ScrapedPage, SearchMetadata, SearchRequest, SearchResponse, SearchResult,
    DEFAULT_SEARCH_RESULTS, MAX_SEARCH_RESULTS, MIN_SEARCH_RESULTS,
};
