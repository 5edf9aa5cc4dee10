//! Web search functionality
//!
//! Currently backed by the DuckDuckGo HTML endpoint, which needs no API key.

pub mod duckduckgo;

pub use duckduckgo::{DuckDuckGoClient, DuckDuckGoError};
