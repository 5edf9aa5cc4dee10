//! # WebScout Tools
//!
//! MCP (Model Context Protocol) tools and server implementation for WebScout.
//!
//! This crate exposes the web pipeline from `webscout-web` as MCP tools:
//!
//! - **scrape_url**: Fetch a URL and extract its readable text
//! - **web_search**: Search the web via DuckDuckGo
//!
//! The server runs over stdio (the default for MCP clients) or HTTP.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webscout_tools::McpServer;
//! use webscout_web::WebConfig;
//!
//! let server = McpServer::new(WebConfig::from_env());
//! // Server is ready to handle MCP requests
//! ```

#![warn(missing_docs)]

/// Model Context Protocol (MCP) server and tools
pub mod mcp;

/// Test utilities
#[cfg(test)]
pub mod test_utils;

// Re-export key types for convenience
pub use mcp::McpServer;
pub use mcp::{register_web_tools, run_stdio_server, start_mcp_server, McpServerMode};
pub use mcp::{ToolContext, ToolRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
