//! Web tools for MCP operations
//!
//! Provides two tools backed by the shared [`webscout_web::WebPipeline`]:
//! - `scrape_url`: fetch a page and extract its readable text
//! - `web_search`: search the web via DuckDuckGo

pub mod scrape;
pub mod search;

pub use scrape::ScrapeUrlTool;
pub use search::WebSearchTool;

use crate::mcp::tool_registry::ToolRegistry;

/// Register the web tools with the registry
pub fn register_web_tools(registry: &mut ToolRegistry) {
    registry.register(ScrapeUrlTool::new());
    registry.register(WebSearchTool::new());
}
