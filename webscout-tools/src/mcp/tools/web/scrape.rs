//! Scrape tool that fetches a URL and returns its readable text

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use webscout_web::pipeline::WebError;
use webscout_web::types::ScrapeRequest;

/// Tool for fetching a web page and extracting its text content
#[derive(Default)]
pub struct ScrapeUrlTool;

impl ScrapeUrlTool {
    /// Create a new scrape tool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ScrapeUrlTool {
    fn name(&self) -> &'static str {
        "scrape_url"
    }

    fn description(&self) -> &'static str {
        include_str!("scrape_description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(ScrapeRequest))
            .unwrap_or_else(|_| serde_json::json!({"type": "object"}))
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ScrapeRequest = BaseToolImpl::parse_arguments(arguments)?;

        tracing::info!("Scraping URL: {}", request.url);

        match context.pipeline.scrape(&request).await {
            Ok(page) => {
                tracing::info!(
                    "Scrape completed for {} ({} chars, truncated: {})",
                    page.url,
                    page.text.chars().count(),
                    page.truncated
                );
                Ok(BaseToolImpl::create_success_response(page.to_markdown()))
            }
            Err(e) => scrape_error_response(&request.url, e),
        }
    }
}

/// Map pipeline errors to the appropriate MCP response
///
/// Request validation failures are protocol errors, everything else comes
/// back as an error result the client can inspect.
fn scrape_error_response(
    url: &str,
    error: WebError,
) -> std::result::Result<CallToolResult, McpError> {
    match error {
        WebError::InvalidUrl(_)
        | WebError::SchemeNotAllowed(_)
        | WebError::BlockedHost(_)
        | WebError::PrivateAddress(_) => Err(McpError::invalid_params(error.to_string(), None)),
        _ => {
            tracing::warn!("Scrape failed for {url}: {error}");

            let mut metadata = serde_json::json!({
                "url": url,
                "error_type": error.error_type(),
                "error_details": error.to_string(),
            });
            if let WebError::TooManyRequests { retry_after } = &error {
                metadata["retry_after_ms"] =
                    serde_json::Value::from(retry_after.as_millis() as u64);
            }

            Ok(BaseToolImpl::create_error_response(
                serde_json::to_string_pretty(&metadata)
                    .unwrap_or_else(|_| error.to_string()),
            ))
        }
    }
}
