//! Search tool backed by the DuckDuckGo pipeline

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use webscout_web::pipeline::WebError;
use webscout_web::types::SearchRequest;

/// Tool for searching the web and returning result summaries
#[derive(Default)]
pub struct WebSearchTool;

impl WebSearchTool {
    /// Create a new search tool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        include_str!("search_description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(SearchRequest))
            .unwrap_or_else(|_| serde_json::json!({"type": "object"}))
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: SearchRequest = BaseToolImpl::parse_arguments(arguments)?;

        if request.query.trim().is_empty() {
            return Err(McpError::invalid_params(
                "Search query cannot be empty",
                None,
            ));
        }

        // Out-of-range max_results is clamped by the pipeline, not rejected

        tracing::info!(
            "Starting web search: '{}', max_results: {:?}",
            request.query,
            request.max_results
        );

        match context.pipeline.search(&request).await {
            Ok(response) => {
                tracing::info!(
                    "Web search completed: {} results for '{}' in {}ms",
                    response.metadata.results_count,
                    response.metadata.query,
                    response.metadata.search_time_ms
                );
                Ok(BaseToolImpl::create_success_response(response.to_markdown()))
            }
            Err(e) => search_error_response(&request.query, e),
        }
    }
}

fn search_error_response(
    query: &str,
    error: WebError,
) -> std::result::Result<CallToolResult, McpError> {
    tracing::warn!("Web search failed for '{query}': {error}");

    let mut metadata = serde_json::json!({
        "query": query,
        "error_type": error.error_type(),
        "error_details": error.to_string(),
    });
    if let WebError::TooManyRequests { retry_after } = &error {
        metadata["retry_after_ms"] = serde_json::Value::from(retry_after.as_millis() as u64);
    }

    Ok(BaseToolImpl::create_error_response(
        serde_json::to_string_pretty(&metadata).unwrap_or_else(|_| error.to_string()),
    ))
}
