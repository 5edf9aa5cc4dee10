//! MCP server implementation for serving web tools

use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::sync::Arc;
use tokio::sync::RwLock;
use webscout_web::{WebConfig, WebPipeline};

use super::tool_registry::{ToolContext, ToolRegistry};
use super::tools::web::register_web_tools;

/// Server instructions displayed to MCP clients
const SERVER_INSTRUCTIONS: &str =
    "Fetch and search the public web. Use scrape_url to read a page and web_search to find pages.";

/// Create ServerCapabilities for MCP protocol
fn create_server_capabilities() -> ServerCapabilities {
    ServerCapabilities::builder().enable_tools().build()
}

/// Create Implementation information for the MCP server
fn create_server_implementation() -> Implementation {
    Implementation::new("webscout", crate::VERSION)
        .with_title("WebScout MCP Server")
        .with_website_url("https://github.com/webscout/webscout")
}

/// MCP server exposing the WebScout tools.
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<RwLock<ToolRegistry>>,
    /// Shared execution context handed to every tool call
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a new MCP server from the given configuration.
    ///
    /// Builds the shared web pipeline and registers all tools.
    pub fn new(config: WebConfig) -> Self {
        let pipeline = Arc::new(WebPipeline::new(config.clone()));
        let tool_context = Arc::new(ToolContext::new(pipeline, config));

        let mut tool_registry = ToolRegistry::new();
        register_web_tools(&mut tool_registry);
        tracing::debug!(
            "Registered {} tools: {:?}",
            tool_registry.len(),
            tool_registry.list_tool_names()
        );

        Self {
            tool_registry: Arc::new(RwLock::new(tool_registry)),
            tool_context,
        }
    }

    /// List all available tools from the tool registry.
    pub async fn list_tools(&self) -> Vec<rmcp::model::Tool> {
        self.tool_registry.read().await.list_tools()
    }

    /// Check whether a tool with the given name is registered.
    pub async fn has_tool(&self, name: &str) -> bool {
        self.tool_registry.read().await.get_tool(name).is_some()
    }

    /// Execute a tool by name with the given arguments.
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, McpError> {
        let registry = self.tool_registry.read().await;
        if let Some(tool) = registry.get_tool(name) {
            let arguments_map = match arguments {
                serde_json::Value::Object(map) => map,
                _ => serde_json::Map::new(),
            };
            tool.execute(arguments_map, &self.tool_context).await
        } else {
            Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            ))
        }
    }
}

impl ServerHandler for McpServer {
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        tracing::info!(
            "MCP client connecting: {} v{}",
            request.client_info.name,
            request.client_info.version
        );

        Ok(InitializeResult::new(create_server_capabilities())
            .with_server_info(create_server_implementation())
            .with_instructions(SERVER_INSTRUCTIONS))
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(
            self.tool_registry.read().await.list_tools(),
        ))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        tracing::debug!(
            "call_tool() invoked for tool: {}, arguments: {:?}",
            request.name,
            request.arguments
        );

        let registry = self.tool_registry.read().await;
        let tool = registry.get_tool(&request.name).ok_or_else(|| {
            tracing::error!("Unknown tool requested: {}", request.name);
            McpError::invalid_request(format!("Unknown tool: {}", request.name), None)
        })?;

        let arguments = request.arguments.unwrap_or_default();
        tracing::info!("Executing tool: {}", request.name);
        let result = tool.execute(arguments, &self.tool_context).await;
        tracing::debug!("Tool execution result for {}: {:?}", request.name, result);
        result
    }

    fn get_info(&self) -> ServerInfo {
        InitializeResult::new(create_server_capabilities())
            .with_server_info(create_server_implementation())
            .with_instructions(SERVER_INSTRUCTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_registers_web_tools() {
        let server = McpServer::new(WebConfig::default());

        assert!(server.has_tool("scrape_url").await);
        assert!(server.has_tool("web_search").await);
        assert!(!server.has_tool("nonexistent").await);

        let tools = server.list_tools().await;
        assert_eq!(tools.len(), 2);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let server = McpServer::new(WebConfig::default());
        let result = server
            .execute_tool("missing", serde_json::json!({}))
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_execute_tool_with_bad_arguments() {
        let server = McpServer::new(WebConfig::default());
        let result = server.execute_tool("scrape_url", serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_server_info() {
        let server = McpServer::new(WebConfig::default());
        let info = server.get_info();
        assert_eq!(info.server_info.name, "webscout");
        assert!(info.capabilities.tools.is_some());
    }
}
