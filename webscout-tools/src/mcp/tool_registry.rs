//! Tool registry for managing MCP tools
//!
//! This module provides the infrastructure the MCP server uses to register,
//! discover, and execute tools. Tools implement the [`McpTool`] trait and are
//! held in a [`ToolRegistry`]; the shared state they need at execution time
//! travels in a [`ToolContext`].

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, Tool};
use rmcp::ErrorData as McpError;
use std::collections::HashMap;
use std::sync::Arc;
use webscout_web::{WebConfig, WebPipeline};

/// Context passed to tool execution containing shared pipeline state
#[derive(Clone)]
pub struct ToolContext {
    /// The web pipeline shared by all tools
    pub pipeline: Arc<WebPipeline>,
    /// Effective configuration, kept for tools that need limits or defaults
    pub config: WebConfig,
}

impl ToolContext {
    /// Create a new tool context around a shared pipeline
    pub fn new(pipeline: Arc<WebPipeline>, config: WebConfig) -> Self {
        Self { pipeline, config }
    }
}

/// Trait for MCP tools that can be registered and executed
///
/// Each tool provides its name, description, and JSON schema, plus an
/// execute method that receives parsed arguments and the shared context.
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name as exposed over MCP
    fn name(&self) -> &'static str;

    /// Get the tool's description shown to MCP clients
    fn description(&self) -> &'static str;

    /// Get the JSON schema for the tool's arguments
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .values()
            .map(|tool| {
                let schema = tool.schema();
                let schema_map = if let serde_json::Value::Object(map) = schema {
                    map
                } else {
                    serde_json::Map::new()
                };

                Tool::new(tool.name(), tool.description(), schema_map)
            })
            .collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Base implementation helpers shared by all tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments from a JSON map into a typed request
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_request(format!("Invalid arguments: {e}"), None))
    }

    /// Create a success response with text content
    pub fn create_success_response<S: Into<String>>(content: S) -> CallToolResult {
        CallToolResult::success(vec![Content::text(content)])
    }

    /// Create an error response with text content
    pub fn create_error_response<S: Into<String>>(content: S) -> CallToolResult {
        CallToolResult::error(vec![Content::text(content)])
    }
}
