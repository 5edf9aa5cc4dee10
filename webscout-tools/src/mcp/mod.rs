//! Model Context Protocol (MCP) server and tool infrastructure

pub mod server;
pub mod tool_registry;
pub mod tools;
pub mod unified_server;

pub use server::McpServer;
pub use tool_registry::{BaseToolImpl, McpTool, ToolContext, ToolRegistry};
pub use tools::web::register_web_tools;
pub use unified_server::{
    run_stdio_server, start_mcp_server, McpServerHandle, McpServerInfo, McpServerMode,
};
