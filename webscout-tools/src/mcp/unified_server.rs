//! Unified MCP server supporting multiple transport modes
//!
//! Wraps the rmcp server in either stdio or HTTP transport and returns
//! connection information for whichever mode was selected.

use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use webscout_common::{Result, WebScoutError};
use webscout_web::WebConfig;

use super::server::McpServer;

/// Health check endpoint handler
async fn health_check(debug: bool) -> axum::response::Json<serde_json::Value> {
    axum::response::Json(serde_json::json!({
        "status": "ok",
        "server": "webscout",
        "debug": debug,
    }))
}

/// MCP server transport mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum McpServerMode {
    /// Standard input/output transport
    Stdio,
    /// HTTP transport with optional port specification
    /// None = random port assignment
    Http { port: Option<u16> },
}

/// Connection information returned after server startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerInfo {
    /// The transport mode used
    pub mode: McpServerMode,
    /// Connection URL or identifier
    pub connection_url: String,
    /// Actual bound port (for HTTP mode)
    pub port: Option<u16>,
}

/// Handle for managing MCP server lifecycle
#[derive(Debug)]
pub struct McpServerHandle {
    /// Server information
    pub info: McpServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl McpServerHandle {
    fn new(info: McpServerInfo, shutdown_tx: oneshot::Sender<()>) -> Self {
        Self {
            info,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the connection information
    pub fn info(&self) -> &McpServerInfo {
        &self.info
    }

    /// Get the actual port (for HTTP mode)
    pub fn port(&self) -> Option<u16> {
        self.info.port
    }

    /// Get the connection URL
    pub fn url(&self) -> &str {
        &self.info.connection_url
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                tracing::warn!("Server shutdown signal receiver already dropped");
            }
        }
        Ok(())
    }
}

/// Start the MCP server with the specified transport mode
///
/// # Arguments
///
/// * `mode` - The transport mode (stdio or HTTP)
/// * `config` - Web pipeline configuration
///
/// # Returns
///
/// * `Result<McpServerHandle>` - Server handle with connection info
pub async fn start_mcp_server(mode: McpServerMode, config: WebConfig) -> Result<McpServerHandle> {
    match mode {
        McpServerMode::Stdio => start_stdio_server(config).await,
        McpServerMode::Http { port } => start_http_server(port, config).await,
    }
}

/// Run the MCP server over stdio, returning when the client disconnects
///
/// This is the entry point the binary uses; [`start_mcp_server`] spawns the
/// stdio loop instead so embedders get a handle back.
pub async fn run_stdio_server(config: WebConfig) -> Result<()> {
    let server = McpServer::new(config);

    tracing::info!("Starting MCP server in stdio mode");

    let running_service =
        serve_server(server, stdio())
            .await
            .map_err(|e| WebScoutError::Other {
                message: format!("Failed to start stdio server: {e}"),
            })?;

    let quit_reason = running_service
        .waiting()
        .await
        .map_err(|e| WebScoutError::Other {
            message: format!("MCP stdio server task error: {e}"),
        })?;
    tracing::info!("MCP stdio server completed: {:?}", quit_reason);

    Ok(())
}

/// Start MCP server with stdio transport
async fn start_stdio_server(config: WebConfig) -> Result<McpServerHandle> {
    let server = McpServer::new(config);

    tracing::info!("Starting MCP server in stdio mode");

    // Dummy shutdown channel for API consistency; stdio ends with the stream
    let (shutdown_tx, _shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        match serve_server(server, stdio()).await {
            Ok(running_service) => {
                tracing::info!("MCP stdio server started");
                match running_service.waiting().await {
                    Ok(quit_reason) => {
                        tracing::info!("MCP stdio server completed: {:?}", quit_reason);
                    }
                    Err(e) => {
                        tracing::error!("MCP stdio server task error: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to start stdio server: {}", e);
            }
        }
    });

    let info = McpServerInfo {
        mode: McpServerMode::Stdio,
        connection_url: "stdio".to_string(),
        port: None,
    };

    Ok(McpServerHandle::new(info, shutdown_tx))
}

/// Start MCP server with HTTP transport
async fn start_http_server(port: Option<u16>, config: WebConfig) -> Result<McpServerHandle> {
    let actual_port = if let Some(bind_port) = port {
        bind_port
    } else {
        // Find an available random port, then release it for the real bind
        let temp_listener =
            TcpListener::bind("127.0.0.1:0")
                .await
                .map_err(|e| WebScoutError::Other {
                    message: format!("Failed to bind to random port: {e}"),
                })?;

        let port = temp_listener
            .local_addr()
            .map_err(|e| WebScoutError::Other {
                message: format!("Failed to get local address: {e}"),
            })?
            .port();

        drop(temp_listener);
        port
    };

    let bind_addr = format!("127.0.0.1:{actual_port}");
    let socket_addr: std::net::SocketAddr =
        bind_addr.parse().map_err(|e| WebScoutError::Other {
            message: format!("Failed to parse bind address {bind_addr}: {e}"),
        })?;

    let debug = config.debug;
    let server = McpServer::new(config);

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new()
        .nest_service("/mcp", service)
        .route("/health", axum::routing::get(move || health_check(debug)));
    let listener = TcpListener::bind(socket_addr)
        .await
        .map_err(|e| WebScoutError::Other {
            message: format!("Failed to bind to {socket_addr}: {e}"),
        })?;

    let connection_url = format!("http://127.0.0.1:{actual_port}/mcp");
    tracing::info!("HTTP MCP server ready on {}", connection_url);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        let serve = axum::serve(listener, router).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        if let Err(e) = serve.await {
            tracing::error!("HTTP MCP server error: {}", e);
        }
    });

    let info = McpServerInfo {
        mode: McpServerMode::Http {
            port: Some(actual_port),
        },
        connection_url,
        port: Some(actual_port),
    };

    Ok(McpServerHandle::new(info, shutdown_tx))
}
