//! WebScout MCP server binary
//!
//! Serves the web tools over stdio by default, or HTTP with `--http`.

use clap::Parser;
use webscout_common::init_tracing;
use webscout_tools::mcp::{start_mcp_server, McpServerMode};
use webscout_tools::run_stdio_server;
use webscout_web::WebConfig;

#[derive(Parser, Debug)]
#[command(
    name = "webscout",
    version,
    about = "MCP server for safe web scraping and search"
)]
struct Cli {
    /// Serve over HTTP instead of stdio
    #[arg(long)]
    http: bool,

    /// Port to bind in HTTP mode (random when omitted)
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = WebConfig::from_env();
    if cli.debug {
        config.debug = true;
    }

    // Logs go to stderr so stdout stays clean for the stdio transport
    init_tracing(config.debug);

    if cli.http {
        let mut handle = start_mcp_server(McpServerMode::Http { port: cli.port }, config).await?;
        tracing::info!("MCP server listening on {}", handle.url());

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down");
        handle.shutdown().await?;
    } else {
        run_stdio_server(config).await?;
    }

    Ok(())
}
