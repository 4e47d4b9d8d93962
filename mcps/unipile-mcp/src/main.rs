//! Unipile MCP Server
//!
//! Reads chat history through the Unipile messaging API over MCP stdio.
//!
//! # Configuration
//! `UNIPILE_DSN` and `UNIPILE_API_KEY` are required, either as environment
//! variables or as `--dsn` / `--api-key`.

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use unipile_mcp::{Args, UnipileMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::init_tracing("unipile_mcp")?;

    tracing::info!("Starting Unipile MCP Server");

    let config = Args::parse()
        .into_config()
        .inspect_err(|e| tracing::error!("Invalid configuration: {e}"))?;
    tracing::info!(
        page_max = config.page_max,
        timeout_secs = config.timeout.as_secs(),
        "Unipile endpoint configured"
    );

    let server = UnipileMcpServer::new(&config)?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
