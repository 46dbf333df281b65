//! Weather MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server for National Weather Service data.
//! Serves weather alert and forecast tools over HTTP JSON-RPC and SSE.

use std::sync::Arc;

use clap::Parser;

use weather_mcp_server_rust::config::Config;
use weather_mcp_server_rust::error::Result;
use weather_mcp_server_rust::http::{create_router, AppState};

/// Weather MCP Server
#[derive(Parser)]
#[command(name = "weather-mcp-server")]
#[command(author, version, about = "Weather MCP Server - A Model Context Protocol server for NWS data")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::new()?;

    let state = AppState::new(Arc::new(config))?;
    let app = create_router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Weather MCP server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
