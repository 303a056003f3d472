//! SimpleStep Analytics MCP Server
//!
//! HTTP entry point: loads configuration, builds the store client and the
//! dispatcher, and serves the API router.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use stepstats_mcp::handlers::ApiState;
use stepstats_mcp::mcp::McpServer;
use stepstats_mcp::store::RestStepStore;
use stepstats_mcp::ServerConfig;

/// SimpleStep Analytics MCP Server
#[derive(Parser, Debug)]
#[command(name = "stepstats")]
#[command(author = "SimpleStep Team <team@simplestep.app>")]
#[command(version)]
#[command(about = "MCP server for daily step-count analytics")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let store = Arc::new(RestStepStore::new(&config.store_url, &config.store_key));
    let server = Arc::new(McpServer::new(store, Some(config.mcp_secret)));
    let router = stepstats_mcp::api_router(ApiState::new(server));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("stepstats-mcp {} listening on {addr}", stepstats_mcp::VERSION);
    axum::serve(listener, router)
        .await
        .context("server terminated")?;

    Ok(())
}
