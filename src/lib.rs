//! SimpleStep Analytics MCP Server
//!
//! This crate provides an MCP (Model Context Protocol) server exposing daily
//! step-count analytics to AI agents: date-range summaries, weekly activity
//! patterns, and descriptive data resources.
//!
//! # Architecture
//!
//! ```text
//! Agent ──POST /mcp──▶ Dispatcher (secret check + method routing)
//!                           │
//!              ┌────────────┼──────────────┐
//!              ▼            ▼              ▼
//!         Tool Registry  Resource     initialize /
//!              │         Catalog      capability info
//!              ▼
//!         Step Store ──▶ Analytics Engine ──▶ report text
//!         (PostgREST)    (pure aggregation)
//! ```
//!
//! The dispatcher is total over the wire: every request, including unknown
//! methods and failed tools, is answered with a `{result}` or `{error}`
//! envelope.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stepstats_mcp::mcp::{McpServer, MethodRequest};
//! use stepstats_mcp::store::RestStepStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(RestStepStore::new(
//!         "https://example.supabase.co",
//!         "service-key",
//!     ));
//!     let server = McpServer::new(store, Some("shared-secret".to_string()));
//!
//!     let request: MethodRequest =
//!         serde_json::from_str(r#"{"method":"tools/list"}"#).unwrap();
//!     let response = server.dispatch(request).await;
//!     assert!(!response.is_error());
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analytics;
pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod mcp;
pub mod store;

// Re-exports for convenience
pub use analytics::{summarize, DailyStepRecord, StepSummary};
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use handlers::{api_router, ApiState};
pub use mcp::{McpServer, McpTool};
pub use store::{RestStepStore, StepStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
