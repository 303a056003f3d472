//! HTTP handlers for the step analytics server
//!
//! The [`rpc`] module owns the `/mcp` dispatch endpoint; [`status`] provides
//! the health, readiness, and runtime-metrics endpoints. Both hang off the
//! router built by [`api_router`].

pub mod rpc;
pub mod status;

pub use rpc::{api_router, mcp_handler, ApiState};
pub use status::{
    health_handler, readiness_handler, status_handler, AppState, HealthResponse, LatencyHistogram,
    LatencyMetrics, MemoryMetrics, StatusResponse,
};
