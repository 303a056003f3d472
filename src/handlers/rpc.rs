//! The `/mcp` dispatch endpoint
//!
//! One POST route turns an HTTP request into exactly one envelope:
//!
//! 1. Shared-secret check (`X-MCP-Secret`) — failure is HTTP 401 with an
//!    `Unauthorized` envelope and nothing else runs.
//! 2. Body parse into a [`MethodRequest`] — malformed bodies are HTTP 500
//!    with a generic internal-error envelope, never an uncaught fault.
//! 3. [`McpServer::dispatch`] — every outcome of an authorized call, error
//!    envelopes included, is HTTP 200.
//!
//! The handler also feeds the runtime metrics behind `GET /status`.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, warn};

use crate::auth::MCP_SECRET_HEADER;
use crate::cors::cors_layer;
use crate::handlers::status::{health_handler, readiness_handler, status_handler, AppState};
use crate::mcp::types::{MethodRequest, MethodResponse};
use crate::mcp::McpServer;

/// Shared state for the API router.
#[derive(Clone)]
pub struct ApiState {
    /// The MCP dispatcher
    pub server: Arc<McpServer>,
    /// Runtime metrics for the status endpoint
    pub metrics: Arc<AppState>,
}

impl ApiState {
    /// Bundle a dispatcher with a fresh metrics state.
    pub fn new(server: Arc<McpServer>) -> Self {
        ApiState {
            server,
            metrics: Arc::new(AppState::new()),
        }
    }
}

impl FromRef<ApiState> for Arc<AppState> {
    fn from_ref(state: &ApiState) -> Self {
        state.metrics.clone()
    }
}

/// Build the full HTTP router: dispatch endpoint, probes, CORS.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(readiness_handler))
        .route("/status", get(status_handler))
        .layer(cors_layer())
        .with_state(state)
}

/// Handle one `POST /mcp` request.
pub async fn mcp_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    state.metrics.increment_active_requests();

    let response = process_request(&state, &headers, &body).await;

    state.metrics.record_latency(started.elapsed());
    state.metrics.decrement_active_requests();
    response
}

async fn process_request(state: &ApiState, headers: &HeaderMap, body: &Bytes) -> Response {
    let provided = headers
        .get(MCP_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if !state.server.authorize(provided) {
        warn!("Rejected request with missing or invalid shared secret");
        state.metrics.record_error();
        return (
            StatusCode::UNAUTHORIZED,
            Json(MethodResponse::unauthorized()),
        )
            .into_response();
    }

    let request: MethodRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(err) => {
            error!("Malformed request envelope: {err}");
            state.metrics.record_error();
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MethodResponse::internal_error()),
            )
                .into_response();
        }
    };

    let is_tool_call = request.method == "tools/call";
    let response = state.server.dispatch(request).await;

    if response.is_error() {
        state.metrics.record_error();
    } else if is_tool_call {
        state.metrics.record_summary();
    }

    (StatusCode::OK, Json(response)).into_response()
}
