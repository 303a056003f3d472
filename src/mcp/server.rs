//! MCP dispatch server
//!
//! The HTTP layer hands each authorized, parsed request to
//! [`McpServer::dispatch`], which routes over the fixed [`Method`] set and
//! normalizes every outcome into a result-or-error envelope.
//!
//! # Security
//!
//! Callers present a shared secret in the `X-MCP-Secret` header; the HTTP
//! handler checks it through [`McpServer::authorize`] before the body is
//! even parsed. A server constructed without a secret accepts all callers,
//! which is logged loudly at construction.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::auth;
use crate::error::{Error, ProtocolError};
use crate::mcp::resources::ResourceCatalog;
use crate::mcp::tools::ToolRegistry;
use crate::mcp::types::{
    InitializeResult, McpCapabilities, McpServerInfo, MethodRequest, MethodResponse,
    ResourceReadParams, ToolCallParams, PROTOCOL_VERSION,
};
use crate::store::StepStore;

/// The dispatchable method set.
///
/// Adding a method means adding a variant here; the dispatch match is
/// exhaustive, so forgetting a handler is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Protocol handshake
    Initialize,
    /// Tool catalog listing
    ToolsList,
    /// Tool invocation
    ToolsCall,
    /// Resource catalog listing
    ResourcesList,
    /// Resource read
    ResourcesRead,
}

impl Method {
    /// Map a wire method name onto the dispatch set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Method::Initialize),
            "tools/list" => Some(Method::ToolsList),
            "tools/call" => Some(Method::ToolsCall),
            "resources/list" => Some(Method::ResourcesList),
            "resources/read" => Some(Method::ResourcesRead),
            _ => None,
        }
    }
}

/// MCP server state
pub struct McpServer {
    /// Tool registry
    tools: ToolRegistry,
    /// Resource catalog
    resources: ResourceCatalog,
    /// Server info
    info: McpServerInfo,
    /// Shared secret gating the dispatch surface; None accepts all callers
    secret: Option<String>,
}

impl McpServer {
    /// Create a new MCP server over the given step store.
    ///
    /// An empty secret counts as no secret. When no secret is configured
    /// every caller is accepted, so production construction should always
    /// pass one.
    pub fn new(store: Arc<dyn StepStore>, secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.is_empty());

        if secret.is_some() {
            info!("MCP dispatch secret configured");
        } else {
            warn!("MCP server running without a shared secret; accepting all callers");
        }

        Self {
            tools: ToolRegistry::new(store),
            resources: ResourceCatalog::new(),
            info: McpServerInfo::default(),
            secret,
        }
    }

    /// Whether a shared secret is enforced
    pub fn is_auth_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check the shared secret presented by a caller.
    ///
    /// Constant-time comparison; a missing header never passes while a
    /// secret is configured.
    pub fn authorize(&self, provided: Option<&str>) -> bool {
        match &self.secret {
            Some(expected) => auth::verify_shared_secret(provided, expected),
            None => true,
        }
    }

    /// Dispatch a parsed request to its handler.
    ///
    /// Total over the wire: every outcome, including unknown methods and
    /// failed tools, comes back as a well-formed envelope.
    #[instrument(skip(self, request))]
    pub async fn dispatch(&self, request: MethodRequest) -> MethodResponse {
        info!("Handling method: {}", request.method);

        let Some(method) = Method::from_name(&request.method) else {
            warn!("Unknown method: {}", request.method);
            return MethodResponse::method_not_found(&request.method);
        };

        match method {
            Method::Initialize => MethodResponse::success(json!(self.initialize_result())),
            Method::ToolsList => {
                MethodResponse::success(json!({ "tools": self.tools.definitions() }))
            }
            Method::ToolsCall => self.handle_tools_call(request.params).await,
            Method::ResourcesList => {
                MethodResponse::success(json!({ "resources": self.resources.definitions() }))
            }
            Method::ResourcesRead => self.handle_resources_read(request.params),
        }
    }

    fn initialize_result(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: McpCapabilities::default(),
            server_info: self.info.clone(),
        }
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> MethodResponse {
        let Some(params) = params else {
            error!("tools/call without params");
            return MethodResponse::internal_error();
        };

        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(err) => {
                error!("Malformed tools/call params: {err}");
                return MethodResponse::internal_error();
            }
        };

        match self.tools.execute(&params.name, params.arguments).await {
            Ok(result) => MethodResponse::success(json!(result)),
            Err(Error::Protocol(ProtocolError::ToolNotFound(name))) => {
                warn!("Unknown tool requested: {name}");
                MethodResponse::tool_not_found(&name)
            }
            Err(err) => {
                warn!("Tool execution failed: {err}");
                MethodResponse::tool_execution_failed(err.to_string())
            }
        }
    }

    fn handle_resources_read(&self, params: Option<Value>) -> MethodResponse {
        let Some(params) = params else {
            error!("resources/read without params");
            return MethodResponse::internal_error();
        };

        let params: ResourceReadParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(err) => {
                error!("Malformed resources/read params: {err}");
                return MethodResponse::internal_error();
            }
        };

        MethodResponse::success(json!(self.resources.read(&params.uri)))
    }
}
