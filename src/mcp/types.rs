//! MCP protocol types
//!
//! This module defines the types used in the MCP method envelope. A request
//! names a method and carries optional params; a response holds exactly one
//! of `result` or `error`, enforced by construction through the
//! [`MethodResponse`] enum.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Protocol revision advertised by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Inbound method request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodRequest {
    /// Method name
    pub method: String,
    /// Optional parameters
    #[serde(default)]
    pub params: Option<Value>,
}

/// Outbound method response: a result or an error, never both
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodResponse {
    /// Successful outcome
    Success {
        /// Method-specific result payload
        result: Value,
    },
    /// Failed outcome
    Failure {
        /// Error class and message
        error: MethodError,
    },
}

impl MethodResponse {
    /// Create a success response
    pub fn success(result: Value) -> Self {
        MethodResponse::Success { result }
    }

    /// Create an error response
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        MethodResponse::Failure {
            error: MethodError {
                code,
                message: message.into(),
            },
        }
    }

    /// Create the response for a protocol error class
    pub fn protocol_error(err: &ProtocolError) -> Self {
        Self::error(err.code(), err.to_string())
    }

    /// Create an unauthorized response
    pub fn unauthorized() -> Self {
        Self::protocol_error(&ProtocolError::Unauthorized)
    }

    /// Create a method not found response
    pub fn method_not_found(method: &str) -> Self {
        Self::protocol_error(&ProtocolError::MethodNotFound(method.to_string()))
    }

    /// Create an unknown tool response
    pub fn tool_not_found(name: &str) -> Self {
        Self::protocol_error(&ProtocolError::ToolNotFound(name.to_string()))
    }

    /// Create a tool execution failure response carrying the cause
    pub fn tool_execution_failed(why: impl Into<String>) -> Self {
        Self::protocol_error(&ProtocolError::ToolExecutionFailed(why.into()))
    }

    /// Create a generic internal error response
    pub fn internal_error() -> Self {
        Self::protocol_error(&ProtocolError::Internal)
    }

    /// The result payload, if this is a success
    pub fn as_result(&self) -> Option<&Value> {
        match self {
            MethodResponse::Success { result } => Some(result),
            MethodResponse::Failure { .. } => None,
        }
    }

    /// The error object, if this is a failure
    pub fn as_error(&self) -> Option<&MethodError> {
        match self {
            MethodResponse::Success { .. } => None,
            MethodResponse::Failure { error } => Some(error),
        }
    }

    /// Whether this response reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, MethodResponse::Failure { .. })
    }
}

/// Error object carried in a failure response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

/// Capability flags advertised by `initialize`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpCapabilities {
    /// Tools capability
    #[serde(default)]
    pub tools: ToolsCapability,
    /// Resources capability
    #[serde(default)]
    pub resources: ResourcesCapability,
    /// Prompts capability
    #[serde(default)]
    pub prompts: PromptsCapability,
}

/// Tools capability marker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {}

/// Resources capability marker. No `subscribe` flag is advertised until a
/// subscription path exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesCapability {}

/// Prompts capability marker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsCapability {}

/// MCP server info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl Default for McpServerInfo {
    fn default() -> Self {
        Self {
            name: "SimpleStep Analytics MCP Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Result payload of the `initialize` method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol revision
    pub protocol_version: String,
    /// Advertised capabilities
    pub capabilities: McpCapabilities,
    /// Server identity
    pub server_info: McpServerInfo,
}

/// MCP tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input JSON schema
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters for tools/call method
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Tool name
    pub name: String,
    /// Tool arguments
    #[serde(default)]
    pub arguments: Value,
}

/// Result of a tool call
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    /// Whether the call was an error
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    /// Content array
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Create a success result with text content
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            content: vec![ToolContent::text(text)],
        }
    }
}

/// Content item in tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    /// Text content
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
    },
}

impl ToolContent {
    /// Create text content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// MCP resource definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResourceDefinition {
    /// Resource URI
    pub uri: String,
    /// Resource name
    pub name: String,
    /// Resource description
    pub description: String,
    /// MIME type of the resource payload
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Parameters for resources/read method
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    /// Resource URI
    pub uri: String,
}

/// One entry in a resources/read result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContent {
    /// Resource URI as requested
    pub uri: String,
    /// MIME type of the payload
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Payload text
    pub text: String,
}

/// Result of a resources/read call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReadResult {
    /// Content entries
    pub contents: Vec<ResourceContent>,
}
