//! Model Context Protocol (MCP) server module
//!
//! This module implements the MCP dispatch surface for AI agent integration,
//! exposing step analytics tools and resources through the MCP protocol.

mod resources;
mod server;
mod tools;
/// MCP protocol types
pub mod types;

pub use resources::{ResourceCatalog, STEP_RESOURCE_SCHEME};
pub use server::{McpServer, Method};
pub use tools::{McpTool, ToolRegistry, AVAILABLE_TOOLS};
pub use types::{
    McpCapabilities, McpResourceDefinition, McpServerInfo, McpToolDefinition, MethodError,
    MethodRequest, MethodResponse, ResourceContent, ResourceReadResult, ToolCallParams,
    ToolCallResult, ToolContent, PROTOCOL_VERSION,
};
