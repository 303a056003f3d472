//! MCP resource catalog
//!
//! Static, URI-addressed descriptive payloads under the `steps://` scheme.
//! Reading never fails: unknown identifiers produce a placeholder payload
//! instead of an error.

use serde_json::json;

use crate::mcp::types::{McpResourceDefinition, ResourceContent, ResourceReadResult};

/// URI scheme for step resources.
pub const STEP_RESOURCE_SCHEME: &str = "steps://";

/// Catalog of readable resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog;

impl ResourceCatalog {
    /// Create the catalog.
    pub fn new() -> Self {
        ResourceCatalog
    }

    /// All resource definitions.
    pub fn definitions(&self) -> Vec<McpResourceDefinition> {
        vec![
            McpResourceDefinition {
                uri: format!("{STEP_RESOURCE_SCHEME}daily-data"),
                name: "Daily Steps Data".to_string(),
                description: "Access to daily step count data with timestamps".to_string(),
                mime_type: "application/json".to_string(),
            },
            McpResourceDefinition {
                uri: format!("{STEP_RESOURCE_SCHEME}weekly-summary"),
                name: "Weekly Step Summary".to_string(),
                description: "Access to weekly step count aggregations".to_string(),
                mime_type: "application/json".to_string(),
            },
            McpResourceDefinition {
                uri: format!("{STEP_RESOURCE_SCHEME}activity-patterns"),
                name: "Activity Patterns".to_string(),
                description: "Access to step activity pattern analysis".to_string(),
                mime_type: "application/json".to_string(),
            },
        ]
    }

    /// Read a resource by URI.
    ///
    /// The scheme prefix is stripped if present; a URI naming no known
    /// identifier is answered with a placeholder payload echoing it back.
    pub fn read(&self, uri: &str) -> ResourceReadResult {
        let identifier = uri.strip_prefix(STEP_RESOURCE_SCHEME).unwrap_or(uri);

        let payload = match identifier {
            "daily-data" => json!({
                "message": "Daily step count data with timestamps",
                "format": "Array of {date: string, steps: number}"
            }),
            "weekly-summary" => json!({
                "message": "Weekly step count aggregations",
                "format": "Weekly totals and averages"
            }),
            "activity-patterns" => json!({
                "message": "Activity pattern analysis data",
                "format": "Day-of-week patterns and trends"
            }),
            _ => json!({ "message": format!("Unknown resource: {identifier}") }),
        };

        ResourceReadResult {
            contents: vec![ResourceContent {
                uri: uri.to_string(),
                mime_type: "application/json".to_string(),
                text: serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string()),
            }],
        }
    }
}
