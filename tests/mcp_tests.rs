//! MCP dispatch integration tests
//!
//! Drives the dispatcher through the same `{method, params}` envelopes a
//! client would send and asserts on the serialized responses.

mod common;

use std::sync::Arc;

use serde_json::{json, Value};
use stepstats_mcp::mcp::{McpServer, MethodRequest, MethodResponse};
use stepstats_mcp::store::StepStore;

use common::{FailingStore, FixtureStore};

fn server(store: impl StepStore + 'static) -> McpServer {
    McpServer::new(Arc::new(store), None)
}

async fn dispatch(server: &McpServer, body: &str) -> Value {
    let request: MethodRequest = serde_json::from_str(body).unwrap();
    let response = server.dispatch(request).await;
    serde_json::to_value(&response).unwrap()
}

#[tokio::test]
async fn test_initialize_reports_capabilities() {
    let server = server(FixtureStore::three_days());
    let response = dispatch(&server, r#"{"method":"initialize"}"#).await;

    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(
        response["result"]["serverInfo"]["name"],
        "SimpleStep Analytics MCP Server"
    );
    assert!(response["result"]["capabilities"]["tools"].is_object());
    assert!(response.get("error").is_none());
}

#[tokio::test]
async fn test_tools_list_catalog() {
    let server = server(FixtureStore::three_days());
    let response = dispatch(&server, r#"{"method":"tools/list"}"#).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);

    let summary_tool = tools
        .iter()
        .find(|t| t["name"] == "get_step_summary")
        .unwrap();
    assert_eq!(
        summary_tool["inputSchema"]["required"],
        json!(["startDate", "endDate"])
    );

    let patterns_tool = tools
        .iter()
        .find(|t| t["name"] == "get_activity_patterns")
        .unwrap();
    assert_eq!(
        patterns_tool["inputSchema"]["properties"]["days"]["default"],
        30
    );
}

#[tokio::test]
async fn test_step_summary_tool_call() {
    let server = server(FixtureStore::three_days());
    let body = r#"{
        "method": "tools/call",
        "params": {
            "name": "get_step_summary",
            "arguments": {"startDate": "2024-01-01", "endDate": "2024-01-03"}
        }
    }"#;
    let response = dispatch(&server, body).await;

    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("9,000"));
    assert!(text.contains("2024-01-02"));
    assert!(text.contains("2024-01-01"));
    assert!(response.get("error").is_none());
}

#[tokio::test]
async fn test_tool_call_missing_argument_is_reported() {
    let server = server(FixtureStore::three_days());
    let body = r#"{
        "method": "tools/call",
        "params": {"name": "get_step_summary", "arguments": {"startDate": "2024-01-01"}}
    }"#;
    let response = dispatch(&server, body).await;

    assert_eq!(response["error"]["code"], -32603);
    let message = response["error"]["message"].as_str().unwrap();
    assert!(message.contains("Missing required parameter: endDate"));
}

#[tokio::test]
async fn test_tool_call_store_failure_is_wrapped() {
    let server = server(FailingStore);
    let body = r#"{
        "method": "tools/call",
        "params": {
            "name": "get_step_summary",
            "arguments": {"startDate": "2024-01-01", "endDate": "2024-01-03"}
        }
    }"#;
    let response = dispatch(&server, body).await;

    assert_eq!(response["error"]["code"], -32603);
    let message = response["error"]["message"].as_str().unwrap();
    assert!(message.contains("Failed to fetch step data"));
    assert!(message.contains("store offline"));
}

#[tokio::test]
async fn test_unknown_tool() {
    let server = server(FixtureStore::three_days());
    let body = r#"{"method":"tools/call","params":{"name":"get_coffee","arguments":{}}}"#;
    let response = dispatch(&server, body).await;

    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Unknown tool: get_coffee");
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_resources_list_catalog() {
    let server = server(FixtureStore::three_days());
    let response = dispatch(&server, r#"{"method":"resources/list"}"#).await;

    let resources = response["result"]["resources"].as_array().unwrap();
    let uris: Vec<&str> = resources
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    assert_eq!(
        uris.len(),
        3,
        "expected the three catalog resources, got {uris:?}"
    );
    assert!(uris.contains(&"steps://daily-data"));
    assert!(uris.contains(&"steps://weekly-summary"));
    assert!(uris.contains(&"steps://activity-patterns"));
}

#[tokio::test]
async fn test_resources_read_unknown_id_is_a_placeholder() {
    let server = server(FixtureStore::three_days());
    let body = r#"{"method":"resources/read","params":{"uri":"steps://unknown-id"}}"#;
    let response = dispatch(&server, body).await;

    assert!(response.get("error").is_none());
    let text = response["result"]["contents"][0]["text"].as_str().unwrap();
    assert!(text.contains("unknown-id"));
}

#[tokio::test]
async fn test_unknown_methods_get_the_reserved_code() {
    let server = server(FixtureStore::three_days());
    for method in ["ping", "steps/write", "tools/delete", "notifications/init"] {
        let response = dispatch(&server, &format!(r#"{{"method":"{method}"}}"#)).await;
        assert_eq!(response["error"]["code"], -32601);
        let message = response["error"]["message"].as_str().unwrap();
        assert!(message.contains(method), "message should name {method}");
        assert!(response.get("result").is_none());
    }
}

#[tokio::test]
async fn test_envelope_is_exclusive() {
    let server = server(FixtureStore::three_days());

    let ok = dispatch(&server, r#"{"method":"tools/list"}"#).await;
    assert!(ok.get("result").is_some() && ok.get("error").is_none());

    let err = dispatch(&server, r#"{"method":"nope"}"#).await;
    assert!(err.get("error").is_some() && err.get("result").is_none());
}

#[test]
fn test_response_envelope_parses_back() {
    let response: MethodResponse =
        serde_json::from_str(r#"{"error":{"code":-32601,"message":"Method not found: x"}}"#)
            .unwrap();
    assert!(response.is_error());
    assert_eq!(response.as_error().unwrap().code, -32601);
}
