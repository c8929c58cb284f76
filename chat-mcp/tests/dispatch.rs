//! Dispatch behaviour tests
//!
//! Exercises the registry, validator, dispatcher and event bus together
//! through the public `McpClient` API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chat_mcp::shop::{lock_cart, shared_cart, shop_tools, Catalog};
use chat_mcp::{
    handler_fn, ChatEvent, ErrorCode, EventKind, InputSchema, McpClient, McpError, Params,
    PropertySchema, Subscriber, Tool, ToolCall, ToolResult,
};
use mcp_protocol::text_success;
use pretty_assertions::assert_eq;
use serde_json::Value;

// ============================================================================
// Helpers
// ============================================================================

/// Collects every event of one kind
fn record(client: &mut McpClient, kind: EventKind) -> Arc<Mutex<Vec<ChatEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    client.on(
        kind,
        &Subscriber::new(move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        }),
    );
    seen
}

fn only_error(events: &Arc<Mutex<Vec<ChatEvent>>>) -> McpError {
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1, "expected exactly one error event");
    match &events[0] {
        ChatEvent::Error(e) => e.clone(),
        other => panic!("Expected Error event, got {:?}", other),
    }
}

/// A tool requiring a numeric `productId` that records what it was invoked with
fn product_tool(invocations: Arc<Mutex<Vec<Params>>>) -> Tool {
    Tool::new(
        "add_to_cart",
        "Add a product to the shopping cart",
        InputSchema::new()
            .property("productId", PropertySchema::number())
            .required("productId"),
        handler_fn(move |params| {
            let invocations = invocations.clone();
            async move {
                invocations.lock().unwrap().push(params);
                Ok(text_success("added"))
            }
        }),
    )
}

fn failing_tool() -> Tool {
    Tool::new(
        "flaky",
        "Always fails",
        InputSchema::new(),
        handler_fn(|_| async { Err(anyhow::anyhow!("database unavailable")) }),
    )
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn register_then_get_returns_same_tool() {
    let mut client = McpClient::new();
    let tool = product_tool(Arc::default());
    client.register_tool(tool.clone()).unwrap();

    let found = client.get_tool("add_to_cart").unwrap();
    assert!(found.same_handler(&tool));
}

#[test]
fn reregistration_replaces() {
    let mut client = McpClient::new();
    let first = product_tool(Arc::default());
    let second = product_tool(Arc::default());

    client.register_tool(first.clone()).unwrap();
    client.register_tool(second.clone()).unwrap();

    let found = client.get_tool("add_to_cart").unwrap();
    assert!(found.same_handler(&second));
    assert!(!found.same_handler(&first));
    assert_eq!(client.get_tools().len(), 1);
}

#[test]
fn unregister_missing_is_noop() {
    let mut client = McpClient::new();
    client.register_tool(product_tool(Arc::default())).unwrap();

    client.unregister_tool("does_not_exist");
    assert_eq!(client.get_tools().len(), 1);
}

#[test]
fn clear_tools_empties_registry() {
    let mut client = McpClient::new();
    for tool in shop_tools(Catalog::demo(), shared_cart()) {
        client.register_tool(tool).unwrap();
    }
    assert_eq!(client.get_tools().len(), 4);

    client.clear_tools();
    assert!(client.get_tools().is_empty());
    assert!(client.tools_for_invocation().is_empty());
}

// ============================================================================
// Dispatch failures
// ============================================================================

#[tokio::test]
async fn unknown_tool_is_method_not_found() {
    let mut client = McpClient::new();
    let errors = record(&mut client, EventKind::Error);

    let result = client
        .execute_tool_call(&ToolCall::new("1", "checkout", "{}"))
        .await;

    assert!(result.is_error);
    assert_eq!(result.text(), "Tool 'checkout' not found");
    assert_eq!(only_error(&errors).code, ErrorCode::MethodNotFound);
}

#[tokio::test]
async fn malformed_json_is_invalid_params_before_handler() {
    let invocations = Arc::new(Mutex::new(Vec::new()));
    let mut client = McpClient::new();
    client.register_tool(product_tool(invocations.clone())).unwrap();
    let errors = record(&mut client, EventKind::Error);

    let result = client
        .execute_tool_call(&ToolCall::new("1", "add_to_cart", "not json"))
        .await;

    assert!(result.is_error);
    let error = only_error(&errors);
    assert_eq!(error.code, ErrorCode::InvalidParams);
    assert!(error.data.is_some());
    assert!(invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_required_names_parameter() {
    let invocations = Arc::new(Mutex::new(Vec::new()));
    let mut client = McpClient::new();
    client.register_tool(product_tool(invocations.clone())).unwrap();
    let errors = record(&mut client, EventKind::Error);

    let result = client
        .execute_tool_call(&ToolCall::new("1", "add_to_cart", "{}"))
        .await;

    assert!(result.is_error);
    assert!(result.text().contains("productId"));
    assert_eq!(only_error(&errors).code, ErrorCode::InvalidParams);
    assert!(invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn type_mismatch_names_parameter() {
    let invocations = Arc::new(Mutex::new(Vec::new()));
    let mut client = McpClient::new();
    client.register_tool(product_tool(invocations.clone())).unwrap();

    let result = client
        .execute_tool_call(&ToolCall::new("1", "add_to_cart", r#"{"productId": "abc"}"#))
        .await;

    assert!(result.is_error);
    assert_eq!(result.text(), "Parameter 'productId' must be of type number");
    assert!(invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn handler_error_is_tool_execution_error() {
    let mut client = McpClient::new();
    client.register_tool(failing_tool()).unwrap();
    let errors = record(&mut client, EventKind::Error);
    let results = record(&mut client, EventKind::ToolResult);

    let result = client
        .execute_tool_call(&ToolCall::new("1", "flaky", "{}"))
        .await;

    assert!(result.is_error);
    assert_eq!(result.text(), "Tool execution failed: database unavailable");

    let error = only_error(&errors);
    assert_eq!(error.code, ErrorCode::ToolExecutionError);
    assert_eq!(error.data.unwrap()["error"], "database unavailable");
    assert!(results.lock().unwrap().is_empty());
}

// ============================================================================
// Dispatch success
// ============================================================================

#[tokio::test]
async fn valid_call_invokes_handler_with_params() {
    let invocations = Arc::new(Mutex::new(Vec::new()));
    let mut client = McpClient::new();
    client.register_tool(product_tool(invocations.clone())).unwrap();
    let errors = record(&mut client, EventKind::Error);

    let result = client
        .execute_tool_call(&ToolCall::new("1", "add_to_cart", r#"{"productId": 5}"#))
        .await;

    assert!(!result.is_error);
    let invocations = invocations.lock().unwrap();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].get("productId"), Some(&Value::from(5)));
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_extra_params_are_ignored() {
    let invocations = Arc::new(Mutex::new(Vec::new()));
    let mut client = McpClient::new();
    client.register_tool(product_tool(invocations.clone())).unwrap();

    let result = client
        .execute_tool_call(&ToolCall::new(
            "1",
            "add_to_cart",
            r#"{"productId": 5, "extra": true}"#,
        ))
        .await;

    assert!(!result.is_error);
    assert_eq!(invocations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn two_result_subscribers_each_called_once() {
    let mut client = McpClient::new();
    client.register_tool(product_tool(Arc::default())).unwrap();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let payloads: Arc<Mutex<Vec<ToolResult>>> = Arc::default();

    for counter in [first.clone(), second.clone()] {
        let payloads = payloads.clone();
        client.on(
            EventKind::ToolResult,
            &Subscriber::new(move |event| {
                counter.fetch_add(1, Ordering::SeqCst);
                if let ChatEvent::ToolResult(result) = event {
                    payloads.lock().unwrap().push(result.clone());
                }
                Ok(())
            }),
        );
    }

    let result = client
        .execute_tool_call(&ToolCall::new("1", "add_to_cart", r#"{"productId": 1}"#))
        .await;

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    let payloads = payloads.lock().unwrap();
    assert_eq!(payloads.len(), 2);
    assert!(payloads.iter().all(|p| *p == result));
}

#[tokio::test]
async fn failing_subscriber_does_not_break_dispatch() {
    let mut client = McpClient::new();
    client.register_tool(product_tool(Arc::default())).unwrap();
    client.on(
        EventKind::ToolCall,
        &Subscriber::new(|_| anyhow::bail!("observer crashed")),
    );
    let results = record(&mut client, EventKind::ToolResult);

    let result = client
        .execute_tool_call(&ToolCall::new("1", "add_to_cart", r#"{"productId": 1}"#))
        .await;

    assert!(!result.is_error);
    assert_eq!(results.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn shop_tools_through_dispatcher() {
    let cart = shared_cart();
    let mut client = McpClient::new();
    for tool in shop_tools(Catalog::demo(), cart.clone()) {
        client.register_tool(tool).unwrap();
    }

    let added = client
        .execute_tool_call(&ToolCall::new(
            "1",
            "add_to_cart",
            r#"{"productId": 2, "quantity": 3}"#,
        ))
        .await;
    assert!(!added.is_error);
    assert_eq!(lock_cart(&cart).unwrap().item_count(), 3);

    let status = client
        .execute_tool_call(&ToolCall::new("2", "get_cart_status", "{}"))
        .await;
    assert!(status.text().contains("3x Coffee Mug ($44.97)"));

    let bad = client
        .execute_tool_call(&ToolCall::new("3", "add_to_cart", r#"{"quantity": 1}"#))
        .await;
    assert!(bad.is_error);
    assert_eq!(bad.text(), "Missing required parameter: productId");
}

#[tokio::test]
async fn cart_survives_quantity_overflow() {
    let cart = shared_cart();
    let mut client = McpClient::new();
    for tool in shop_tools(Catalog::demo(), cart.clone()) {
        client.register_tool(tool).unwrap();
    }
    let errors = record(&mut client, EventKind::Error);
    let max = format!(r#"{{"productId": 1, "quantity": {}}}"#, u32::MAX);

    let first = client
        .execute_tool_call(&ToolCall::new("1", "add_to_cart", max.as_str()))
        .await;
    assert!(!first.is_error);

    let second = client
        .execute_tool_call(&ToolCall::new("2", "add_to_cart", max.as_str()))
        .await;
    assert!(second.is_error);
    assert_eq!(second.text(), "Quantity too large.");

    let status = client
        .execute_tool_call(&ToolCall::new("3", "get_cart_status", "{}"))
        .await;
    assert!(!status.is_error);

    let removed = client
        .execute_tool_call(&ToolCall::new("4", "remove_from_cart", r#"{"productId": 1}"#))
        .await;
    assert!(!removed.is_error);
    assert!(errors.lock().unwrap().is_empty());
}
