//! Tool-call client: registry, dispatcher and event bus for one chat session
//!
//! [`McpClient::execute_tool_call`] is the dispatch boundary. Lookup, parse,
//! validation and handler failures are all turned into an error event plus
//! an error-flagged [`ToolResult`]; nothing escapes as an `Err` or a panic.
//!
//! Dispatch order for a call:
//! 1. look up the tool (`MethodNotFound`)
//! 2. parse the JSON arguments (`InvalidParams`)
//! 3. validate against the input schema (`InvalidParams`)
//! 4. emit `toolCall`
//! 5. invoke the handler (`ToolExecutionError` on `Err` or panic)
//! 6. emit `toolResult` and return the handler's result untouched

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use mcp_protocol::{McpError, McpRequest, McpResponse, RequestId, ToolResult};
use serde_json::{json, Map, Value};

use crate::events::{panic_message, ChatEvent, EventBus, EventKind, Subscriber};
use crate::tools::schema::validate;
use crate::tools::{
    FunctionTool, Params, SchemaError, Tool, ToolCall, ToolDefinition, ToolRegistry,
    ValidationOptions,
};

/// Behaviour switches for a client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Reject tools whose schema fails [`InputSchema::check`](crate::tools::InputSchema::check)
    pub strict_schemas: bool,
    pub validation: ValidationOptions,
}

/// Session-scoped tool client
///
/// Not meant to be shared between sessions. Mutation (registration and
/// subscription) takes `&mut self`; dispatch only needs `&self`.
#[derive(Debug, Default)]
pub struct McpClient {
    registry: ToolRegistry,
    bus: EventBus,
    request_id: AtomicU64,
    options: ClientOptions,
}

impl McpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ClientOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register or replace a tool
    ///
    /// Only fails when strict schemas are enabled and the schema is malformed.
    pub fn register_tool(&mut self, tool: Tool) -> Result<(), SchemaError> {
        if self.options.strict_schemas {
            self.registry.register_tool_checked(tool)
        } else {
            self.registry.register_tool(tool);
            Ok(())
        }
    }

    pub fn unregister_tool(&mut self, name: &str) {
        self.registry.unregister_tool(name);
    }

    pub fn get_tool(&self, name: &str) -> Option<&Tool> {
        self.registry.get_tool(name)
    }

    pub fn get_tools(&self) -> Vec<&Tool> {
        self.registry.get_tools()
    }

    pub fn clear_tools(&mut self) {
        self.registry.clear_tools();
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn export_for_invocation(&self) -> Vec<ToolDefinition> {
        self.registry.export_for_invocation()
    }

    /// Tools in OpenAI function-calling shape
    pub fn tools_for_invocation(&self) -> Vec<FunctionTool> {
        self.export_for_invocation()
            .into_iter()
            .map(FunctionTool::from)
            .collect()
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn on(&mut self, kind: EventKind, subscriber: &Subscriber) {
        self.bus.on(kind, subscriber);
    }

    pub fn off(&mut self, kind: EventKind, subscriber: &Subscriber) {
        self.bus.off(kind, subscriber);
    }

    pub fn clear_event_listeners(&mut self) {
        self.bus.clear();
    }

    pub fn emit(&self, event: &ChatEvent) {
        self.bus.emit(event);
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Execute a tool call end to end
    pub async fn execute_tool_call(&self, call: &ToolCall) -> ToolResult {
        let name = call.name();

        let Some(tool) = self.registry.get_tool(name) else {
            return self.fail(McpError::method_not_found(format!(
                "Tool '{}' not found",
                name
            )));
        };

        let params = match parse_arguments(&call.function.arguments) {
            Ok(params) => params,
            Err(e) => return self.fail(e),
        };

        if let Err(e) = validate(&params, &tool.input_schema, &self.options.validation) {
            return self.fail(e);
        }

        self.bus.emit(&ChatEvent::ToolCall(call.clone()));
        tracing::debug!(tool = %name, id = %call.id, "Invoking tool");

        let outcome = AssertUnwindSafe(tool.handler.invoke(params))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => {
                tracing::debug!(tool = %name, is_error = result.is_error, "Tool completed");
                self.bus.emit(&ChatEvent::ToolResult(result.clone()));
                result
            }
            Ok(Err(e)) => self.fail(
                McpError::tool_execution(format!("Tool execution failed: {}", e))
                    .with_data(json!({ "error": format!("{:#}", e) })),
            ),
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                self.fail(
                    McpError::tool_execution(format!("Tool execution failed: {}", detail))
                        .with_data(json!({ "error": detail, "panic": true })),
                )
            }
        }
    }

    fn fail(&self, error: McpError) -> ToolResult {
        tracing::warn!(code = %error.code, "Tool call failed: {}", error.message);
        let result = ToolResult::from(&error);
        self.bus.emit(&ChatEvent::Error(error));
        result
    }

    // ========================================================================
    // Envelopes
    // ========================================================================

    /// Build a request with the next id (1, 2, 3, ...)
    pub fn create_request(&self, method: impl Into<String>, params: Option<Map<String, Value>>) -> McpRequest {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed) + 1;
        McpRequest::new(id, method, params)
    }

    /// Build a response echoing `id`; exclusivity of result/error is not enforced
    pub fn create_response(
        &self,
        id: impl Into<RequestId>,
        result: Option<Map<String, Value>>,
        error: Option<McpError>,
    ) -> McpResponse {
        McpResponse::new(id, result, error)
    }
}

/// Parse JSON-encoded tool arguments into a parameter object
fn parse_arguments(arguments: &str) -> Result<Params, McpError> {
    let value: Value = serde_json::from_str(arguments).map_err(|e| {
        McpError::invalid_params("Invalid JSON in tool arguments").with_data(json!({
            "error": e.to_string(),
            "line": e.line(),
            "column": e.column(),
        }))
    })?;

    match value {
        Value::Object(params) => Ok(params),
        _ => Err(McpError::invalid_params("Tool arguments must be a JSON object")),
    }
}
