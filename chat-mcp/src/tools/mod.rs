//! Tool definitions
//!
//! A [`Tool`] pairs a name, description and [`InputSchema`] with a local
//! [`ToolHandler`]. Handlers never leave the process: what gets exported to a
//! completion backend is the [`ToolDefinition`] projection.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use mcp_protocol::ToolResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod registry;
pub mod schema;

pub use registry::ToolRegistry;
pub use schema::{InputSchema, PropertySchema, PropertyType, SchemaError, ValidationOptions};

/// Validated tool parameters (a flat JSON object)
pub type Params = Map<String, Value>;

// ============================================================================
// Handler
// ============================================================================

/// Capability invoked once a call has passed validation
///
/// Returning `Err` is how a handler reports an execution failure; the
/// dispatcher converts it into an error-flagged [`ToolResult`].
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, params: Params) -> anyhow::Result<ToolResult>;
}

/// Adapter turning an async closure into a [`ToolHandler`]
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<ToolResult>> + Send + 'static,
{
    async fn invoke(&self, params: Params) -> anyhow::Result<ToolResult> {
        (self.f)(params).await
    }
}

/// Build a handler from an async closure
///
/// ```rust,ignore
/// let handler = handler_fn(|params| async move {
///     Ok(text_success(format!("got {} params", params.len())))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<ToolResult>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

// ============================================================================
// Tool
// ============================================================================

/// A named, schema-described capability
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub handler: Arc<dyn ToolHandler>,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler,
        }
    }

    /// Projection without the handler, for export
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.input_schema.clone(),
        }
    }

    /// Whether two tools share the same handler instance
    pub fn same_handler(&self, other: &Tool) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.handler) as *const (),
            Arc::as_ptr(&other.handler) as *const (),
        )
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Export shapes
// ============================================================================

/// Name/description/schema triple describing a tool to a remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: InputSchema,
}

/// OpenAI-style function tool entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: ToolDefinition,
}

impl From<ToolDefinition> for FunctionTool {
    fn from(function: ToolDefinition) -> Self {
        Self {
            tool_type: "function".to_string(),
            function,
        }
    }
}

// ============================================================================
// Tool call
// ============================================================================

/// An invocation request as produced by a completion backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: ToolCallFunction,
}

/// The function details within a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

fn default_call_type() -> String {
    "function".to_string()
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: ToolCallFunction {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}
