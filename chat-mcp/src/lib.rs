//! Chat MCP Library
//!
//! Tool-call client for an embedded shop chat assistant: a registry of named
//! tools with declared input schemas, validation of untrusted JSON arguments,
//! dispatch to local handlers, and an event bus reporting what happened.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use chat_mcp::{McpClient, ToolCall};
//! use chat_mcp::shop::{shared_cart, shop_tools, Catalog};
//!
//! let mut client = McpClient::new();
//! for tool in shop_tools(Catalog::demo(), shared_cart()) {
//!     client.register_tool(tool)?;
//! }
//!
//! let call = ToolCall::new("call_1", "add_to_cart", r#"{"productId": 1}"#);
//! let result = client.execute_tool_call(&call).await;
//! assert!(!result.is_error);
//! ```

pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod events;
pub mod handlers;
pub mod shop;
pub mod tools;

// Re-export main types
pub use chat::{ChatMessage, ChatSession, ChatState};
pub use client::{ClientOptions, McpClient};
pub use events::{ChatEvent, EventBus, EventKind, Subscriber};
pub use tools::{
    handler_fn, FunctionTool, InputSchema, Params, PropertySchema, PropertyType, Tool, ToolCall,
    ToolDefinition, ToolHandler, ToolRegistry,
};

// Re-export protocol types that callers need alongside the client
pub use mcp_protocol::{Content, ErrorCode, McpError, ToolResult};
