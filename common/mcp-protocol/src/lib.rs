//! MCP Protocol - Shared primitives for the tool-call protocol
//!
//! This crate provides the wire-level pieces every tool host needs:
//!
//! - **Errors**: [`ErrorCode`] and [`McpError`] with the JSON-RPC style codes
//! - **Results**: [`ToolResult`] / [`Content`] and helpers to build them
//! - **Envelopes**: JSON-RPC 2.0 request, response and notification types
//! - **Initialization**: [`init_tracing`] for binaries
//!
//! # Example
//!
//! ```rust
//! use mcp_protocol::{text_success, McpError};
//!
//! let ok = text_success("Added 1 item to your cart");
//! assert!(!ok.is_error);
//!
//! let err = McpError::method_not_found("Tool 'checkout' not found");
//! assert_eq!(err.code.as_i32(), -32601);
//! ```

pub mod envelope;
pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use envelope::{McpNotification, McpRequest, McpResponse, RequestId, JSONRPC_VERSION};
pub use error::{ErrorCode, IntoMcpError, McpError, McpResult, ResultExt};
pub use init::init_tracing;
pub use result::{error_result, json_success, multi_success, text_success, Content, ToolResult};
