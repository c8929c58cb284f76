//! Command handlers
//!
//! Each CLI subcommand is implemented by a function here. They all work
//! against a session wired with the demo shop tools.

pub mod chat;
pub mod tools;

pub use chat::run_chat;
pub use tools::{run_call, run_request, run_tools};

use crate::client::{ClientOptions, McpClient};
use crate::events::{ChatEvent, EventKind, Subscriber};
use crate::shop::{shared_cart, shop_tools, Catalog};

/// A client with the shop tools registered and events traced
pub fn shop_client(options: ClientOptions) -> anyhow::Result<McpClient> {
    let mut client = McpClient::with_options(options);
    for tool in shop_tools(Catalog::demo(), shared_cart()) {
        client.register_tool(tool)?;
    }
    attach_event_logger(&mut client);
    Ok(client)
}

/// Trace every dispatcher event
pub fn attach_event_logger(client: &mut McpClient) {
    let logger = event_logger();
    for kind in [EventKind::ToolCall, EventKind::ToolResult, EventKind::Error] {
        client.on(kind, &logger);
    }
}

pub(crate) fn event_logger() -> Subscriber {
    Subscriber::new(|event| {
        match event {
            ChatEvent::ToolCall(call) => {
                tracing::info!(tool = %call.name(), id = %call.id, "Tool call");
            }
            ChatEvent::ToolResult(result) => {
                tracing::info!(is_error = result.is_error, "Tool result: {}", result.text());
            }
            ChatEvent::Error(error) => {
                tracing::warn!(code = %error.code, "Tool error: {}", error.message);
            }
            ChatEvent::Message(message) => {
                tracing::debug!(role = %message.role, "Message: {}", message.content);
            }
            ChatEvent::StateChange(state) => {
                tracing::debug!(
                    messages = state.messages.len(),
                    loading = state.is_loading,
                    "State change"
                );
            }
        }
        Ok(())
    })
}
