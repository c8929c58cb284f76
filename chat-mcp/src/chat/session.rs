//! Chat session
//!
//! Owns the transcript and the session's [`McpClient`]. A user message is
//! sent to the completion backend together with the exported tools; tool
//! calls in the reply are dispatched locally and their results fed back
//! until the backend stops asking or the round limit is hit.

use std::sync::Arc;

use crate::client::{ClientOptions, McpClient};
use crate::config::ChatConfig;
use crate::events::{ChatEvent, EventKind, Subscriber};
use crate::tools::{SchemaError, Tool, ToolDefinition};

use super::backend::{ChatCompletionRequest, CompletionBackend, WireMessage};
use super::types::{ChatMessage, ChatState};

/// Tool reply recorded for calls left over once `max_tool_rounds` is spent
pub const ROUND_LIMIT_REPLY: &str = "Tool round limit reached; this call was not executed.";

/// Errors surfaced by [`ChatSession::send_message`]
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("completion backend failed: {0}")]
    Backend(String),

    #[error("completion backend returned no choices")]
    NoChoices,
}

pub struct ChatSession {
    config: ChatConfig,
    client: McpClient,
    backend: Arc<dyn CompletionBackend>,
    messages: Vec<ChatMessage>,
    error: Option<String>,
    is_loading: bool,
}

impl ChatSession {
    pub fn new(config: ChatConfig, options: ClientOptions, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            config,
            client: McpClient::with_options(options),
            backend,
            messages: Vec::new(),
            error: None,
            is_loading: false,
        }
    }

    /// Seed the transcript, e.g. with a system prompt
    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn client(&self) -> &McpClient {
        &self.client
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn state(&self) -> ChatState {
        ChatState {
            messages: self.messages.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            tools: self.tools(),
        }
    }

    // ========================================================================
    // Tool management and events
    // ========================================================================

    pub fn register_tool(&mut self, tool: Tool) -> Result<(), SchemaError> {
        self.client.register_tool(tool)
    }

    pub fn unregister_tool(&mut self, name: &str) {
        self.client.unregister_tool(name);
    }

    pub fn tools(&self) -> Vec<ToolDefinition> {
        self.client.export_for_invocation()
    }

    pub fn on(&mut self, kind: EventKind, subscriber: &Subscriber) {
        self.client.on(kind, subscriber);
    }

    pub fn off(&mut self, kind: EventKind, subscriber: &Subscriber) {
        self.client.off(kind, subscriber);
    }

    // ========================================================================
    // Chat actions
    // ========================================================================

    /// Send a user message and drive the tool-calling loop
    ///
    /// Returns the last assistant message.
    pub async fn send_message(&mut self, text: &str) -> Result<ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.error = None;
        self.push(ChatMessage::user(text));
        self.set_loading(true);

        let outcome = self.run_completion_loop().await;

        if let Err(ref e) = outcome {
            tracing::warn!("Chat request failed: {}", e);
            self.error = Some(e.to_string());
        }
        self.set_loading(false);

        outcome
    }

    /// Drop the transcript and any error
    pub fn clear_chat(&mut self) {
        self.messages.clear();
        self.error = None;
        self.emit_state();
    }

    async fn run_completion_loop(&mut self) -> Result<ChatMessage, ChatError> {
        let mut round = 0;

        loop {
            let request = self.build_request();
            let response = self
                .backend
                .complete(&request)
                .await
                .map_err(|e| ChatError::Backend(format!("{:#}", e)))?;

            let reply = response.first_message().ok_or(ChatError::NoChoices)?;
            let tool_calls = reply.tool_calls.clone();
            let assistant = ChatMessage::assistant(
                reply.content.clone().unwrap_or_default(),
                tool_calls.clone(),
            );
            self.push(assistant.clone());

            if tool_calls.is_empty() {
                return Ok(assistant);
            }

            if round >= self.config.max_tool_rounds {
                tracing::warn!(
                    rounds = round,
                    calls = tool_calls.len(),
                    "Tool round limit reached, skipping remaining tool calls"
                );
                // Every tool call needs a reply or the next request is rejected
                for call in &tool_calls {
                    self.push(ChatMessage::tool(call.id.clone(), ROUND_LIMIT_REPLY));
                }
                return Ok(assistant);
            }
            round += 1;

            tracing::info!(round, calls = tool_calls.len(), "Executing tool calls");
            for call in &tool_calls {
                let result = self.client.execute_tool_call(call).await;
                self.push(ChatMessage::tool(call.id.clone(), result.text()));
            }
        }
    }

    fn build_request(&self) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: self.messages.iter().map(WireMessage::from).collect(),
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            tools: self.client.tools_for_invocation(),
        }
    }

    fn push(&mut self, message: ChatMessage) {
        self.client.emit(&ChatEvent::Message(message.clone()));
        self.messages.push(message);
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
        self.emit_state();
    }

    fn emit_state(&self) {
        self.client.emit(&ChatEvent::StateChange(self.state()));
    }
}
