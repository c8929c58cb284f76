//! Completion backend seam and chat-completion wire types
//!
//! The only shipped backend is [`CannedBackend`], which answers every request
//! with the shop assistant greeting. Real LLM integration plugs in behind
//! [`CompletionBackend`].

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::types::{ChatMessage, Role};
use crate::tools::{FunctionTool, ToolCall};

// ============================================================================
// Wire types
// ============================================================================

/// A message as sent to the completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            tool_call_id: message.tool_call_id.clone(),
            tool_calls: message.tool_calls.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<FunctionTool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// The first choice's message, if the backend returned any
    pub fn first_message(&self) -> Option<&AssistantMessage> {
        self.choices.first().map(|c| &c.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: AssistantMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ============================================================================
// Backends
// ============================================================================

/// Anything that can turn a completion request into a response
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &ChatCompletionRequest) -> anyhow::Result<ChatCompletionResponse>;
}

/// Stub endpoint returning a fixed greeting
#[derive(Debug, Clone, Default)]
pub struct CannedBackend;

pub const CANNED_GREETING: &str = "Hello! I'm your shop assistant. I can help you find products, add items to your cart, and check your cart status. What would you like to do today?";

#[async_trait]
impl CompletionBackend for CannedBackend {
    async fn complete(&self, request: &ChatCompletionRequest) -> anyhow::Result<ChatCompletionResponse> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Received chat request"
        );

        let now = Utc::now();
        Ok(ChatCompletionResponse {
            id: format!("msg_{}", now.timestamp_millis()),
            object: "chat.completion".to_string(),
            created: now.timestamp(),
            model: request.model.clone(),
            choices: vec![Choice {
                index: 0,
                message: AssistantMessage {
                    role: Role::Assistant,
                    content: Some(CANNED_GREETING.to_string()),
                    tool_calls: Vec::new(),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Usage::default(),
        })
    }
}
