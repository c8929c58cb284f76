//! Tool results and helpers for building them
//!
//! A [`ToolResult`] is an ordered list of content blocks plus an error flag.
//! Error results have the same shape as successful ones; callers must check
//! `is_error` rather than infer failure from the content.

use serde::{Deserialize, Serialize};

use crate::error::McpError;

/// A single content block in a tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Resource {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<String>,
        #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Content::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Text carried by this block, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            Content::Resource { text, .. } => text.as_deref(),
            Content::Image { .. } => None,
        }
    }
}

/// Outcome of a tool invocation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: true,
        }
    }

    /// All text blocks joined with newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(Content::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<&McpError> for ToolResult {
    fn from(err: &McpError) -> Self {
        error_result(err.message.clone())
    }
}

/// Create a successful JSON response from any serializable data
///
/// Serialization failures come back as an internal protocol error.
pub fn json_success<T: Serialize>(data: &T) -> Result<ToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string()))?;
    Ok(ToolResult::success(vec![Content::text(json)]))
}

/// Create a successful plain text response
pub fn text_success(text: impl Into<String>) -> ToolResult {
    ToolResult::success(vec![Content::text(text)])
}

/// Create a successful response with multiple content items
pub fn multi_success(contents: Vec<Content>) -> ToolResult {
    ToolResult::success(contents)
}

/// Create an error-flagged response carrying a single text block
pub fn error_result(message: impl Into<String>) -> ToolResult {
    ToolResult::error(vec![Content::text(message)])
}
