//! JSON-RPC 2.0 style envelopes
//!
//! The builders that assign ids live with whoever owns the id counter; these
//! are only the shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::McpError;

/// Protocol version tag carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

fn jsonrpc_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// Request correlation id (integer or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    String(String),
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        RequestId::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpRequest {
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl McpRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Map<String, Value>>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// Response envelope
///
/// By convention exactly one of `result` and `error` is set. The type does
/// not enforce that; see [`McpResponse::is_malformed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpResponse {
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    pub id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

impl McpResponse {
    pub fn new(
        id: impl Into<RequestId>,
        result: Option<Map<String, Value>>,
        error: Option<McpError>,
    ) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id: id.into(),
            result,
            error,
        }
    }

    /// True when both or neither of `result` and `error` are populated
    pub fn is_malformed(&self) -> bool {
        self.result.is_some() == self.error.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Notification envelope (no id, no response expected)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpNotification {
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl McpNotification {
    pub fn new(method: impl Into<String>, params: Option<Map<String, Value>>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            method: method.into(),
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let req = McpRequest::new(1u64, "tools/list", None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}));
    }

    #[test]
    fn test_request_id_untagged() {
        let req: McpRequest =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "id": "abc", "method": "ping"}"#).unwrap();
        assert_eq!(req.id, RequestId::String("abc".to_string()));

        let req: McpRequest =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "id": 7, "method": "ping"}"#).unwrap();
        assert_eq!(req.id, RequestId::Number(7));
    }

    #[test]
    fn test_response_malformed_detection() {
        let mut result = Map::new();
        result.insert("ok".to_string(), json!(true));

        let ok = McpResponse::new(1u64, Some(result.clone()), None);
        assert!(!ok.is_malformed());
        assert!(!ok.is_error());

        let err = McpResponse::new(1u64, None, Some(McpError::internal_error("x")));
        assert!(!err.is_malformed());
        assert!(err.is_error());

        let both = McpResponse::new(1u64, Some(result), Some(McpError::internal_error("x")));
        assert!(both.is_malformed());

        let neither = McpResponse::new(1u64, None, None);
        assert!(neither.is_malformed());
    }

    #[test]
    fn test_notification_has_no_id() {
        let note = McpNotification::new("notifications/initialized", None);
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["jsonrpc"], "2.0");
    }
}
