//! Tools command handlers
//!
//! List the exported tools, call a tool directly, or build a request envelope.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::client::McpClient;
use crate::tools::ToolCall;

/// Handle the `tools` command - print the function-calling export
pub fn run_tools(client: &McpClient) -> Result<()> {
    let tools = client.tools_for_invocation();
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

/// Handle the `call` command
///
/// Returns whether the result was flagged as an error.
pub async fn run_call(client: &McpClient, tool: &str, args: &str, id: &str) -> Result<bool> {
    let call = ToolCall::new(id, tool, args);
    let result = client.execute_tool_call(&call).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.is_error)
}

/// Handle the `request` command - print a JSON-RPC request envelope
pub fn run_request(client: &McpClient, method: &str, params: Option<&str>) -> Result<()> {
    let params = params.map(parse_object).transpose()?;
    let request = client.create_request(method, params);
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn parse_object(json: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(json).context("params must be valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("params must be a JSON object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use crate::handlers::shop_client;

    #[test]
    fn test_parse_object() {
        assert!(parse_object(r#"{"a": 1}"#).is_ok());
        assert!(parse_object("[1]").is_err());
        assert!(parse_object("nope").is_err());
    }

    #[tokio::test]
    async fn test_run_call_reports_error_flag() {
        let client = shop_client(ClientOptions::default()).unwrap();
        assert!(!run_call(&client, "get_products", "{}", "c1").await.unwrap());
        assert!(run_call(&client, "checkout", "{}", "c2").await.unwrap());
    }
}
