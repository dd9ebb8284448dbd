//! Stdio JSON-RPC tool server.
//!
//! Line-delimited JSON-RPC 2.0 over stdin/stdout so orchestration
//! layers can call the messaging tools as subprocess tools. Logging
//! goes to stderr and the log file only; stdout carries responses.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Error;
use crate::tools::{self, send::unknown_recipient_text, TOOL_NAMES};

// ─── JSON-RPC 2.0 types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct RpcRequest {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

#[derive(Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

// ─── Server loop ─────────────────────────────────────────────────────

/// Run the stdio tool server until stdin closes.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    tracing::info!("Courier tool server listening on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => handle_request(&config, request),
            Err(e) => {
                warn!("Unparsable request: {}", e);
                error_response(Value::Null, PARSE_ERROR, format!("Parse error: {}", e))
            }
        };

        let mut payload = serde_json::to_string(&response)?;
        payload.push('\n');
        stdout.write_all(payload.as_bytes()).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, tool server stopping");
    Ok(())
}

fn handle_request(config: &Config, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone().unwrap_or(Value::Null);
    debug!(method = %request.method, "rpc request");

    match request.method.as_str() {
        "tools/list" => RpcResponse {
            jsonrpc: "2.0",
            id,
            result: Some(tool_listing()),
            error: None,
        },
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            let name = params.get("name").and_then(Value::as_str);
            let args = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            let name = match name {
                Some(name) => name,
                None => {
                    return error_response(id, INVALID_REQUEST, "missing tool name".to_string())
                }
            };

            match tools::call(config, name, args) {
                Ok(text) => RpcResponse {
                    jsonrpc: "2.0",
                    id,
                    result: Some(json!({ "content": [{ "type": "text", "text": text }] })),
                    error: None,
                },
                // Unknown recipient is a refusal with guidance, still a
                // well-formed text result for the caller to act on.
                Err(Error::UnknownRecipient {
                    ref to,
                    ref suggestions,
                    ref known,
                }) => {
                    let text = unknown_recipient_text(to, suggestions, known);
                    RpcResponse {
                        jsonrpc: "2.0",
                        id,
                        result: Some(
                            json!({ "content": [{ "type": "text", "text": text }], "isError": true }),
                        ),
                        error: None,
                    }
                }
                Err(Error::Json(e)) => {
                    error_response(id, INVALID_PARAMS, format!("Invalid params: {}", e))
                }
                Err(Error::Other(message)) => error_response(id, METHOD_NOT_FOUND, message),
                Err(e) => error_response(id, INTERNAL_ERROR, e.to_string()),
            }
        }
        other => error_response(id, METHOD_NOT_FOUND, format!("Unknown method: {}", other)),
    }
}

fn error_response(id: Value, code: i32, message: String) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(RpcError { code, message }),
    }
}

fn tool_listing() -> Value {
    json!({
        "tools": TOOL_NAMES.iter().map(|name| tool_schema(name)).collect::<Vec<_>>()
    })
}

fn tool_schema(name: &str) -> Value {
    match name {
        "create_message" => json!({
            "name": "create_message",
            "description": "Send a message to another agent",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "from_agent": { "type": "string", "description": "Your agent name (sender)" },
                    "to_agent": { "type": "string", "description": "Recipient agent name" },
                    "message": { "type": "string", "description": "The message content" },
                    "priority": { "type": "string", "enum": ["high", "medium", "low"], "default": "medium" },
                    "context_files": { "type": "array", "items": { "type": "string" }, "default": [] }
                },
                "required": ["from_agent", "to_agent", "message"]
            }
        }),
        "read_messages" => json!({
            "name": "read_messages",
            "description": "Read messages sent to you by other agents",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "agent_name": { "type": "string", "description": "Your agent name" },
                    "mark_as_read": { "type": "boolean", "default": true },
                    "priority_filter": { "type": "string", "enum": ["high", "medium", "low"] },
                    "include_read": { "type": "boolean", "default": false }
                },
                "required": ["agent_name"]
            }
        }),
        "clear_messages" => json!({
            "name": "clear_messages",
            "description": "Archive old read messages to clean up inbox",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "agent_name": { "type": "string", "description": "Your agent name" },
                    "older_than_days": { "type": "integer", "default": 7 }
                },
                "required": ["agent_name"]
            }
        }),
        _ => json!({
            "name": "list_agents",
            "description": "Get a list of all available agents you can message",
            "inputSchema": { "type": "object", "properties": {}, "required": [] }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testutil::{define_agent, test_config};
    use tempfile::TempDir;

    fn call(config: &Config, raw: &str) -> RpcResponse {
        handle_request(config, serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_tools_list() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let response = call(&config, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        let tools = response.result.unwrap();
        assert_eq!(tools["tools"].as_array().unwrap().len(), 4);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_tools_call_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        define_agent(&config, "coder", "Writes code");

        let response = call(
            &config,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"create_message","arguments":{"from_agent":"coder","to_agent":"coder","message":"hi"}}}"#,
        );
        let text = response.result.unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(text.contains("Message from coder"));
    }

    #[test]
    fn test_unknown_recipient_returns_guidance_text() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let response = call(
            &config,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"create_message","arguments":{"from_agent":"a","to_agent":"nobody","message":"hi"}}}"#,
        );
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("not found"));
        assert!(text.contains("memory-manager"));
    }

    #[test]
    fn test_unknown_method() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let response = call(&config, r#"{"jsonrpc":"2.0","id":4,"method":"nope"}"#);
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_missing_tool_name_is_invalid_request() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let response = call(
            &config,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{}}"#,
        );
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }
}
