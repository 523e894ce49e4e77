//! MCP stdio server implementation

use super::tools::{handle_tool_call, tool_definitions};
use super::types::{ErrorCode, McpError, McpMessage, McpNotification, McpRequest, McpResponse};
use crate::config::Config;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};

/// MCP server bridging tool calls to the remote RAG API
pub struct McpServer {
    config: Config,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the MCP server loop over stdio
    ///
    /// stdout carries only protocol frames; all logging goes to stderr.
    pub async fn run(&self) -> Result<(), McpError> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        info!("MCP server starting on stdio");

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    continue;
                }
            };

            if line.is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let message: McpMessage = match serde_json::from_str(&line) {
                Ok(m) => m,
                Err(e) => {
                    error!("Failed to parse message: {}", e);
                    let error_response = json!({
                        "jsonrpc": "2.0",
                        "id": null,
                        "error": {
                            "code": ErrorCode::ParseError as i32,
                            "message": format!("Parse error: {}", e)
                        }
                    });
                    writeln!(stdout, "{}", error_response)?;
                    stdout.flush()?;
                    continue;
                }
            };

            match message {
                McpMessage::Request(req) => {
                    let response = self.handle_request(req).await;
                    let response_str = serde_json::to_string(&response)?;
                    debug!("Sending: {}", response_str);
                    writeln!(stdout, "{}", response_str)?;
                    stdout.flush()?;
                }
                McpMessage::Notification(notif) => {
                    self.handle_notification(notif);
                }
                McpMessage::Response(_) => {
                    warn!("Unexpected response message received");
                }
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Handle an MCP request
    async fn handle_request(&self, request: McpRequest) -> McpResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "resources/list" => McpResponse::success(id, json!({ "resources": [] })),
            "prompts/list" => McpResponse::success(id, json!({ "prompts": [] })),
            _ => McpResponse::error_with_code(
                id,
                ErrorCode::MethodNotFound,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle notifications (fire-and-forget)
    fn handle_notification(&self, notification: McpNotification) {
        match notification.method.as_str() {
            "notifications/initialized" => {
                info!("Client initialized");
            }
            "notifications/cancelled" => {
                info!("Request cancelled");
            }
            _ => {
                debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, id: Option<Value>) -> McpResponse {
        McpResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {
                        "listChanged": false
                    },
                    "resources": {
                        "subscribe": false,
                        "listChanged": false
                    },
                    "prompts": {
                        "listChanged": false
                    }
                },
                "serverInfo": {
                    "name": "ragbridge",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> McpResponse {
        let tools = tool_definitions(&self.config);
        McpResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> McpResponse {
        let params = match params {
            Some(p) => p,
            None => return McpResponse::error_with_code(id, ErrorCode::InvalidParams, "Missing params"),
        };

        let name = match params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n.to_string(),
            None => {
                return McpResponse::error_with_code(
                    id,
                    ErrorCode::InvalidParams,
                    "Missing tool name",
                )
            }
        };

        let arguments: HashMap<String, Value> = params
            .get("arguments")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        debug!("Calling tool: {} with args: {:?}", name, arguments);

        let result = handle_tool_call(&name, &arguments, &self.config).await;

        // Tool failures are ordinary results with isError set, never
        // protocol-level faults.
        McpResponse::success(
            id,
            json!({
                "content": result.content,
                "isError": result.is_error()
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Option<Value>) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let server = McpServer::new(Config::default());
        let response = server.handle_request(request("initialize", None)).await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], json!("2024-11-05"));
        assert_eq!(result["serverInfo"]["name"], json!("ragbridge"));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_tools_list_respects_enable_flags() {
        let config = Config {
            enable_dotnet_rag: false,
            ..Config::default()
        };
        let server = McpServer::new(config);
        let response = server.handle_request(request("tools/list", None)).await;

        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], json!("universal_code_assistant"));
        assert!(tools[0].get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn test_unknown_method_is_method_not_found() {
        let server = McpServer::new(Config::default());
        let response = server.handle_request(request("tools/subscribe", None)).await;

        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::MethodNotFound as i32);
        assert!(error.message.contains("tools/subscribe"));
    }

    #[tokio::test]
    async fn test_tools_call_without_params_is_invalid() {
        let server = McpServer::new(Config::default());
        let response = server.handle_request(request("tools/call", None)).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidParams as i32);

        let response = server
            .handle_request(request("tools/call", Some(json!({"arguments": {}}))))
            .await;
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidParams as i32);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_rpc_success_with_error_flag() {
        let server = McpServer::new(Config::default());
        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!({"name": "nope", "arguments": {}})),
            ))
            .await;

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Unknown tool: 'nope'"));
    }
}
