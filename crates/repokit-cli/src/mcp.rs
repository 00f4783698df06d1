//! MCP (Model Context Protocol) server implementation
//!
//! Every registered component is exposed as one tool.

use repokit::{ComponentRegistry, GitHubRepositoryReader, ReaderConfig, RunRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// MCP Server implementation
struct McpServer {
    registry: ComponentRegistry,
}

impl McpServer {
    fn new(registry: ComponentRegistry) -> Self {
        Self { registry }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "repokit",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<Value> = self
            .registry
            .iter()
            .map(|component| {
                json!({
                    "name": component.name(),
                    "description": component.description(),
                    "inputSchema": component.input_schema(),
                    "outputSchema": component.output_schema()
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if self.registry.get(tool_name).is_none() {
            return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name));
        }

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let request: RunRequest = match serde_json::from_value(arguments) {
            Ok(req) => req,
            Err(e) => {
                return JsonRpcResponse::error(id, -32602, format!("Invalid arguments: {}", e));
            }
        };

        match self.registry.run(tool_name, request).await {
            Ok(output) => {
                let content = serde_json::to_value(&output).unwrap_or(json!({}));
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{
                            "type": "text",
                            "text": serde_json::to_string_pretty(&content).unwrap_or_default()
                        }],
                        "structuredContent": content
                    }),
                )
            }
            Err(e) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": format!("Error: {}", e)
                    }],
                    "isError": true
                }),
            ),
        }
    }
}

/// Run the MCP server over stdio
pub async fn run_server(config: ReaderConfig) {
    let reader = match GitHubRepositoryReader::from_config(&config) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(repository = %reader.coordinates(), "Starting MCP server");

    let server = McpServer::new(ComponentRegistry::with_reader(reader));
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                continue;
            }
        };

        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                let json = serde_json::to_string(&response).unwrap_or_default();
                let _ = writeln!(stdout, "{}", json);
                let _ = stdout.flush();
                continue;
            }
        };

        // Notifications get no response
        if request.id.is_none() && request.method.starts_with("notifications/") {
            continue;
        }

        let response = server.handle_request(request).await;
        let json = serde_json::to_string(&response).unwrap_or_default();
        let _ = writeln!(stdout, "{}", json);
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repokit::Secret;

    fn server() -> McpServer {
        let reader = GitHubRepositoryReader::builder()
            .access_token(Secret::from_token("test-token"))
            .repository("octocat/hello-world")
            .file_extensions([".md"])
            .build()
            .unwrap();
        McpServer::new(ComponentRegistry::with_reader(reader))
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_tools_list_exposes_both_roles() {
        let response = server().handle_request(request("tools/list", json!({}))).await;
        let result = response.result.unwrap();
        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();

        assert_eq!(
            names,
            vec!["github_repository_augmenter", "github_repository_fetcher"]
        );
        assert!(result["tools"][0]["inputSchema"]["properties"]["ref"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let response = server()
            .handle_request(request("tools/call", json!({"name": "nope"})))
            .await;
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("nope"));
    }

    #[tokio::test]
    async fn test_bad_repository_is_tool_error() {
        let response = server()
            .handle_request(request(
                "tools/call",
                json!({
                    "name": "github_repository_fetcher",
                    "arguments": {"repository": "not-valid"}
                }),
            ))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("owner/repo"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server().handle_request(request("resources/list", json!({}))).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }
}
