//! MCP request dispatcher
//!
//! Routes a single JSON-RPC request to the matching handler and wraps the
//! outcome in a response envelope. A dispatcher instance is cheap to build
//! and holds no state beyond the `initialized` flag, so transports construct
//! one per inbound call.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;
use crate::weather::client::WeatherClient;

/// Server identity reported by `initialize`
const SERVER_NAME: &str = "weather-mcp-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server for the weather tools
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,

    /// Set by `initialize`; no other method requires it as a precondition
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(weather_client: Arc<WeatherClient>) -> Self {
        Self {
            tool_handler: ToolHandler::new(weather_client),
            initialized: false,
        }
    }

    /// Whether an `initialize` request has been dispatched on this instance
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Handle one raw JSON-RPC message
    ///
    /// Malformed JSON cannot carry a usable id, so the parse-error envelope
    /// echoes a null one.
    pub async fn handle_message(&mut self, message: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                RequestId::Null,
                JsonRpcError::parse_error(format!("Parse error: {}", e)),
            )),
        }
    }

    /// Handle a parsed request; `None` means a notification with no response
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %request.method, "dispatching request");

        if request.method == methods::INITIALIZED {
            return None;
        }

        let id = request.id.unwrap_or(RequestId::Null);

        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                self.initialized = true;
                json_result(id, self.initialize_result())
            }
            methods::LIST_TOOLS => json_result(
                id,
                ListToolsResult {
                    tools: self.tool_handler.list_tools(),
                },
            ),
            methods::CALL_TOOL => self.handle_call_tool(id, request.params).await,
            _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method)),
        };

        Some(response)
    }

    /// Fixed capability and identity payload for `initialize`
    fn initialize_result(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        }
    }

    /// Handle a `tools/call` request
    ///
    /// Executor failures of every kind surface as a `-32603` envelope; the
    /// protocol defines no finer taxonomy for them.
    async fn handle_call_tool(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(p)) => p,
            Ok(None) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::internal_error("Missing tool call parameters"),
                );
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::internal_error(format!("Invalid tool call parameters: {}", e)),
                );
            }
        };

        match self
            .tool_handler
            .call_tool(&params.name, params.arguments)
            .await
        {
            Ok(text) => json_result(id, CallToolResult::text(text)),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}

/// Serialize a result payload into a success envelope
///
/// A serialization failure here is the outermost dispatch boundary; it
/// collapses to a `-32603` envelope rather than propagating.
fn json_result<T: Serialize>(id: RequestId, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    /// Server whose upstream base points at a closed port
    fn test_server() -> McpServer {
        let config = Config {
            nws_api_base: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let client = WeatherClient::new(Arc::new(config)).unwrap();
        McpServer::new(Arc::new(client))
    }

    fn request(id: i64, method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: Some(RequestId::Number(id)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_returns_fixed_identity() {
        let mut server = test_server();
        let response = server
            .handle_request(request(1, methods::INITIALIZE, None))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_initialize_not_required_before_other_methods() {
        let mut server = test_server();
        let response = server
            .handle_request(request(1, methods::LIST_TOOLS, None))
            .await
            .unwrap();
        assert!(response.result.is_some());
        assert!(!server.is_initialized());
    }

    #[tokio::test]
    async fn test_list_tools_names_and_order() {
        let mut server = test_server();
        let response = server
            .handle_request(request(2, methods::LIST_TOOLS, None))
            .await
            .unwrap();

        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "get_alerts");
        assert_eq!(tools[1]["name"], "get_forecast");
    }

    #[tokio::test]
    async fn test_unknown_method_returns_method_not_found() {
        let mut server = test_server();
        let response = server
            .handle_request(request(3, "nonexistent", None))
            .await
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
        assert!(error.message.contains("nonexistent"));
    }

    #[tokio::test]
    async fn test_unknown_tool_returns_internal_error() {
        let mut server = test_server();
        let params = json!({"name": "get_tides", "arguments": {}});
        let response = server
            .handle_request(request(4, methods::CALL_TOOL, Some(params)))
            .await
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::INTERNAL_ERROR);
        assert!(error.message.contains("get_tides"));
    }

    #[tokio::test]
    async fn test_malformed_call_params_return_internal_error() {
        let mut server = test_server();
        let response = server
            .handle_request(request(5, methods::CALL_TOOL, Some(json!("not an object"))))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::INTERNAL_ERROR);

        let response = server
            .handle_request(request(6, methods::CALL_TOOL, None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_initialized_notification_has_no_response() {
        let mut server = test_server();
        let notification = JsonRpcRequest {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: None,
            method: methods::INITIALIZED.to_string(),
            params: None,
        };
        assert!(server.handle_request(notification).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_parse_error_with_null_id() {
        let mut server = test_server();
        let response = server.handle_message("not json {{{").await.unwrap();

        assert_eq!(response.id, RequestId::Null);
        assert_eq!(response.error.unwrap().code, error_codes::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_request_id_echoed_on_success_and_error() {
        let mut server = test_server();

        let response = server
            .handle_request(request(42, methods::LIST_TOOLS, None))
            .await
            .unwrap();
        assert_eq!(response.id, RequestId::Number(42));

        let mut string_id = request(0, "bogus", None);
        string_id.id = Some(RequestId::String("req-7".to_string()));
        let response = server.handle_request(string_id).await.unwrap();
        assert_eq!(response.id, RequestId::String("req-7".to_string()));
    }
}
