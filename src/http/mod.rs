//! HTTP transport
//!
//! Axum router exposing the MCP dispatcher over plain JSON-RPC POST
//! endpoints, the SSE stream channel, and a few convenience routes. Every
//! inbound call gets a fresh dispatcher over the shared upstream client.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;
use crate::mcp::server::McpServer;
use crate::mcp::types::{
    error_codes, methods, JsonRpcRequest, RequestId, JSONRPC_VERSION, MCP_VERSION,
};
use crate::weather::client::WeatherClient;

pub mod sse;

/// Shared application state
///
/// The upstream client is shared so its connection pool survives across
/// requests; dispatchers are constructed per call and carry no cross-call
/// state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather_client: Arc<WeatherClient>,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let weather_client = Arc::new(WeatherClient::new(config.clone())?);
        Ok(Self {
            config,
            weather_client,
        })
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/sse", get(sse::sse_handler).post(handle_rpc))
        .route("/mcp", post(handle_rpc))
        .route("/tools", get(list_tools))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / — interactive test page
async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// POST /mcp and POST /sse
///
/// One Request Envelope in, one Response Envelope out. A body that is not
/// valid JSON gets the parse-error envelope with HTTP 400; a notification
/// produces no envelope at all.
async fn handle_rpc(State(state): State<AppState>, body: String) -> Response {
    let mut server = McpServer::new(state.weather_client.clone());

    match server.handle_message(&body).await {
        Some(response) => {
            let status = match &response.error {
                Some(e) if e.code == error_codes::PARSE_ERROR => StatusCode::BAD_REQUEST,
                _ => StatusCode::OK,
            };
            (status, Json(response)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /tools — shortcut around an internal `tools/list` dispatch
async fn list_tools(State(state): State<AppState>) -> Response {
    let mut server = McpServer::new(state.weather_client.clone());
    let request = JsonRpcRequest {
        jsonrpc: Some(JSONRPC_VERSION.to_string()),
        id: Some(RequestId::Number(1)),
        method: methods::LIST_TOOLS.to_string(),
        params: None,
    };

    let body = server
        .handle_request(request)
        .await
        .and_then(|response| serde_json::to_string_pretty(&response).ok());

    match body {
        Some(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// GET /health — no dispatcher involved
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "protocolVersion": MCP_VERSION,
    }))
}

/// Fallback for unrecognized routes
async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
