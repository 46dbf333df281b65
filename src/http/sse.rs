//! Stream transport
//!
//! Long-lived server-to-client push channel carrying lifecycle events: a
//! `connected` event on open, then a `ping` every `ping_interval` until the
//! channel is cancelled or the client disconnects. Tool responses are never
//! pushed here; requests POSTed to the same path are answered synchronously
//! by the router.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::http::AppState;
use crate::mcp::types::MCP_VERSION;

/// Message the `connected` event carries on channel open
const READY_MESSAGE: &str = "Weather MCP SSE stream ready";

/// Event emitted on the stream channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Channel is open and ready
    Connected,

    /// Periodic liveness signal
    Ping { timestamp: String },
}

impl StreamEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            StreamEvent::Connected => "connected",
            StreamEvent::Ping { .. } => "ping",
        }
    }

    /// Render as an SSE frame: `event: <name>\ndata: <json>\n\n`
    ///
    /// A payload that fails to encode becomes an `error` event carrying the
    /// failure message instead of tearing down the channel.
    fn into_sse(self) -> Event {
        let payload = match &self {
            StreamEvent::Connected => json!({
                "message": READY_MESSAGE,
                "protocolVersion": MCP_VERSION,
            }),
            StreamEvent::Ping { timestamp } => json!({ "timestamp": timestamp }),
        };

        match serde_json::to_string(&payload) {
            Ok(data) => Event::default().event(self.name()).data(data),
            Err(e) => Event::default()
                .event("error")
                .data(json!({ "message": e.to_string() }).to_string()),
        }
    }
}

/// Open a stream channel and return its receiving end
///
/// Spawns the ping loop; the loop ends when `token` is cancelled or the
/// returned receiver is dropped. Each channel gets its own timer and task,
/// fully isolated from every other channel.
pub fn open_channel(config: Arc<Config>, token: CancellationToken) -> mpsc::Receiver<StreamEvent> {
    let (tx, rx) = mpsc::channel(8);
    tokio::spawn(ping_loop(config, token, tx));
    rx
}

/// Emit `connected`, then a `ping` per interval until cancelled
///
/// A failed send means the receiver is gone; the loop treats it the same as
/// cancellation and exits without emitting further events.
async fn ping_loop(config: Arc<Config>, token: CancellationToken, tx: mpsc::Sender<StreamEvent>) {
    if tx.send(StreamEvent::Connected).await.is_err() {
        return;
    }

    let mut interval = tokio::time::interval(config.ping_interval);
    interval.tick().await; // first tick resolves immediately

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("stream channel cancelled");
                break;
            }
            _ = interval.tick() => {
                let ping = StreamEvent::Ping {
                    timestamp: chrono::Utc::now().to_rfc3339(),
                };
                if tx.send(ping).await.is_err() {
                    tracing::debug!("stream client disconnected");
                    break;
                }
            }
        }
    }
}

/// GET /sse
pub async fn sse_handler(State(state): State<AppState>) -> impl IntoResponse {
    let token = CancellationToken::new();
    let rx = open_channel(state.config.clone(), token.clone());

    // Dropping the response body (client disconnect) drops the guard, which
    // cancels the token and stops the ping loop.
    let guard = token.drop_guard();
    let stream = ReceiverStream::new(rx).map(move |event| {
        let _ = &guard;
        Ok::<_, Infallible>(event.into_sse())
    });

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(stream),
    )
}
