//! `WebSocket` handler for live roster updates.
//!
//! Clients connect to `GET /superheroes/ws`. Each connection joins the
//! roster as a session: it first receives an `init` message with the full
//! sorted roster, then one `created`, `updated`, or `removed` message per
//! accepted change. Messages from the client are ignored.
//!
//! Delivery is best-effort. A viewer that falls behind misses events
//! and should reconnect to get a fresh snapshot.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming roster events.
///
/// # Route
///
/// `GET /superheroes/ws`
pub async fn ws_superheroes(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: join the roster, forward each event
/// as a text frame, and leave on disconnect.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut session = state.roster.join().await;
    let session_id = session.id();
    debug!(session = %session_id, "WebSocket viewer connected");

    loop {
        tokio::select! {
            // Receive the next roster event for this session.
            event = session.recv() => {
                let Some(event) = event else {
                    debug!(session = %session_id, "session closed by roster");
                    break;
                };
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!("Failed to serialize roster event: {e}");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!(session = %session_id, "WebSocket viewer disconnected (send failed)");
                    break;
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(session = %session_id, "WebSocket viewer disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(session = %session_id, "WebSocket viewer disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(session = %session_id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Viewers are not expected to send anything else.
                    }
                }
            }
        }
    }

    state.roster.leave(session_id).await;
}
