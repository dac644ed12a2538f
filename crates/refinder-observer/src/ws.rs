//! `WebSocket` handler for real-time character update streaming.
//!
//! Clients connect to `GET /ws/character`, receive the latest update (if
//! any) immediately, and then a JSON-encoded [`CharacterUpdate`] message
//! each time the engine publishes.
//!
//! If a client falls behind, lagged messages are silently skipped and
//! the client resumes from the most recent update.
//!
//! [`CharacterUpdate`]: refinder_types::CharacterUpdate

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use refinder_types::CharacterUpdate;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming character updates.
///
/// # Route
///
/// `GET /ws/character`
pub async fn ws_character(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Send one update as a text frame. Returns `false` once the client is
/// gone.
async fn send_update(socket: &mut WebSocket, update: &CharacterUpdate) -> bool {
    let json = match serde_json::to_string(update) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize character update: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handle the `WebSocket` lifecycle: subscribe, send the current update,
/// then forward every broadcast as a text frame.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.subscribe();

    if let Some(current) = state.latest() {
        if !send_update(&mut socket, &current).await {
            debug!("WebSocket client disconnected (send failed)");
            return;
        }
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        if !send_update(&mut socket, &update).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
