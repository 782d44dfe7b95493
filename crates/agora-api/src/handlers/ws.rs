//! WebSocket upgrade handler for the push channel.
//!
//! The channel is server-to-client only: listeners receive change-feed
//! envelopes and are expected to send nothing back. Inbound frames are
//! drained and ignored.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::{HeaderMap, header};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use agora_core::error::AppError;
use agora_realtime::origin::origin_allowed;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws — WebSocket upgrade, admitted by Origin header.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());

    if !origin_allowed(origin, &state.config.realtime.allowed_origins) {
        warn!(origin = origin.unwrap_or("<none>"), "WebSocket origin refused");
        return Err(AppError::authorization("Origin not allowed").into());
    }

    Ok(ws.on_upgrade(move |socket| handle_listener(state, socket)))
}

/// Pumps change-feed frames to one connected listener until it goes away.
async fn handle_listener(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (listener_id, mut frames) = state.registry.register();
    info!(listener_id = %listener_id, "WebSocket listener connected");

    let outbound = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(listener_id = %listener_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound.abort();
    state.registry.remove(&listener_id);
    info!(listener_id = %listener_id, "WebSocket listener disconnected");
}
