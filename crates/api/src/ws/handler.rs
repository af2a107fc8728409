use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::handlers::config::load_gates;
use crate::state::AppState;
use crate::ws::events::{ConfigEvent, CONFIG_SNAPSHOT};

/// GET /api/v1/ws/config -- upgrade to the config feed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single subscriber after upgrade.
///
///   1. Registers the connection with `WsManager`.
///   2. Queues the current gates as a snapshot.
///   3. Spawns a sender task that forwards messages from the manager channel.
///   4. Drains inbound frames until the client leaves, then cleans up.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let ws_manager = state.ws_manager.clone();
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone()).await;

    match load_gates(&state.pool).await {
        Ok(gates) => {
            let event = ConfigEvent {
                kind: CONFIG_SNAPSHOT,
                gates: &gates,
            };
            match event.to_message() {
                Ok(msg) => {
                    ws_manager.send_to(&conn_id, msg).await;
                }
                Err(e) => tracing::warn!(error = %e, "Failed to encode config snapshot"),
            }
        }
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Failed to load config snapshot");
        }
    }

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // The feed is one-way; inbound frames are only watched for Close.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
