use crate::game_manager::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use shared::{ClientMessage, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Forward queued events to the socket. Ends once the hub drops `tx`.
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(event = msg.event(), error = %e, "Failed to encode message");
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let player_id = uuid::Uuid::new_v4().to_string();
    state
        .game_manager
        .lock()
        .await
        .add_player(player_id.clone(), tx);

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => match ClientMessage::from_text(&text) {
                Ok(client_msg) => {
                    state
                        .game_manager
                        .lock()
                        .await
                        .handle_message(&player_id, client_msg);
                }
                Err(e) => {
                    tracing::warn!(player_id = %player_id, error = %e, "Dropping unreadable frame");
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.game_manager.lock().await.remove_player(&player_id);
}
