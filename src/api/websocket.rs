//! WebSocket bridge for a single chat room.
//!
//! A connected gateway receives every announcement for the room and may
//! forward chat lines, which are dispatched as commands posted in that room.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::handlers::AppState;
use super::types::{ErrorResponse, WsMessage};
use crate::commands::ChatMessage;
use crate::war::RoomId;

/// WebSocket upgrade handler.
pub async fn ws_room_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, room))
}

async fn send_json(sink: &mut SplitSink<WebSocket, Message>, msg: &WsMessage) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => sink.send(Message::Text(json.into())).await.is_ok(),
        Err(_) => true,
    }
}

/// Handle WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState, room: String) {
    let (mut sink, mut stream) = socket.split();

    let subscription = room
        .parse::<RoomId>()
        .and_then(|id| state.transport.subscribe(&id).map(|rx| (id, rx)));
    let (room, mut announcements) = match subscription {
        Ok(pair) => pair,
        Err(e) => {
            let (_, body) = ErrorResponse::from_war_error(&e);
            let err = WsMessage::Error {
                code: body.code,
                message: body.message,
            };
            send_json(&mut sink, &err).await;
            return;
        }
    };

    debug!(room = %room, "gateway connected");

    'session: loop {
        tokio::select! {
            received = announcements.recv() => {
                let text = match received {
                    Ok(text) => text,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(room = %room, skipped, "gateway fell behind on announcements");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let msg = WsMessage::Announcement { room: room.to_string(), text };
                if !send_json(&mut sink, &msg).await {
                    break;
                }
            }
            incoming = stream.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text.to_string(),
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };

                let ws_msg: WsMessage = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(e) => {
                        let err = WsMessage::Error {
                            code: "PARSE_ERROR".to_string(),
                            message: e.to_string(),
                        };
                        send_json(&mut sink, &err).await;
                        continue;
                    }
                };

                match ws_msg {
                    WsMessage::Chat { sender, text } => {
                        let message = ChatMessage {
                            room: Some(room.clone()),
                            sender,
                            text,
                        };
                        for text in state.dispatcher.handle(&message).unwrap_or_default() {
                            if !send_json(&mut sink, &WsMessage::Reply { text }).await {
                                break 'session;
                            }
                        }
                    }
                    WsMessage::Ping => {
                        send_json(&mut sink, &WsMessage::Pong).await;
                    }
                    _ => {
                        let err = WsMessage::Error {
                            code: "INVALID_MESSAGE".to_string(),
                            message: "Expected chat or ping message".to_string(),
                        };
                        send_json(&mut sink, &err).await;
                    }
                }
            }
        }
    }

    drop(announcements);
    if let Err(e) = state.transport.unsubscribe(&room) {
        warn!(room = %room, error = %e, "room channel not released");
    }
    debug!(room = %room, "gateway disconnected");
}
