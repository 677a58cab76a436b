use crate::host::NoticeLevel;
use crate::remote::dispatch;
use crate::remote::registry::CommandRegistry;
use crate::remote::routes::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use keydeck_core::commands::decode_command_entries;
use keydeck_core::wire::{DeviceMessage, WireError};

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state))
}

/// One device session: its own registry, strictly sequential message
/// handling. Nothing a single session does can stop the listener, and
/// sessions never share registry state.
async fn handle_session(mut socket: WebSocket, state: AppState) {
    let session_id = uuid::Uuid::new_v4();
    log::info!("device connected (session {session_id})");

    let mut registry = CommandRegistry::new();

    while let Some(frame) = socket.recv().await {
        let message = match frame {
            Ok(Message::Text(text)) => match DeviceMessage::decode(&text) {
                Ok(message) => message,
                Err(WireError::UnknownKind(kind)) => {
                    log::debug!("session {session_id}: ignoring unknown message kind {kind:?}");
                    continue;
                }
                Err(WireError::Malformed(reason)) => {
                    // A single bad frame must not end the session.
                    log::warn!("session {session_id}: discarding malformed message: {reason}");
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // binary, ping, pong
            Err(e) => {
                log::warn!("session {session_id}: socket error: {e}");
                break;
            }
        };

        match message {
            DeviceMessage::CommandList { data } => {
                let (commands, rejected) = decode_command_entries(&data);
                for reject in &rejected {
                    log::warn!("session {session_id}: {reject}");
                    state.host.notify(NoticeLevel::Warning, &reject.to_string());
                }
                log::info!("session {session_id}: synced {} commands", commands.len());
                registry.replace_all(commands);
            }
            DeviceMessage::Run { id } => {
                if let Err(e) = dispatch::dispatch(&registry, &state.host, &id) {
                    log::warn!("session {session_id}: {e}");
                    state.host.notify(NoticeLevel::Warning, &e.to_string());
                }
            }
        }
    }

    log::info!("device disconnected (session {session_id})");
}
