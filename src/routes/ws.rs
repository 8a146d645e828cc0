//! WebSocket handler: session lifecycle and frame relay.
//!
//! DESIGN
//! ======
//! On upgrade the bearer token is verified, the session is registered
//! synchronously (evicting any older session for the same user), and the
//! connection enters a `select!` loop:
//! - Incoming client frames → decode → `relay::handle` → apply `Outcome`
//! - Queued `Outbound` items from peers → forward to client
//!
//! Display-name lookup runs as a spawned task so a slow store never delays
//! registration; until it completes the session is `"Anonymous"`.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → verify token (close 4001 on failure)
//! 2. Register → close the evicted session with 1000, refresh its presence
//! 3. Client frames → dispatch → outcome applied via the registry
//! 4. Close → unregister → presence refresh for every joined room

use std::collections::HashMap;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use frames::{CLOSE_REPLACED, CLOSE_UNAUTHORIZED, ServerMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::services::auth::AuthError;
use crate::services::relay::{self, Outcome, RelayError};
use crate::services::session::Outbound;
use crate::state::AppState;

const UNAUTHORIZED_REASON: &str = "Invalid or missing token";
const REPLACED_REASON: &str = "New connection established";

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let verified = state.auth.verify(params.get("token").map(String::as_str));
    ws.on_upgrade(move |socket| async move {
        match verified {
            Ok(user_id) => run_ws(socket, state, user_id).await,
            Err(e) => reject(socket, &e).await,
        }
    })
}

async fn reject(mut socket: WebSocket, err: &AuthError) {
    warn!(error = %err, "ws: rejecting connection");
    close_socket(&mut socket, CLOSE_UNAUTHORIZED, UNAUTHORIZED_REASON).await;
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, user_id: String) {
    let client_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<Outbound>(state.outbound_capacity);

    let evicted = state
        .sessions
        .write()
        .await
        .register(client_id, user_id.clone(), client_tx);
    info!(%client_id, %user_id, "ws: client connected");

    if let Some(old) = evicted {
        info!(client_id = %old.client_id, %user_id, "ws: replacing previous session");
        old.send(Outbound::Close { code: CLOSE_REPLACED, reason: REPLACED_REASON });
        let sessions = state.sessions.read().await;
        for room_id in &old.rooms {
            sessions.broadcast_presence(room_id);
        }
    }

    spawn_name_resolution(&state, client_id, user_id);

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies = process_inbound_text(&state, client_id, &text).await;
                        if send_all(&mut socket, &replies).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            out = client_rx.recv() => match out {
                Some(Outbound::Message(message)) => {
                    if send_message(&mut socket, &message).await.is_err() {
                        break;
                    }
                }
                Some(Outbound::Close { code, reason }) => {
                    close_socket(&mut socket, code, reason).await;
                    break;
                }
                // Registry dropped our sender: we were evicted.
                None => {
                    close_socket(&mut socket, CLOSE_REPLACED, REPLACED_REASON).await;
                    break;
                }
            }
        }
    }

    let mut sessions = state.sessions.write().await;
    if let Some(session) = sessions.unregister(client_id) {
        for room_id in &session.rooms {
            sessions.broadcast_presence(room_id);
        }
    }
    info!(%client_id, live = sessions.len(), "ws: client disconnected");
}

/// Look up the display name in the background and patch it into the session.
/// Presence is refreshed for any room joined before the lookup finished.
fn spawn_name_resolution(state: &AppState, client_id: Uuid, user_id: String) {
    let state = state.clone();
    tokio::spawn(async move {
        let name = match state.store.user_name(&user_id).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                debug!(%client_id, %user_id, "ws: no display name on record");
                return;
            }
            Err(e) => {
                warn!(%client_id, %user_id, error = %e, "ws: display name lookup failed");
                return;
            }
        };

        let mut sessions = state.sessions.write().await;
        if !sessions.set_user_name(client_id, name) {
            return;
        }
        let rooms: Vec<String> = sessions
            .get(client_id)
            .map(|s| s.rooms.iter().cloned().collect())
            .unwrap_or_default();
        for room_id in &rooms {
            sessions.broadcast_presence(room_id);
        }
    });
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Decode and handle one inbound text frame. Returns frames for the sender
/// only; everything addressed to the room goes through the registry.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Vec<ServerMessage> {
    let message = match frames::decode_client(text) {
        Ok(m) => m,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            return vec![ServerMessage::error(e.to_string())];
        }
    };

    info!(%client_id, kind = message.kind(), room_id = message.room_id(), "ws: recv");

    match relay::handle(state, client_id, message).await {
        Ok(outcome) => {
            apply_outcome(state, client_id, outcome).await;
            vec![]
        }
        Err(e) => {
            if !matches!(e, RelayError::Persistence { .. } | RelayError::Lookup(_)) {
                warn!(%client_id, error = %e, "ws: operation rejected");
            }
            vec![ServerMessage::error(e.to_string())]
        }
    }
}

async fn apply_outcome(state: &AppState, client_id: Uuid, outcome: Outcome) {
    let sessions = state.sessions.read().await;
    match outcome {
        Outcome::Done => {}
        Outcome::Broadcast { room_id, message } => {
            sessions.broadcast(&room_id, &message, None);
        }
        Outcome::BroadcastExcludeSender { room_id, message } => {
            sessions.broadcast(&room_id, &message, Some(client_id));
        }
        Outcome::Presence(room_id) => {
            sessions.broadcast_presence(&room_id);
        }
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

async fn send_all(socket: &mut WebSocket, messages: &[ServerMessage]) -> Result<(), ()> {
    for message in messages {
        send_message(socket, message).await?;
    }
    Ok(())
}

async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), ()> {
    let json = match frames::encode(message) {
        Ok(j) => j,
        Err(e) => {
            error!(error = %e, "ws: failed to serialize message");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

async fn close_socket(socket: &mut WebSocket, code: u16, reason: &'static str) {
    let frame = CloseFrame { code, reason: Utf8Bytes::from_static(reason) };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        debug!(error = %e, code, "ws: close frame not delivered");
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
