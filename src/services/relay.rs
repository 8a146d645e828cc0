//! Room relay: validate, persist and route one client operation.
//!
//! DESIGN
//! ======
//! `handle` is pure business logic. It resolves the target room, writes to
//! the store where the operation is durable, and returns an [`Outcome`]
//! describing who should receive what. The websocket layer owns delivery.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is a [`RelayError`] whose `Display` text is the message
//! sent back to the originating client. A failed write suppresses the
//! broadcast entirely, so peers never see an operation that was not stored.
//!
//! Registry locks are taken only for the duration of a read or a membership
//! update and are never held across a store call.

use frames::{ClientMessage, ServerMessage};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::room::resolve_room;
use crate::services::store::StoreError;
use crate::state::AppState;

/// Routing decision for a handled operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to deliver.
    Done,
    /// Deliver to every member of the room, sender included.
    Broadcast { room_id: String, message: ServerMessage },
    /// Deliver to every member of the room except the sender.
    BroadcastExcludeSender { room_id: String, message: ServerMessage },
    /// Membership changed: push a presence snapshot to the room.
    Presence(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Room lookup failed")]
    Lookup(#[source] StoreError),
    #[error("Failed to save {what}")]
    Persistence {
        what: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("Eraser strokes cannot be stored as shapes")]
    InvalidShape,
    #[error("Invalid zoom level")]
    InvalidZoom,
}

/// Handle one decoded operation from `client_id`.
///
/// # Errors
///
/// Returns [`RelayError`] when the room does not resolve, the payload is
/// rejected, or the store write fails.
pub async fn handle(state: &AppState, client_id: Uuid, message: ClientMessage) -> Result<Outcome, RelayError> {
    match message {
        ClientMessage::JoinRoom { room_id } => {
            let joined = state.sessions.write().await.join_room(client_id, &room_id);
            debug!(%client_id, %room_id, joined, "relay: join_room");
            Ok(Outcome::Presence(room_id))
        }
        ClientMessage::LeaveRoom { room_id } => {
            let left = state.sessions.write().await.leave_room(client_id, &room_id);
            debug!(%client_id, %room_id, left, "relay: leave_room");
            Ok(Outcome::Presence(room_id))
        }
        ClientMessage::Shape { room_id, shape_data } => {
            let room = require_room(state, &room_id).await?;
            if shape_data.is_marker() {
                return Err(RelayError::InvalidShape);
            }
            let Some((user_id, user_name)) = sender_identity(state, client_id).await else {
                return Ok(Outcome::Done);
            };

            let json = serde_json::to_string(&shape_data)
                .map_err(|e| RelayError::Persistence { what: "shape", source: e.into() })?;
            state
                .store
                .save_shape(room, &user_id, &json)
                .await
                .map_err(|source| {
                    error!(%client_id, %room_id, error = %source, "relay: shape persist failed");
                    RelayError::Persistence { what: "shape", source }
                })?;

            Ok(Outcome::BroadcastExcludeSender {
                message: ServerMessage::Shape { room_id: room_id.clone(), shape_data, user_id, user_name },
                room_id,
            })
        }
        ClientMessage::Chat { room_id, message } => {
            let room = require_room(state, &room_id).await?;
            let Some((user_id, user_name)) = sender_identity(state, client_id).await else {
                return Ok(Outcome::Done);
            };

            state
                .store
                .save_chat(room, &user_id, &message)
                .await
                .map_err(|source| {
                    error!(%client_id, %room_id, error = %source, "relay: chat persist failed");
                    RelayError::Persistence { what: "chat", source }
                })?;

            Ok(Outcome::Broadcast {
                message: ServerMessage::Chat {
                    room_id: room_id.clone(),
                    message,
                    user_id,
                    user_name,
                    timestamp: now_rfc3339(),
                },
                room_id,
            })
        }
        ClientMessage::EraseShape { room_id, shape_id } => {
            require_room(state, &room_id).await?;
            Ok(Outcome::BroadcastExcludeSender {
                message: ServerMessage::EraseShape { room_id: room_id.clone(), shape_id },
                room_id,
            })
        }
        ClientMessage::ClearCanvas { room_id } => {
            require_room(state, &room_id).await?;
            Ok(Outcome::BroadcastExcludeSender {
                message: ServerMessage::ClearCanvas { room_id: room_id.clone() },
                room_id,
            })
        }
        ClientMessage::Zoom { room_id, zoom_level } => {
            if !(zoom_level.is_finite() && zoom_level > 0.0) {
                return Err(RelayError::InvalidZoom);
            }
            require_room(state, &room_id).await?;
            Ok(Outcome::BroadcastExcludeSender {
                message: ServerMessage::Zoom { room_id: room_id.clone(), zoom_level },
                room_id,
            })
        }
    }
}

async fn require_room(state: &AppState, room_id: &str) -> Result<i64, RelayError> {
    match resolve_room(state.store.as_ref(), room_id).await {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(RelayError::RoomNotFound),
        Err(e) => {
            error!(%room_id, error = %e, "relay: room lookup failed");
            Err(RelayError::Lookup(e))
        }
    }
}

/// Current `(user_id, user_name)` for the sender, or `None` if the session
/// has been evicted mid-flight.
async fn sender_identity(state: &AppState, client_id: Uuid) -> Option<(String, String)> {
    let sessions = state.sessions.read().await;
    sessions
        .get(client_id)
        .map(|s| (s.user_id.clone(), s.user_name.clone()))
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
