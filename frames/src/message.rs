//! Websocket message envelopes.
//!
//! Every frame is a JSON object discriminated by `type` (snake_case) with
//! camelCase fields. Decoding goes through these enums, so a frame with an
//! unknown `type` or a missing field is rejected at the transport boundary
//! instead of being read field-by-field.
//!
//! `roomId` is accepted as either a JSON string or a JSON integer and is
//! always carried as a string: clients address rooms by slug or numeric id
//! interchangeably.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Serialize};

use crate::shape::{Shape, ShapeId};

/// Operations sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinRoom {
        #[serde(deserialize_with = "room_key::deserialize")]
        room_id: String,
    },
    LeaveRoom {
        #[serde(deserialize_with = "room_key::deserialize")]
        room_id: String,
    },
    Shape {
        #[serde(deserialize_with = "room_key::deserialize")]
        room_id: String,
        shape_data: Shape,
    },
    EraseShape {
        #[serde(deserialize_with = "room_key::deserialize")]
        room_id: String,
        shape_id: ShapeId,
    },
    ClearCanvas {
        #[serde(deserialize_with = "room_key::deserialize")]
        room_id: String,
    },
    Zoom {
        #[serde(deserialize_with = "room_key::deserialize")]
        room_id: String,
        zoom_level: f64,
    },
    Chat {
        #[serde(deserialize_with = "room_key::deserialize")]
        room_id: String,
        message: String,
    },
}

impl ClientMessage {
    /// Room the operation targets.
    #[must_use]
    pub fn room_id(&self) -> &str {
        match self {
            Self::JoinRoom { room_id }
            | Self::LeaveRoom { room_id }
            | Self::Shape { room_id, .. }
            | Self::EraseShape { room_id, .. }
            | Self::ClearCanvas { room_id }
            | Self::Zoom { room_id, .. }
            | Self::Chat { room_id, .. } => room_id,
        }
    }

    /// Wire `type` tag, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom { .. } => "leave_room",
            Self::Shape { .. } => "shape",
            Self::EraseShape { .. } => "erase_shape",
            Self::ClearCanvas { .. } => "clear_canvas",
            Self::Zoom { .. } => "zoom",
            Self::Chat { .. } => "chat",
        }
    }
}

/// One entry of a presence snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresence {
    pub user_id: String,
    pub user_name: String,
}

/// A persisted chat message as served by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Messages pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// A shape drawn by another member.
    Shape {
        room_id: String,
        shape_data: Shape,
        #[serde(default)]
        user_id: String,
        #[serde(default)]
        user_name: String,
    },
    EraseShape {
        room_id: String,
        shape_id: ShapeId,
    },
    ClearCanvas {
        room_id: String,
    },
    Zoom {
        room_id: String,
        zoom_level: f64,
    },
    /// Chat message, echoed to the sender as well.
    Chat {
        room_id: String,
        message: String,
        #[serde(default)]
        user_id: String,
        #[serde(default)]
        user_name: String,
        #[serde(default)]
        timestamp: String,
    },
    /// Full presence snapshot for a room.
    ActiveUsers {
        room_id: String,
        users: Vec<UserPresence>,
    },
    /// The sender's operation was rejected.
    Error {
        message: String,
    },
}

impl ServerMessage {
    /// Build an error reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}

mod room_key {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRoomKey {
        Text(String),
        Number(i64),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawRoomKey::deserialize(deserializer)? {
            RawRoomKey::Text(s) => s,
            RawRoomKey::Number(n) => n.to_string(),
        })
    }
}
