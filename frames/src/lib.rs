//! Shared wire model for realtime whiteboard transport.
//!
//! This crate owns the representation used by both the server and the canvas
//! client: the vector [`shape::Shape`] union and the JSON message envelopes
//! exchanged over the websocket ([`message::ClientMessage`] and
//! [`message::ServerMessage`]). One websocket text frame carries exactly one
//! message.

pub mod message;
pub mod shape;

pub use message::{ChatMessage, ClientMessage, ServerMessage, UserPresence};
pub use shape::{Geometry, Point, Shape, ShapeId};

use serde::Serialize;

/// Close code sent when the connection's bearer token fails verification.
pub const CLOSE_UNAUTHORIZED: u16 = 4001;

/// Close code sent to a connection replaced by a newer one for the same user.
pub const CLOSE_REPLACED: u16 = 1000;

/// Error returned by [`decode_client`] and [`decode_server`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not JSON, or does not match the schema for its `type`.
    #[error("invalid frame: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode any message into a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails (non-string map keys).
pub fn encode<T: Serialize>(message: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a client → server text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON, an unknown `type`, or
/// missing required fields.
pub fn decode_client(text: &str) -> Result<ClientMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode a server → client text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON, an unknown `type`, or
/// missing required fields.
pub fn decode_server(text: &str) -> Result<ServerMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
