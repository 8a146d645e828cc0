//! Chat log for the room's side panel.
//!
//! The server echoes chat back to its sender, so own messages are appended
//! optimistically when posted and the echo is dropped by matching `userId`.
//! Messages that only carry a legacy embedded shape are never shown.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use frames::shape::legacy_shape_payload;
use frames::{ChatMessage, ClientMessage, ServerMessage};

#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    room_id: String,
    user_id: String,
    user_name: String,
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    #[must_use]
    pub fn new(room_id: impl Into<String>, user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self { room_id: room_id.into(), user_id: user_id.into(), user_name: user_name.into(), messages: Vec::new() }
    }

    /// Seed with history. Replaces anything already in the log.
    pub fn load(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Append an own message and return the frame to send. Blank text
    /// produces nothing.
    pub fn post_local(&mut self, text: &str) -> Option<ClientMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage {
            message: text.to_owned(),
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            timestamp: String::new(),
        });
        Some(ClientMessage::Chat { room_id: self.room_id.clone(), message: text.to_owned() })
    }

    /// Apply a server broadcast. Returns `true` when the log changed.
    pub fn apply_remote(&mut self, message: &ServerMessage) -> bool {
        let ServerMessage::Chat { room_id, message, user_id, user_name, timestamp } = message else {
            return false;
        };
        if *room_id != self.room_id || *user_id == self.user_id || legacy_shape_payload(message).is_some() {
            return false;
        }
        self.messages.push(ChatMessage {
            message: message.clone(),
            user_id: user_id.clone(),
            user_name: user_name.clone(),
            timestamp: timestamp.clone(),
        });
        true
    }

    /// Display name changes once the server has resolved it.
    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.user_name = name.into();
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
