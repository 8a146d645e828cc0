//! Connected-session registry.
//!
//! DESIGN
//! ======
//! One `SessionRegistry` lives in `AppState` behind a `RwLock`. It owns every
//! live connection's record (user identity, joined rooms, outbound queue) and
//! derives room membership from those records, so presence is always a pure
//! function of registry contents.
//!
//! At most one session exists per `user_id`: `register` evicts the previous
//! session and hands it back so the caller can close its socket and refresh
//! presence for the rooms it was in.
//!
//! Fan-out is synchronous `try_send` into each connection's bounded queue.
//! A full queue drops that frame for that member only.

use std::collections::{HashMap, HashSet};

use frames::{ServerMessage, UserPresence};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};
use uuid::Uuid;

/// Display name used until the user record has been looked up.
pub const ANONYMOUS: &str = "Anonymous";

/// Item queued for a connection's writer loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Message(ServerMessage),
    /// Close the socket with this code and reason, then stop.
    Close { code: u16, reason: &'static str },
}

/// One live websocket connection.
#[derive(Debug)]
pub struct Session {
    pub client_id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub rooms: HashSet<String>,
    tx: mpsc::Sender<Outbound>,
}

impl Session {
    /// Queue `item` for this connection. Returns `false` if it was dropped.
    pub fn send(&self, item: Outbound) -> bool {
        match self.tx.try_send(item) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(client_id = %self.client_id, user_id = %self.user_id, "ws: outbound queue full, dropping frame");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(client_id = %self.client_id, "ws: outbound queue closed");
                false
            }
        }
    }

    fn presence(&self) -> UserPresence {
        UserPresence { user_id: self.user_id.clone(), user_name: self.user_name.clone() }
    }
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, Session>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection for `user_id`, evicting and returning any
    /// existing session for the same user.
    pub fn register(&mut self, client_id: Uuid, user_id: String, tx: mpsc::Sender<Outbound>) -> Option<Session> {
        let previous_id = self.find_by_user_id(&user_id).map(|s| s.client_id);
        let previous = previous_id.and_then(|id| self.sessions.remove(&id));

        self.sessions.insert(
            client_id,
            Session { client_id, user_id, user_name: ANONYMOUS.to_owned(), rooms: HashSet::new(), tx },
        );
        previous
    }

    /// Remove a connection. Returns `None` if it was already evicted.
    pub fn unregister(&mut self, client_id: Uuid) -> Option<Session> {
        self.sessions.remove(&client_id)
    }

    #[must_use]
    pub fn get(&self, client_id: Uuid) -> Option<&Session> {
        self.sessions.get(&client_id)
    }

    #[must_use]
    pub fn find_by_user_id(&self, user_id: &str) -> Option<&Session> {
        self.sessions.values().find(|s| s.user_id == user_id)
    }

    pub fn find_by_room<'a>(&'a self, room_id: &'a str) -> impl Iterator<Item = &'a Session> + 'a {
        self.sessions.values().filter(move |s| s.rooms.contains(room_id))
    }

    /// Add `room_id` to the session's rooms. Returns `true` if newly joined.
    pub fn join_room(&mut self, client_id: Uuid, room_id: &str) -> bool {
        self.sessions
            .get_mut(&client_id)
            .is_some_and(|s| s.rooms.insert(room_id.to_owned()))
    }

    /// Remove `room_id` from the session's rooms. Returns `true` if it was a member.
    pub fn leave_room(&mut self, client_id: Uuid, room_id: &str) -> bool {
        self.sessions
            .get_mut(&client_id)
            .is_some_and(|s| s.rooms.remove(room_id))
    }

    /// Update the display name in place. A session that has already gone away
    /// is ignored.
    pub fn set_user_name(&mut self, client_id: Uuid, user_name: String) -> bool {
        match self.sessions.get_mut(&client_id) {
            Some(session) => {
                session.user_name = user_name;
                true
            }
            None => false,
        }
    }

    /// Members of `room_id`, sorted by user id for stable snapshots.
    #[must_use]
    pub fn presence(&self, room_id: &str) -> Vec<UserPresence> {
        let mut users: Vec<UserPresence> = self.find_by_room(room_id).map(Session::presence).collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        users
    }

    /// Deliver `message` to every member of `room_id` except `exclude`.
    /// Returns how many members accepted it.
    pub fn broadcast(&self, room_id: &str, message: &ServerMessage, exclude: Option<Uuid>) -> usize {
        self.find_by_room(room_id)
            .filter(|s| exclude != Some(s.client_id))
            .filter(|s| s.send(Outbound::Message(message.clone())))
            .count()
    }

    /// Push a fresh `active_users` snapshot to every member of `room_id`.
    pub fn broadcast_presence(&self, room_id: &str) -> usize {
        let snapshot = ServerMessage::ActiveUsers { room_id: room_id.to_owned(), users: self.presence(room_id) };
        self.broadcast(room_id, &snapshot, None)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
