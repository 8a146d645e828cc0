//! Connection lifecycle for the room websocket.
//!
//! The host owns the actual socket; this module decides what to do when it
//! opens or closes. Transient drops reconnect with exponential backoff
//! (1 s doubling to a 10 s cap, reset after a successful open). An
//! unauthorized close is terminal and sends the user back to sign-in. A
//! replaced close is terminal too: another tab now owns the session, and
//! reconnecting would evict it in turn.

#[cfg(test)]
#[path = "net_test.rs"]
mod net_test;

use std::time::Duration;

use frames::{CLOSE_REPLACED, CLOSE_UNAUTHORIZED};

const INITIAL_BACKOFF_MS: u64 = 1_000;
const MAX_BACKOFF_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("invalid server url: {0}")]
    BadUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    /// Closed for good: replaced by another connection or closed locally.
    Disconnected,
    /// The server rejected the token.
    Unauthorized,
}

/// Exponential reconnect delay.
#[derive(Debug, Clone)]
pub struct Backoff {
    next_ms: u64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { next_ms: INITIAL_BACKOFF_MS }
    }
}

impl Backoff {
    /// Delay before the next attempt; doubles the one after, up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next_ms;
        self.next_ms = current.saturating_mul(2).min(MAX_BACKOFF_MS);
        Duration::from_millis(current)
    }

    pub fn reset(&mut self) {
        self.next_ms = INITIAL_BACKOFF_MS;
    }
}

/// What the host should do after the socket closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconnect {
    /// Open a new socket after this delay.
    After(Duration),
    /// Redirect to sign-in.
    SignIn,
    Stop,
}

/// Per-room connection state machine.
#[derive(Debug, Clone, Default)]
pub struct Connection {
    state: ConnectionState,
    backoff: Backoff,
}

impl Connection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The socket opened. The host should send `join_room` next.
    pub fn on_open(&mut self) {
        self.state = ConnectionState::Connected;
        self.backoff.reset();
    }

    /// The socket closed with `code`.
    pub fn on_close(&mut self, code: u16) -> Reconnect {
        match (self.state, code) {
            (ConnectionState::Disconnected, _) => Reconnect::Stop,
            (_, CLOSE_UNAUTHORIZED) => {
                self.state = ConnectionState::Unauthorized;
                Reconnect::SignIn
            }
            (ConnectionState::Unauthorized, _) => Reconnect::SignIn,
            (_, CLOSE_REPLACED) => {
                self.state = ConnectionState::Disconnected;
                Reconnect::Stop
            }
            _ => {
                self.state = ConnectionState::Connecting;
                Reconnect::After(self.backoff.next_delay())
            }
        }
    }

    /// The user left the room; later closes are not retried.
    pub fn close(&mut self) {
        self.state = ConnectionState::Disconnected;
    }
}

/// Websocket URL for a server base URL: `http` becomes `ws`, `https` becomes
/// `wss`, and the token rides in the `token` query parameter.
///
/// # Errors
///
/// Returns [`NetError::BadUrl`] for unparseable URLs and non-web schemes.
pub fn ws_url(base: &str, token: &str) -> Result<reqwest::Url, NetError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| NetError::BadUrl(e.to_string()))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(NetError::BadUrl(format!("unsupported scheme: {other}"))),
    };
    url.set_scheme(scheme).map_err(|()| NetError::BadUrl(base.to_owned()))?;
    url.path_segments_mut()
        .map_err(|()| NetError::BadUrl(base.to_owned()))?
        .pop_if_empty()
        .push("ws");
    url.query_pairs_mut().clear().append_pair("token", token);
    Ok(url)
}
