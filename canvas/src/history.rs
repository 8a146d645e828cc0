//! History bootstrap: rebuild a room's canvas and chat log from the HTTP
//! history endpoints before live traffic starts.
//!
//! DESIGN
//! ======
//! The shapes endpoint is the primary source. Rooms whose drawings predate
//! it only have shapes embedded in chat messages as `{"shape": {...}}`, so a
//! failed shapes request falls back to scanning chat history. Both failing
//! yields an empty canvas; bootstrap never blocks joining the room.
//!
//! Records are normalized on the way in: a record without `shapeId` gets a
//! stable id derived from its row id, or from its position when the row id is
//! missing too, so later erases can still address it. Records that do not
//! decode as a shape are skipped.
//!
//! ERROR HANDLING
//! ==============
//! Transport errors surface as [`HistoryError`] from a [`HistorySource`] and
//! are logged with `tracing::warn!` by the loaders, which always return a
//! (possibly empty) list.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::future::Future;

use frames::shape::legacy_shape_payload;
use frames::{ChatMessage, Shape, ShapeId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("invalid base url: {0}")]
    BadUrl(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Where raw history records come from.
pub trait HistorySource {
    /// Raw shape records for a room, oldest first.
    fn fetch_shapes(&self, room: &str) -> impl Future<Output = Result<Vec<Value>, HistoryError>>;

    /// Raw chat records for a room, oldest first.
    fn fetch_chats(&self, room: &str) -> impl Future<Output = Result<Vec<Value>, HistoryError>>;
}

// =============================================================================
// HTTP SOURCE
// =============================================================================

#[derive(Deserialize)]
struct ShapesBody {
    #[serde(default)]
    shapes: Vec<Value>,
}

#[derive(Deserialize)]
struct ChatsBody {
    #[serde(default)]
    messages: Vec<Value>,
}

/// [`HistorySource`] backed by `GET {base}/shapes/{room}` and
/// `GET {base}/chats/{room}`.
#[derive(Debug, Clone)]
pub struct HttpHistory {
    http: reqwest::Client,
    base: reqwest::Url,
}

impl HttpHistory {
    /// # Errors
    ///
    /// Returns [`HistoryError::BadUrl`] if `base_url` does not parse or cannot
    /// carry a path.
    pub fn new(base_url: &str) -> Result<Self, HistoryError> {
        let base = reqwest::Url::parse(base_url).map_err(|e| HistoryError::BadUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(HistoryError::BadUrl(base_url.to_owned()));
        }
        Ok(Self { http: reqwest::Client::new(), base })
    }

    /// `{base}/{collection}/{room}` with the room id percent-encoded as one
    /// path segment.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::BadUrl`] if the base cannot carry a path.
    pub fn endpoint(&self, collection: &str, room: &str) -> Result<reqwest::Url, HistoryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| HistoryError::BadUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(collection)
            .push(room);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: reqwest::Url) -> Result<T, HistoryError> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.json::<T>().await?)
    }
}

impl HistorySource for HttpHistory {
    async fn fetch_shapes(&self, room: &str) -> Result<Vec<Value>, HistoryError> {
        let body: ShapesBody = self.get_json(self.endpoint("shapes", room)?).await?;
        Ok(body.shapes)
    }

    async fn fetch_chats(&self, room: &str) -> Result<Vec<Value>, HistoryError> {
        let body: ChatsBody = self.get_json(self.endpoint("chats", room)?).await?;
        Ok(body.messages)
    }
}

// =============================================================================
// LOADERS
// =============================================================================

/// Shapes to seed the canvas with. Never fails; see the module docs for the
/// fallback order.
pub async fn load_room_shapes<S: HistorySource>(source: &S, room: &str) -> Vec<Shape> {
    let err = match source.fetch_shapes(room).await {
        Ok(records) => return normalize_records(records),
        Err(e) => e,
    };
    warn!(room, error = %err, "shape history unavailable; scanning chat history");

    match source.fetch_chats(room).await {
        Ok(records) => shapes_from_chats(records),
        Err(e) => {
            warn!(room, error = %e, "chat history unavailable; starting with an empty canvas");
            Vec::new()
        }
    }
}

/// Plain chat history for the chat panel. Records carrying legacy shapes are
/// left out. Empty on failure.
pub async fn load_room_chat<S: HistorySource>(source: &S, room: &str) -> Vec<ChatMessage> {
    let records = match source.fetch_chats(room).await {
        Ok(records) => records,
        Err(e) => {
            warn!(room, error = %e, "chat history unavailable");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<ChatMessage>(record) {
            Ok(chat) => Some(chat),
            Err(e) => {
                debug!(error = %e, "skipping undecodable chat record");
                None
            }
        })
        .filter(|chat| legacy_shape_payload(&chat.message).is_none())
        .collect()
}

/// Decode shape records, synthesizing missing ids. Undecodable records and
/// eraser markers are dropped.
#[must_use]
pub fn normalize_records(records: Vec<Value>) -> Vec<Shape> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let fallback = row_id(&record).map_or_else(|| ShapeId::from(format!("legacy-{index}")), ShapeId::from_row_id);
            decode(record, fallback)
        })
        .collect()
}

fn shapes_from_chats(records: Vec<Value>) -> Vec<Shape> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let payload = record.get("message").and_then(Value::as_str).and_then(legacy_shape_payload)?;
            let fallback = row_id(&record).map_or_else(
                || ShapeId::from(format!("legacy-chat-{index}")),
                |id| ShapeId::from(format!("chat-{id}")),
            );
            decode(payload, fallback)
        })
        .collect()
}

fn row_id(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

fn decode(record: Value, fallback: ShapeId) -> Option<Shape> {
    match Shape::from_record(record, || fallback) {
        Ok(shape) if !shape.is_marker() => Some(shape),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "skipping undecodable shape record");
            None
        }
    }
}
