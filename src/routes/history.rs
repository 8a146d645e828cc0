//! Room history endpoints used to bootstrap a freshly opened canvas.
//!
//! `GET /shapes/{roomId}` and `GET /chats/{roomId}` are public, matching the
//! websocket's room addressing (slug or numeric id). `DELETE /shapes/{roomId}`
//! requires the same bearer token the websocket accepts, raw or with a
//! `Bearer ` prefix.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Json, Response};
use frames::ShapeId;
use serde::Serialize;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, warn};

use crate::services::auth::bearer_token;
use crate::services::room::resolve_room;
use crate::services::session::ANONYMOUS;
use crate::services::store::{ChatRecord, ShapeRecord, StoreError};
use crate::state::AppState;

/// Chat rows served per request.
pub const CHAT_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal server error")]
    Store(#[from] StoreError),
}

pub(crate) fn history_error_to_status(err: &HistoryError) -> StatusCode {
    match err {
        HistoryError::RoomNotFound => StatusCode::NOT_FOUND,
        HistoryError::Unauthorized => StatusCode::FORBIDDEN,
        HistoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        if let HistoryError::Store(e) = &self {
            error!(error = %e, "history: store failure");
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (history_error_to_status(&self), body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ShapesResponse {
    pub shapes: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatsResponse {
    pub messages: Vec<ChatEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub id: i64,
    pub message: String,
    pub user_id: String,
    pub user_name: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
}

/// `GET /shapes/{roomId}`: every stored shape, oldest first.
pub async fn list_shapes(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ShapesResponse>, HistoryError> {
    let room = resolve_room(state.store.as_ref(), &room_id)
        .await?
        .ok_or(HistoryError::RoomNotFound)?;
    let records = state.store.list_shapes(room).await?;
    Ok(Json(ShapesResponse { shapes: records.iter().filter_map(shape_entry).collect() }))
}

/// `GET /chats/{roomId}`: the latest chat messages, oldest first.
pub async fn list_chats(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ChatsResponse>, HistoryError> {
    let room = resolve_room(state.store.as_ref(), &room_id)
        .await?
        .ok_or(HistoryError::RoomNotFound)?;
    let records = state.store.list_chats(room, CHAT_HISTORY_LIMIT).await?;
    Ok(Json(ChatsResponse { messages: records.into_iter().map(chat_entry).collect() }))
}

/// `DELETE /shapes/{roomId}`: remove every stored shape in the room.
pub async fn clear_shapes(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ClearResponse>, HistoryError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(bearer_token);
    let user_id = state.auth.verify(token).map_err(|e| {
        warn!(error = %e, "history: clear rejected");
        HistoryError::Unauthorized
    })?;

    let room = resolve_room(state.store.as_ref(), &room_id)
        .await?
        .ok_or(HistoryError::RoomNotFound)?;
    let removed = state.store.clear_shapes(room).await?;
    info!(%user_id, %room_id, removed, "history: shapes cleared");
    Ok(Json(ClearResponse { success: true }))
}

/// Shape JSON enriched with its row metadata. Rows that predate `shapeId` get
/// a stable `db-{id}` key. Rows that are not JSON objects are skipped.
fn shape_entry(record: &ShapeRecord) -> Option<Value> {
    let mut map: Map<String, Value> = match serde_json::from_str(&record.shape_data) {
        Ok(Value::Object(map)) => map,
        _ => {
            warn!(row_id = record.id, "history: skipping malformed shape row");
            return None;
        }
    };

    let has_id = map
        .get("shapeId")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !has_id {
        map.insert("shapeId".into(), Value::String(ShapeId::from_row_id(record.id).to_string()));
    }
    map.insert("id".into(), record.id.into());
    map.insert("userId".into(), record.user_id.clone().into());
    map.insert("userName".into(), display_name(record.user_name.as_deref()).into());
    Some(Value::Object(map))
}

fn chat_entry(record: ChatRecord) -> ChatEntry {
    ChatEntry {
        id: record.id,
        user_name: display_name(record.user_name.as_deref()),
        timestamp: record.created_at.format(&Rfc3339).unwrap_or_default(),
        message: record.message,
        user_id: record.user_id,
    }
}

fn display_name(name: Option<&str>) -> String {
    name.filter(|n| !n.is_empty()).unwrap_or(ANONYMOUS).to_owned()
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
