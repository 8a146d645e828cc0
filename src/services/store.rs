//! Durable storage for rooms, shapes and chat.
//!
//! ARCHITECTURE
//! ============
//! Handlers talk to `dyn Store` so the relay and history routes can be tested
//! against an in-memory fake. `PgStore` is the production implementation over
//! SQLx/Postgres. Shape payloads are stored as the client's JSON text and are
//! only interpreted on the way back out.

use sqlx::PgPool;
use time::OffsetDateTime;

use crate::services::room::RoomRef;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A persisted shape row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRecord {
    pub id: i64,
    pub user_id: String,
    pub user_name: Option<String>,
    pub shape_data: String,
}

/// A persisted chat row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub id: i64,
    pub user_id: String,
    pub user_name: Option<String>,
    pub message: String,
    pub created_at: OffsetDateTime,
}

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Numeric id of the room `room` names, if it exists.
    async fn find_room(&self, room: &RoomRef) -> Result<Option<i64>, StoreError>;

    /// Display name on the user record.
    async fn user_name(&self, user_id: &str) -> Result<Option<String>, StoreError>;

    async fn save_shape(&self, room_id: i64, user_id: &str, shape_json: &str) -> Result<(), StoreError>;

    async fn save_chat(&self, room_id: i64, user_id: &str, message: &str) -> Result<(), StoreError>;

    /// All shapes in the room, oldest first.
    async fn list_shapes(&self, room_id: i64) -> Result<Vec<ShapeRecord>, StoreError>;

    /// The latest `limit` chat rows, returned oldest first.
    async fn list_chats(&self, room_id: i64, limit: i64) -> Result<Vec<ChatRecord>, StoreError>;

    /// Delete every shape in the room. Returns the number removed.
    async fn clear_shapes(&self, room_id: i64) -> Result<u64, StoreError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn find_room(&self, room: &RoomRef) -> Result<Option<i64>, StoreError> {
        let row = match room {
            RoomRef::Slug(slug) => {
                sqlx::query_scalar::<_, i64>("SELECT id FROM rooms WHERE slug = $1")
                    .bind(slug)
                    .fetch_optional(&self.pool)
                    .await?
            }
            RoomRef::NumericId(id) => {
                sqlx::query_scalar::<_, i64>("SELECT id FROM rooms WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(row)
    }

    async fn user_name(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name.filter(|n| !n.is_empty()))
    }

    async fn save_shape(&self, room_id: i64, user_id: &str, shape_json: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO shapes (room_id, user_id, shape_data) VALUES ($1, $2, $3)")
            .bind(room_id)
            .bind(user_id)
            .bind(shape_json)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_chat(&self, room_id: i64, user_id: &str, message: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO chats (room_id, user_id, message) VALUES ($1, $2, $3)")
            .bind(room_id)
            .bind(user_id)
            .bind(message)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_shapes(&self, room_id: i64) -> Result<Vec<ShapeRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, Option<String>, String)>(
            r"SELECT s.id, s.user_id, u.name, s.shape_data
              FROM shapes s
              LEFT JOIN users u ON u.id = s.user_id
              WHERE s.room_id = $1
              ORDER BY s.created_at ASC, s.id ASC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, user_id, user_name, shape_data)| ShapeRecord { id, user_id, user_name, shape_data })
            .collect())
    }

    async fn list_chats(&self, room_id: i64, limit: i64) -> Result<Vec<ChatRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, Option<String>, String, OffsetDateTime)>(
            r"SELECT id, user_id, name, message, created_at FROM (
                  SELECT c.id, c.user_id, u.name, c.message, c.created_at
                  FROM chats c
                  LEFT JOIN users u ON u.id = c.user_id
                  WHERE c.room_id = $1
                  ORDER BY c.created_at DESC, c.id DESC
                  LIMIT $2
              ) latest
              ORDER BY created_at ASC, id ASC",
        )
        .bind(room_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, user_id, user_name, message, created_at)| ChatRecord {
                id,
                user_id,
                user_name,
                message,
                created_at,
            })
            .collect())
    }

    async fn clear_shapes(&self, room_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM shapes WHERE room_id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
