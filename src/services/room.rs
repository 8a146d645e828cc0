//! Room addressing.
//!
//! Clients name a room by slug or by numeric id, interchangeably. Resolution
//! always tries the slug first so a slug that happens to look numeric still
//! wins, then falls back to parsing the key as an id.

use crate::services::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomRef {
    Slug(String),
    NumericId(i64),
}

impl RoomRef {
    /// Lookups to attempt for a raw room key, in priority order.
    #[must_use]
    pub fn candidates(raw: &str) -> Vec<RoomRef> {
        let mut refs = vec![RoomRef::Slug(raw.to_owned())];
        if let Ok(id) = raw.trim().parse::<i64>() {
            refs.push(RoomRef::NumericId(id));
        }
        refs
    }
}

/// Resolve a client-supplied room key to the persisted room id.
///
/// # Errors
///
/// Returns [`StoreError`] if a lookup fails. An unknown room is `Ok(None)`.
pub async fn resolve_room(store: &dyn Store, raw: &str) -> Result<Option<i64>, StoreError> {
    for candidate in RoomRef::candidates(raw) {
        if let Some(id) = store.find_room(&candidate).await? {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
