use crate::state::test_helpers::MemoryStore;

use super::*;

#[test]
fn numeric_key_yields_slug_then_id() {
    assert_eq!(RoomRef::candidates("42"), vec![RoomRef::Slug("42".into()), RoomRef::NumericId(42)]);
}

#[test]
fn non_numeric_key_is_slug_only() {
    assert_eq!(RoomRef::candidates("design-review"), vec![RoomRef::Slug("design-review".into())]);
}

#[tokio::test]
async fn resolves_by_slug() {
    let store = MemoryStore::default();
    store.add_room(7, "design-review");
    assert_eq!(resolve_room(&store, "design-review").await.unwrap(), Some(7));
}

#[tokio::test]
async fn falls_back_to_numeric_id() {
    let store = MemoryStore::default();
    store.add_room(7, "design-review");
    assert_eq!(resolve_room(&store, "7").await.unwrap(), Some(7));
}

#[tokio::test]
async fn numeric_looking_slug_wins_over_id() {
    let store = MemoryStore::default();
    store.add_room(1, "2");
    store.add_room(2, "two");
    assert_eq!(resolve_room(&store, "2").await.unwrap(), Some(1));
}

#[tokio::test]
async fn unknown_room_is_none() {
    let store = MemoryStore::default();
    store.add_room(7, "design-review");
    assert_eq!(resolve_room(&store, "nope").await.unwrap(), None);
    assert_eq!(resolve_room(&store, "99").await.unwrap(), None);
}
