use super::*;
use crate::shape::Geometry;
use serde_json::json;

#[test]
fn join_room_accepts_string_or_numeric_room_id() {
    let a: ClientMessage = serde_json::from_value(json!({"type": "join_room", "roomId": "demo"})).expect("string");
    let b: ClientMessage = serde_json::from_value(json!({"type": "join_room", "roomId": 42})).expect("number");
    assert_eq!(a, ClientMessage::JoinRoom { room_id: "demo".into() });
    assert_eq!(b, ClientMessage::JoinRoom { room_id: "42".into() });
}

#[test]
fn shape_message_carries_shape_data() {
    let msg: ClientMessage = serde_json::from_value(json!({
        "type": "shape",
        "roomId": "demo",
        "shapeData": {"shapeId": "s1", "type": "circle", "centerX": 1, "centerY": 2, "radius": 3}
    }))
    .expect("decode");
    let ClientMessage::Shape { room_id, shape_data } = msg else {
        panic!("expected shape");
    };
    assert_eq!(room_id, "demo");
    assert_eq!(shape_data.shape_id.as_str(), "s1");
}

#[test]
fn client_message_reports_kind_and_room() {
    let msg = ClientMessage::Zoom { room_id: "r".into(), zoom_level: 1.5 };
    assert_eq!(msg.kind(), "zoom");
    assert_eq!(msg.room_id(), "r");
    let value = serde_json::to_value(&msg).expect("encode");
    assert_eq!(value, json!({"type": "zoom", "roomId": "r", "zoomLevel": 1.5}));
}

#[test]
fn erase_shape_uses_camel_case_shape_id() {
    let msg: ClientMessage =
        serde_json::from_value(json!({"type": "erase_shape", "roomId": "r", "shapeId": "abc"})).expect("decode");
    assert_eq!(msg, ClientMessage::EraseShape { room_id: "r".into(), shape_id: "abc".into() });
}

#[test]
fn active_users_serializes_presence_list() {
    let msg = ServerMessage::ActiveUsers {
        room_id: "demo".into(),
        users: vec![UserPresence { user_id: "u1".into(), user_name: "Ann".into() }],
    };
    let value = serde_json::to_value(&msg).expect("encode");
    assert_eq!(
        value,
        json!({"type": "active_users", "roomId": "demo", "users": [{"userId": "u1", "userName": "Ann"}]})
    );
}

#[test]
fn server_shape_round_trips_through_text() {
    let msg = ServerMessage::Shape {
        room_id: "demo".into(),
        shape_data: Shape {
            shape_id: "s".into(),
            geometry: Geometry::Line { x1: 0.0, y1: 0.0, x2: 3.0, y2: 4.0 },
            stroke_color: None,
            stroke_width: Some(2.0),
        },
        user_id: "u".into(),
        user_name: "Anonymous".into(),
    };
    let text = serde_json::to_string(&msg).expect("encode");
    let back: ServerMessage = serde_json::from_str(&text).expect("decode");
    assert_eq!(back, msg);
}

#[test]
fn legacy_chat_without_sender_fields_still_decodes() {
    let msg: ServerMessage =
        serde_json::from_value(json!({"type": "chat", "roomId": "1", "message": "hi"})).expect("decode");
    let ServerMessage::Chat { user_id, timestamp, .. } = msg else {
        panic!("expected chat");
    };
    assert!(user_id.is_empty());
    assert!(timestamp.is_empty());
}
