use super::*;
use serde_json::json;

#[test]
fn generated_ids_have_time_prefix_and_random_suffix() {
    let id = ShapeId::generate();
    let (millis, suffix) = id.as_str().split_once('-').expect("dash separator");
    assert!(millis.parse::<u128>().is_ok());
    assert_eq!(suffix.len(), SHAPE_ID_SUFFIX_LEN);
}

#[test]
fn generated_ids_do_not_collide_in_a_burst() {
    let ids: std::collections::HashSet<ShapeId> = (0..2000).map(|_| ShapeId::generate()).collect();
    assert_eq!(ids.len(), 2000);
}

#[test]
fn rect_serializes_flat_with_type_tag() {
    let shape = Shape {
        shape_id: "s-1".into(),
        geometry: Geometry::Rect { x: 1.0, y: 2.0, width: -3.0, height: 4.0 },
        stroke_color: Some("#fff".into()),
        stroke_width: None,
    };
    let value = serde_json::to_value(&shape).expect("serialize");
    assert_eq!(
        value,
        json!({"shapeId": "s-1", "type": "rect", "x": 1.0, "y": 2.0, "width": -3.0, "height": 4.0, "strokeColor": "#fff"})
    );
}

#[test]
fn circle_fields_are_camel_case() {
    let shape: Shape = serde_json::from_value(json!({
        "shapeId": "c", "type": "circle", "centerX": 5, "centerY": 6, "radius": 7
    }))
    .expect("decode");
    assert_eq!(shape.geometry, Geometry::Circle { center_x: 5.0, center_y: 6.0, radius: 7.0 });
    assert_eq!(shape.kind(), "circle");
}

#[test]
fn text_without_font_size_uses_default() {
    let shape: Shape = serde_json::from_value(json!({
        "shapeId": "t", "type": "text", "x": 0, "y": 0, "value": "hi"
    }))
    .expect("decode");
    let Geometry::Text { font_size, .. } = shape.geometry else {
        panic!("expected text");
    };
    assert!((font_size - DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
}

#[test]
fn extra_keys_from_history_are_ignored() {
    let shape: Shape = serde_json::from_value(json!({
        "shapeId": "p", "type": "pencil", "points": [{"x": 1, "y": 2}],
        "bgColor": "#000", "id": 9, "userId": "u1", "userName": "Ann"
    }))
    .expect("decode");
    assert_eq!(shape.geometry, Geometry::Pencil { points: vec![Point::new(1.0, 2.0)] });
}

#[test]
fn from_record_synthesizes_missing_id() {
    let record = json!({"type": "line", "x1": 0, "y1": 0, "x2": 1, "y2": 1});
    let shape = Shape::from_record(record, || ShapeId::from_row_id(42)).expect("decode");
    assert_eq!(shape.shape_id.as_str(), "db-42");
}

#[test]
fn from_record_keeps_existing_id() {
    let record = json!({"shapeId": "keep", "type": "line", "x1": 0, "y1": 0, "x2": 1, "y2": 1});
    let shape = Shape::from_record(record, || ShapeId::from("unused")).expect("decode");
    assert_eq!(shape.shape_id.as_str(), "keep");
}

#[test]
fn from_record_rejects_unknown_kind() {
    let record = json!({"shapeId": "x", "type": "hexagon"});
    assert!(Shape::from_record(record, || ShapeId::from("x")).is_err());
}

#[test]
fn eraser_is_a_marker() {
    let shape = Shape::new(Geometry::Eraser { points: vec![] }, None, None);
    assert!(shape.is_marker());
    assert!(!Shape::new(Geometry::Pencil { points: vec![] }, None, None).is_marker());
}

#[test]
fn legacy_payload_extracts_embedded_shape() {
    let message = r#"{"shape":{"type":"rect","x":0,"y":0,"width":1,"height":1}}"#;
    let payload = legacy_shape_payload(message).expect("payload");
    assert_eq!(payload["type"], "rect");
}

#[test]
fn legacy_payload_ignores_plain_chat() {
    assert!(legacy_shape_payload("hello there").is_none());
    assert!(legacy_shape_payload(r#"{"text":"hi"}"#).is_none());
    assert!(legacy_shape_payload(r#"{"shape":"nope"}"#).is_none());
}
