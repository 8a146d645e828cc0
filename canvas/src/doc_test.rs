use frames::{Geometry, Point, Shape, ShapeId};

use super::*;

fn rect_with_id(id: &str) -> Shape {
    Shape {
        shape_id: ShapeId::from(id),
        geometry: Geometry::Rect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 },
        stroke_color: None,
        stroke_width: None,
    }
}

fn ids(list: &ShapeList) -> Vec<&str> {
    list.iter().map(|s| s.shape_id.as_str()).collect()
}

#[test]
fn push_appends_in_order() {
    let mut list = ShapeList::new();
    assert!(list.push(rect_with_id("a")));
    assert!(list.push(rect_with_id("b")));
    assert_eq!(ids(&list), vec!["a", "b"]);
    assert_eq!(list.len(), 2);
}

#[test]
fn push_rejects_duplicate_id() {
    let mut list = ShapeList::new();
    assert!(list.push(rect_with_id("a")));
    assert!(!list.push(rect_with_id("a")));
    assert_eq!(list.len(), 1);
}

#[test]
fn push_rejects_eraser_marker() {
    let mut list = ShapeList::new();
    let marker = Shape::new(Geometry::Eraser { points: vec![Point::new(0.0, 0.0)] }, None, None);
    assert!(!list.push(marker));
    assert!(list.is_empty());
}

#[test]
fn remove_by_id_keeps_remaining_order() {
    let mut list = ShapeList::new();
    for id in ["a", "b", "c"] {
        list.push(rect_with_id(id));
    }
    let removed = list.remove_by_id(&ShapeId::from("b")).expect("present");
    assert_eq!(removed.shape_id.as_str(), "b");
    assert_eq!(ids(&list), vec!["a", "c"]);
}

#[test]
fn remove_by_unknown_id_is_none() {
    let mut list = ShapeList::new();
    list.push(rect_with_id("a"));
    assert!(list.remove_by_id(&ShapeId::from("zzz")).is_none());
    assert_eq!(list.len(), 1);
}

#[test]
fn remove_at_out_of_range_is_none() {
    let mut list = ShapeList::new();
    list.push(rect_with_id("a"));
    assert!(list.remove_at(1).is_none());
    assert_eq!(list.remove_at(0).map(|s| s.shape_id), Some(ShapeId::from("a")));
    assert!(list.is_empty());
}

#[test]
fn load_replaces_contents_and_dedups() {
    let mut list = ShapeList::new();
    list.push(rect_with_id("old"));
    list.load(vec![rect_with_id("x"), rect_with_id("y"), rect_with_id("x")]);
    assert_eq!(ids(&list), vec!["x", "y"]);
}

#[test]
fn clear_empties() {
    let mut list = ShapeList::new();
    list.push(rect_with_id("a"));
    list.clear();
    assert!(list.is_empty());
    assert!(!list.contains(&ShapeId::from("a")));
}
