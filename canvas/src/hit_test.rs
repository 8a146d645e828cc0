#![allow(clippy::float_cmp)]

use frames::{Geometry, Shape};

use super::*;
use crate::consts::HIT_TOLERANCE;

fn shape(geometry: Geometry) -> Shape {
    Shape::new(geometry, None, None)
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Shape {
    shape(Geometry::Rect { x, y, width, height })
}

fn circle(center_x: f64, center_y: f64, radius: f64) -> Shape {
    shape(Geometry::Circle { center_x, center_y, radius })
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// find_topmost_shape_at
// =============================================================

#[test]
fn empty_list_hits_nothing() {
    assert_eq!(find_topmost_shape_at(&[], pt(0.0, 0.0), HIT_TOLERANCE), None);
}

#[test]
fn circle_drawn_after_rect_wins_on_overlap() {
    let shapes = vec![rect(0.0, 0.0, 100.0, 100.0), circle(50.0, 50.0, 10.0)];
    assert_eq!(find_topmost_shape_at(&shapes, pt(50.0, 50.0), HIT_TOLERANCE), Some(1));
}

#[test]
fn falls_through_to_older_shape_outside_newer_one() {
    let shapes = vec![rect(0.0, 0.0, 100.0, 100.0), circle(50.0, 50.0, 10.0)];
    assert_eq!(find_topmost_shape_at(&shapes, pt(90.0, 90.0), HIT_TOLERANCE), Some(0));
}

#[test]
fn miss_far_from_everything() {
    let shapes = vec![rect(0.0, 0.0, 100.0, 100.0), circle(50.0, 50.0, 10.0)];
    assert_eq!(find_topmost_shape_at(&shapes, pt(200.0, 200.0), HIT_TOLERANCE), None);
}

// =============================================================
// Rect / diamond
// =============================================================

#[test]
fn rect_includes_tolerance_band() {
    let r = rect(0.0, 0.0, 100.0, 50.0);
    assert!(point_in_shape(&r, pt(-9.0, 25.0), HIT_TOLERANCE));
    assert!(point_in_shape(&r, pt(110.0, 60.0), HIT_TOLERANCE));
    assert!(!point_in_shape(&r, pt(111.0, 25.0), HIT_TOLERANCE));
}

#[test]
fn rect_with_negative_extent_is_normalized() {
    let r = rect(100.0, 100.0, -50.0, -50.0);
    assert!(point_in_shape(&r, pt(75.0, 75.0), 0.0));
    assert!(!point_in_shape(&r, pt(120.0, 120.0), 0.0));
}

#[test]
fn diamond_center_hits_and_corner_misses() {
    let d = shape(Geometry::Diamond { x: 0.0, y: 0.0, width: 100.0, height: 100.0 });
    assert!(point_in_shape(&d, pt(50.0, 50.0), HIT_TOLERANCE));
    // Bounding-box corner lies outside the rhombus.
    assert!(!point_in_shape(&d, pt(2.0, 2.0), HIT_TOLERANCE));
    // Vertex plus tolerance still hits.
    assert!(point_in_shape(&d, pt(50.0, -9.0), HIT_TOLERANCE));
}

#[test]
fn degenerate_diamond_without_tolerance_never_hits() {
    let d = shape(Geometry::Diamond { x: 10.0, y: 10.0, width: 0.0, height: 0.0 });
    assert!(!point_in_shape(&d, pt(10.0, 10.0), 0.0));
}

// =============================================================
// Circle
// =============================================================

#[test]
fn circle_uses_radius_plus_tolerance() {
    let c = circle(0.0, 0.0, 20.0);
    assert!(point_in_shape(&c, pt(30.0, 0.0), HIT_TOLERANCE));
    assert!(!point_in_shape(&c, pt(30.1, 0.0), HIT_TOLERANCE));
}

#[test]
fn circle_with_negative_radius_uses_magnitude() {
    let c = circle(0.0, 0.0, -20.0);
    assert!(point_in_shape(&c, pt(15.0, 0.0), 0.0));
}

// =============================================================
// Segments
// =============================================================

#[test]
fn segment_distance_perpendicular_and_clamped() {
    let a = pt(0.0, 0.0);
    let b = pt(10.0, 0.0);
    assert_eq!(point_to_segment_distance(pt(5.0, 3.0), a, b), 3.0);
    assert_eq!(point_to_segment_distance(pt(-3.0, 4.0), a, b), 5.0);
    assert_eq!(point_to_segment_distance(pt(13.0, 4.0), a, b), 5.0);
}

#[test]
fn zero_length_segment_measures_to_endpoint() {
    let a = pt(2.0, 2.0);
    assert_eq!(point_to_segment_distance(pt(5.0, 6.0), a, a), 5.0);
}

#[test]
fn line_and_arrow_hit_near_stroke_only() {
    for geometry in [
        Geometry::Line { x1: 0.0, y1: 0.0, x2: 100.0, y2: 100.0 },
        Geometry::Arrow { x1: 0.0, y1: 0.0, x2: 100.0, y2: 100.0 },
    ] {
        let s = shape(geometry);
        assert!(point_in_shape(&s, pt(50.0, 55.0), HIT_TOLERANCE));
        assert!(!point_in_shape(&s, pt(0.0, 100.0), HIT_TOLERANCE));
    }
}

#[test]
fn pencil_hits_any_segment() {
    let p = shape(Geometry::Pencil { points: vec![pt(0.0, 0.0), pt(50.0, 0.0), pt(50.0, 50.0)] });
    assert!(point_in_shape(&p, pt(25.0, 5.0), HIT_TOLERANCE));
    assert!(point_in_shape(&p, pt(55.0, 25.0), HIT_TOLERANCE));
    assert!(!point_in_shape(&p, pt(20.0, 30.0), HIT_TOLERANCE));
}

#[test]
fn single_point_pencil_hits_near_its_dot() {
    let p = shape(Geometry::Pencil { points: vec![pt(10.0, 10.0)] });
    assert!(point_in_shape(&p, pt(14.0, 13.0), HIT_TOLERANCE));
    assert!(!point_in_shape(&p, pt(30.0, 30.0), HIT_TOLERANCE));
}

#[test]
fn empty_pencil_never_hits() {
    let p = shape(Geometry::Pencil { points: vec![] });
    assert!(!point_in_shape(&p, pt(0.0, 0.0), HIT_TOLERANCE));
}

// =============================================================
// Text / eraser
// =============================================================

#[test]
fn text_box_sits_above_baseline() {
    let t = shape(Geometry::Text { x: 100.0, y: 100.0, value: "abcd".into(), font_size: 20.0 });
    // Width estimate: 4 * 20 * 0.6 = 48.
    assert!(point_in_shape(&t, pt(140.0, 90.0), 0.0));
    assert!(!point_in_shape(&t, pt(140.0, 110.0), 0.0));
    assert!(point_in_shape(&t, pt(140.0, 110.0), HIT_TOLERANCE));
    assert!(!point_in_shape(&t, pt(149.0, 90.0), 0.0));
}

#[test]
fn empty_text_assumes_five_characters() {
    let b = text_bounds(0.0, 0.0, "", 10.0);
    assert_eq!(b.max_x, 30.0);
    assert_eq!(b.min_y, -10.0);
}

#[test]
fn eraser_marker_is_never_hit() {
    let e = shape(Geometry::Eraser { points: vec![pt(0.0, 0.0), pt(10.0, 10.0)] });
    assert!(!point_in_shape(&e, pt(5.0, 5.0), HIT_TOLERANCE));
}

// =============================================================
// Wire round-trip
// =============================================================

#[test]
fn hit_results_survive_serialization() {
    let shapes = vec![
        rect(0.0, 0.0, 100.0, 100.0),
        circle(50.0, 50.0, 10.0),
        shape(Geometry::Pencil { points: vec![pt(0.0, 200.0), pt(30.0, 230.0), pt(90.0, 210.0)] }),
        shape(Geometry::Text { x: 300.0, y: 40.0, value: "hello".into(), font_size: 18.0 }),
        shape(Geometry::Diamond { x: 150.0, y: 150.0, width: -40.0, height: 60.0 }),
    ];
    let text = serde_json::to_string(&shapes).expect("encode");
    let received: Vec<Shape> = serde_json::from_str(&text).expect("decode");

    for x in (-20..320).step_by(7) {
        for y in (-20..260).step_by(7) {
            let q = pt(f64::from(x), f64::from(y));
            for (sent, got) in shapes.iter().zip(&received) {
                assert_eq!(point_in_shape(sent, q, HIT_TOLERANCE), point_in_shape(got, q, HIT_TOLERANCE));
            }
            assert_eq!(
                find_topmost_shape_at(&shapes, q, HIT_TOLERANCE),
                find_topmost_shape_at(&received, q, HIT_TOLERANCE)
            );
        }
    }
}
