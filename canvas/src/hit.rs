//! Hit-testing: which shape (if any) lies under a model-space point.
//!
//! All tests are tolerance-based so thin strokes can be picked without
//! pixel-perfect aim. Every function here is pure and deterministic.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use frames::{Geometry, Shape};

use crate::camera::Point;
use crate::consts::{EMPTY_TEXT_CHARS, TEXT_WIDTH_FACTOR};

/// Axis-aligned bounds in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of a box given by one corner and a possibly negative extent.
    #[must_use]
    pub fn from_extent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { min_x: x.min(x + width), min_y: y.min(y + height), max_x: x.max(x + width), max_y: y.max(y + height) }
    }

    /// Whether `pt` lies inside the bounds grown by `tolerance` on each side.
    #[must_use]
    pub fn contains(&self, pt: Point, tolerance: f64) -> bool {
        pt.x >= self.min_x - tolerance
            && pt.x <= self.max_x + tolerance
            && pt.y >= self.min_y - tolerance
            && pt.y <= self.max_y + tolerance
    }
}

/// Index of the topmost shape containing `pt`, scanning newest to oldest.
#[must_use]
pub fn find_topmost_shape_at(shapes: &[Shape], pt: Point, tolerance: f64) -> Option<usize> {
    shapes.iter().rposition(|shape| point_in_shape(shape, pt, tolerance))
}

/// Whether `pt` hits `shape` within `tolerance`.
#[must_use]
pub fn point_in_shape(shape: &Shape, pt: Point, tolerance: f64) -> bool {
    match &shape.geometry {
        Geometry::Rect { x, y, width, height } => Bounds::from_extent(*x, *y, *width, *height).contains(pt, tolerance),
        Geometry::Diamond { x, y, width, height } => point_in_diamond(*x, *y, *width, *height, pt, tolerance),
        Geometry::Circle { center_x, center_y, radius } => {
            let dx = pt.x - center_x;
            let dy = pt.y - center_y;
            dx.hypot(dy) <= radius.abs() + tolerance
        }
        Geometry::Line { x1, y1, x2, y2 } | Geometry::Arrow { x1, y1, x2, y2 } => {
            point_to_segment_distance(pt, Point::new(*x1, *y1), Point::new(*x2, *y2)) <= tolerance
        }
        Geometry::Pencil { points } => point_near_polyline(points, pt, tolerance),
        Geometry::Text { x, y, value, font_size } => text_bounds(*x, *y, value, *font_size).contains(pt, tolerance),
        Geometry::Eraser { .. } => false,
    }
}

/// Taxicab test against the diamond's center: normalized `|dx| + |dy| <= 1`,
/// with the tolerance added to both half-extents.
fn point_in_diamond(x: f64, y: f64, width: f64, height: f64, pt: Point, tolerance: f64) -> bool {
    let cx = x + width / 2.0;
    let cy = y + height / 2.0;
    let half_w = width.abs() / 2.0 + tolerance;
    let half_h = height.abs() / 2.0 + tolerance;
    if half_w <= 0.0 || half_h <= 0.0 {
        return false;
    }
    (pt.x - cx).abs() / half_w + (pt.y - cy).abs() / half_h <= 1.0
}

fn point_near_polyline(points: &[Point], pt: Point, tolerance: f64) -> bool {
    match points {
        [] => false,
        [only] => point_to_segment_distance(pt, *only, *only) <= tolerance,
        _ => points
            .windows(2)
            .any(|seg| point_to_segment_distance(pt, seg[0], seg[1]) <= tolerance),
    }
}

/// Estimated box of a baseline-anchored text run.
///
/// Width is `chars * font_size * TEXT_WIDTH_FACTOR`; the box extends one
/// `font_size` above the baseline. This is a heuristic, not glyph metrics.
#[must_use]
pub fn text_bounds(x: f64, y: f64, value: &str, font_size: f64) -> Bounds {
    let chars = match value.chars().count() {
        0 => EMPTY_TEXT_CHARS,
        n => n,
    };
    #[allow(clippy::cast_precision_loss)]
    let width = chars as f64 * font_size * TEXT_WIDTH_FACTOR;
    Bounds { min_x: x, min_y: y - font_size, max_x: x + width, max_y: y }
}

/// Shortest distance from `p` to the segment `a`–`b`.
///
/// Projects `p` onto the segment's line, clamps the parameter to `[0, 1]`, and
/// measures to the clamped point. A zero-length segment measures to `a`.
#[must_use]
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let nearest_x = a.x + t * dx;
    let nearest_y = a.y + t * dy;
    (p.x - nearest_x).hypot(p.y - nearest_y)
}
