//! Rendering: draws the full canvas scene to a 2D surface.
//!
//! Every frame is a full redraw: clear, theme background, then each shape in
//! insertion order (bottom first), then the live drag preview and the eraser
//! cursor. The module reads engine state through a [`Scene`] and never
//! mutates it.
//!
//! Drawing goes through the [`Surface`] trait so the scene logic is testable
//! off-browser. The `wasm32` build implements it over
//! `CanvasRenderingContext2d` (see `crate::web`). Fallible surface calls
//! propagate via `Result<(), S::Error>`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use frames::{Geometry, Shape};

use crate::camera::{Camera, Point};
use crate::consts::{ARROW_HEAD_ANGLE, ARROW_HEAD_LEN, ERASER_COLOR, ERASER_LINE_PX, ERASER_RADIUS_PX};
use crate::input::UiState;

/// One step of a stroked path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    /// Full circle as its own subpath.
    Arc { center: Point, radius: f64 },
    Close,
}

/// Minimal 2D drawing surface.
pub trait Surface {
    type Error;

    /// Clear `width × height` pixels at the origin of the current transform.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) -> Result<(), Self::Error>;
    fn save(&mut self) -> Result<(), Self::Error>;
    fn restore(&mut self) -> Result<(), Self::Error>;
    /// Uniform scale applied to subsequent calls.
    fn scale(&mut self, factor: f64) -> Result<(), Self::Error>;
    fn set_stroke(&mut self, color: &str, width: f64) -> Result<(), Self::Error>;
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), Self::Error>;
    /// Begin a new path, apply `ops`, and stroke it.
    fn stroke_path(&mut self, ops: &[PathOp]) -> Result<(), Self::Error>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) -> Result<(), Self::Error>;
}

/// Read-only view of engine state for one frame.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub shapes: &'a [Shape],
    pub camera: Camera,
    pub ui: &'a UiState,
    /// Shape being dragged out, drawn with the session stroke.
    pub preview: Option<Geometry>,
    /// Model-space eraser cursor position.
    pub eraser_cursor: Option<Point>,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns the first error reported by the surface.
pub fn draw<S: Surface>(surface: &mut S, scene: &Scene<'_>) -> Result<(), S::Error> {
    let zoom = scene.camera.zoom;

    // Layer 1: clear and background, in screen space.
    surface.clear(scene.viewport_width, scene.viewport_height)?;
    surface.fill_rect(0.0, 0.0, scene.viewport_width, scene.viewport_height, scene.ui.theme.background())?;

    surface.save()?;
    surface.scale(zoom)?;

    // Layer 2: shapes, bottom first.
    for shape in scene.shapes {
        let color = shape.stroke_color.as_deref().unwrap_or(&scene.ui.stroke_color);
        let width = shape.stroke_width.unwrap_or(scene.ui.stroke_width);
        draw_geometry(surface, &shape.geometry, color, width / zoom)?;
    }

    // Layer 3: live preview.
    if let Some(geometry) = &scene.preview {
        draw_geometry(surface, geometry, &scene.ui.stroke_color, scene.ui.stroke_width / zoom)?;
    }

    // Layer 4: eraser cursor, constant size on screen.
    if let Some(center) = scene.eraser_cursor {
        surface.set_stroke(ERASER_COLOR, ERASER_LINE_PX / zoom)?;
        surface.stroke_path(&[PathOp::Arc { center, radius: ERASER_RADIUS_PX / zoom }])?;
    }

    surface.restore()
}

// =============================================================
// Geometry dispatch
// =============================================================

fn draw_geometry<S: Surface>(surface: &mut S, geometry: &Geometry, color: &str, line_width: f64) -> Result<(), S::Error> {
    if matches!(geometry, Geometry::Eraser { .. }) {
        return Ok(());
    }

    surface.save()?;
    surface.set_stroke(color, line_width)?;

    match geometry {
        Geometry::Rect { x, y, width, height } => surface.stroke_rect(*x, *y, *width, *height)?,
        Geometry::Circle { center_x, center_y, radius } => {
            surface.stroke_path(&[PathOp::Arc { center: Point::new(*center_x, *center_y), radius: radius.abs() }])?;
        }
        Geometry::Line { x1, y1, x2, y2 } => {
            surface.stroke_path(&[PathOp::MoveTo(Point::new(*x1, *y1)), PathOp::LineTo(Point::new(*x2, *y2))])?;
        }
        Geometry::Arrow { x1, y1, x2, y2 } => {
            surface.stroke_path(&arrow_path(Point::new(*x1, *y1), Point::new(*x2, *y2)))?;
        }
        Geometry::Diamond { x, y, width, height } => surface.stroke_path(&diamond_path(*x, *y, *width, *height))?,
        Geometry::Pencil { points } => {
            if let Some((first, rest)) = points.split_first() {
                let mut ops = Vec::with_capacity(points.len());
                ops.push(PathOp::MoveTo(*first));
                ops.extend(rest.iter().copied().map(PathOp::LineTo));
                surface.stroke_path(&ops)?;
            }
        }
        Geometry::Text { x, y, value, font_size } => {
            surface.fill_text(value, *x, *y, &font(*font_size), color)?;
        }
        Geometry::Eraser { .. } => {}
    }

    surface.restore()
}

// =============================================================
// Paths
// =============================================================

/// Shaft plus two head strokes at ±`ARROW_HEAD_ANGLE` from the shaft, each
/// `ARROW_HEAD_LEN` long, meeting at the tip.
pub(crate) fn arrow_path(tail: Point, tip: Point) -> Vec<PathOp> {
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    let head = |offset: f64| {
        Point::new(
            tip.x - ARROW_HEAD_LEN * (angle + offset).cos(),
            tip.y - ARROW_HEAD_LEN * (angle + offset).sin(),
        )
    };
    vec![
        PathOp::MoveTo(tail),
        PathOp::LineTo(tip),
        PathOp::MoveTo(tip),
        PathOp::LineTo(head(-ARROW_HEAD_ANGLE)),
        PathOp::MoveTo(tip),
        PathOp::LineTo(head(ARROW_HEAD_ANGLE)),
    ]
}

/// Rhombus through the edge midpoints of the `x/y/width/height` box.
pub(crate) fn diamond_path(x: f64, y: f64, width: f64, height: f64) -> Vec<PathOp> {
    vec![
        PathOp::MoveTo(Point::new(x + width / 2.0, y)),
        PathOp::LineTo(Point::new(x + width, y + height / 2.0)),
        PathOp::LineTo(Point::new(x + width / 2.0, y + height)),
        PathOp::LineTo(Point::new(x, y + height / 2.0)),
        PathOp::Close,
    ]
}

fn font(size: f64) -> String {
    format!("{size}px sans-serif")
}
