//! Shared numeric constants for the canvas crate.

use std::f64::consts::PI;

// ── Hit-testing ─────────────────────────────────────────────────

/// Default hit slop in model-space units for selection and erasing.
pub const HIT_TOLERANCE: f64 = 10.0;

/// Estimated glyph advance as a fraction of the font size.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Character count assumed for a text shape with an empty value.
pub const EMPTY_TEXT_CHARS: usize = 5;

// ── Rendering ───────────────────────────────────────────────────

/// Arrowhead stroke length in model units.
pub const ARROW_HEAD_LEN: f64 = 15.0;

/// Arrowhead half-angle (30°).
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// Eraser cursor ring radius in screen pixels.
pub const ERASER_RADIUS_PX: f64 = 10.0;

/// Eraser cursor ring line width in screen pixels.
pub const ERASER_LINE_PX: f64 = 2.0;

pub const ERASER_COLOR: &str = "#ff6b6b";

// ── Session defaults ────────────────────────────────────────────

pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

pub use frames::shape::DEFAULT_FONT_SIZE;

// ── Zoom ────────────────────────────────────────────────────────

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
