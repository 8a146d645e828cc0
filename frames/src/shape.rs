//! Vector shape model.
//!
//! A [`Shape`] is an immutable drawing primitive identified by its
//! [`ShapeId`]. Shapes are appended to a room's ordered list (insertion order
//! is z-order) and removed only by id or by a room-wide clear; they are never
//! edited in place.
//!
//! On the wire a shape is a flat JSON object: the common fields (`shapeId`,
//! `strokeColor`, `strokeWidth`) sit next to the `type` tag and the per-kind
//! geometry fields. Extra keys are ignored on decode so records enriched by
//! the history endpoint (`id`, `userId`, `userName`) still parse.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_time::{SystemTime, UNIX_EPOCH};

/// Font size used for text shapes that predate the `fontSize` field.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Length of the random suffix in a generated [`ShapeId`].
const SHAPE_ID_SUFFIX_LEN: usize = 9;

/// A point in model (canvas) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Opaque, client-generated shape identifier. The only key used to reconcile
/// deletes across replicas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Mint a fresh id: unix-millis prefix plus a random suffix.
    ///
    /// There is no server-side uniqueness check, so the suffix carries 36 bits
    /// of UUID v4 randomness on top of the millisecond prefix.
    #[must_use]
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        let random = uuid::Uuid::new_v4().simple().to_string();
        let suffix = &random[..SHAPE_ID_SUFFIX_LEN];
        Self(format!("{millis}-{suffix}"))
    }

    /// Stable id for a persisted record that predates the `shapeId` field.
    #[must_use]
    pub fn from_row_id(row_id: i64) -> Self {
        Self(format!("db-{row_id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Per-kind geometry. The variant name is the wire `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Geometry {
    /// Top-left corner plus extent. Negative extents mean the far corner was
    /// dragged up or left.
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { center_x: f64, center_y: f64, radius: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Arrow { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Rhombus with vertices at the midpoints of the `x/y/width/height` box.
    Diamond { x: f64, y: f64, width: f64, height: f64 },
    /// Freehand polyline.
    Pencil { points: Vec<Point> },
    /// Baseline-anchored text.
    Text {
        x: f64,
        y: f64,
        value: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
    },
    /// Eraser trail. A marker only: never rendered, hit, or persisted.
    Eraser { points: Vec<Point> },
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

impl Geometry {
    /// Wire tag for this geometry kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
            Self::Line { .. } => "line",
            Self::Arrow { .. } => "arrow",
            Self::Diamond { .. } => "diamond",
            Self::Pencil { .. } => "pencil",
            Self::Text { .. } => "text",
            Self::Eraser { .. } => "eraser",
        }
    }
}

/// A vector drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "shapeId")]
    pub shape_id: ShapeId,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(rename = "strokeColor", default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(rename = "strokeWidth", default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl Shape {
    /// Build a shape with a freshly minted id.
    #[must_use]
    pub fn new(geometry: Geometry, stroke_color: Option<String>, stroke_width: Option<f64>) -> Self {
        Self { shape_id: ShapeId::generate(), geometry, stroke_color, stroke_width }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.geometry.kind()
    }

    /// Whether this is an eraser marker rather than real geometry.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        matches!(self.geometry, Geometry::Eraser { .. })
    }

    /// Decode a persisted record, filling in `shapeId` from `fallback` when the
    /// record predates the field.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not an object or its geometry does
    /// not match any shape kind.
    pub fn from_record(mut record: Value, fallback: impl FnOnce() -> ShapeId) -> Result<Self, serde_json::Error> {
        if let Value::Object(map) = &mut record {
            let has_id = map
                .get("shapeId")
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty());
            if !has_id {
                map.insert("shapeId".into(), Value::String(fallback().0));
            }
        }
        serde_json::from_value(record)
    }
}

/// Extract the embedded shape payload from a legacy chat message of the form
/// `{"shape": {...}}`. Plain chat text yields `None`.
#[must_use]
pub fn legacy_shape_payload(message: &str) -> Option<Value> {
    let Ok(Value::Object(mut map)) = serde_json::from_str::<Value>(message) else {
        return None;
    };
    map.remove("shape").filter(Value::is_object)
}
