//! Input model: tools, theme, session drawing settings, and the gesture state
//! machine.
//!
//! `Tool` and `UiState` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture tracked between pointer-down and
//! pointer-up (or between a text click and the host's text submission).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::str::FromStr;

use crate::camera::Point;
use crate::consts::{DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pick the topmost shape under the pointer (default).
    #[default]
    Select,
    Rect,
    Circle,
    Line,
    Arrow,
    Diamond,
    /// Freehand polyline.
    Pencil,
    /// Click to place a text run.
    Text,
    /// Remove the topmost shape under the pointer while dragging.
    Eraser,
}

impl Tool {
    /// Whether a drag with this tool produces a shape on release.
    #[must_use]
    pub fn draws_on_drag(self) -> bool {
        matches!(self, Self::Rect | Self::Circle | Self::Line | Self::Arrow | Self::Diamond | Self::Pencil)
    }

    /// Tool name as used by the host toolbar.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Diamond => "diamond",
            Self::Pencil => "pencil",
            Self::Text => "text",
            Self::Eraser => "eraser",
        }
    }
}

/// Returned by [`Tool::from_str`] for an unrecognized tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "select" => Self::Select,
            "rect" => Self::Rect,
            "circle" => Self::Circle,
            "line" => Self::Line,
            "arrow" => Self::Arrow,
            "diamond" => Self::Diamond,
            "pencil" => Self::Pencil,
            "text" => Self::Text,
            "eraser" => Self::Eraser,
            other => return Err(UnknownTool(other.to_owned())),
        })
    }
}

/// Color scheme. Controls the background fill and the default stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub fn background(self) -> &'static str {
        match self {
            Self::Dark => "rgb(0, 0, 0)",
            Self::Light => "rgb(243, 244, 246)",
        }
    }

    /// Stroke color that contrasts with [`Theme::background`].
    #[must_use]
    pub fn default_stroke(self) -> &'static str {
        match self {
            Self::Dark => "#ffffff",
            Self::Light => "#1e1e1e",
        }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Tool,
    /// Stroke color applied to new shapes and to shapes without their own.
    pub stroke_color: String,
    /// Stroke width in model units.
    pub stroke_width: f64,
    pub font_size: f64,
    pub theme: Theme,
    /// Index of the shape picked by the select tool. Informational only; no
    /// operation acts on it.
    pub selected: Option<usize>,
}

impl Default for UiState {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            tool: Tool::default(),
            stroke_color: theme.default_stroke().to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            theme,
            selected: None,
        }
    }
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A drag started with a drawing tool or the eraser.
    Dragging {
        /// Model-space pointer position at pointer-down.
        start: Point,
        /// Model-space pointer position at the latest move.
        current: Point,
        /// Accumulated path for the pencil tool; empty for other tools.
        points: Vec<Point>,
    },
    /// The text tool was clicked; waiting for the host to submit or cancel.
    AwaitingTextInput {
        /// Model-space baseline anchor for the text.
        at: Point,
    },
}
