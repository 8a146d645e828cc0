//! Drawing engine: turns pointer gestures into shapes and applies room
//! broadcasts to the local shape list.
//!
//! `EngineCore` holds all state that does not depend on a browser canvas, so
//! it is fully testable on the host. Every operation returns a list of
//! [`Action`]s; the host forwards `Action::Send` payloads over its websocket
//! and schedules a redraw on `Action::RenderNeeded`.
//!
//! Local edits are applied before they are sent (optimistic); remote edits are
//! applied as they arrive. Shape ids are the only reconciliation key, so a
//! shape that comes back from the network twice is stored once.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use frames::shape::legacy_shape_payload;
use frames::{ClientMessage, Geometry, ServerMessage, Shape, ShapeId};

use crate::camera::{Camera, Point};
use crate::consts::HIT_TOLERANCE;
use crate::doc::ShapeList;
use crate::hit;
use crate::input::{InputState, Theme, Tool, UiState};
use crate::render::Scene;

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Transmit this message on the room connection.
    Send(ClientMessage),
    /// The text tool was clicked; the host should open a text prompt at this
    /// screen position and answer with `submit_text` or `cancel_text`.
    RequestTextInput { screen: Point },
    /// The select tool picked a shape index, or nothing.
    SelectionChanged(Option<usize>),
    /// The zoom level changed, locally or by a remote member.
    ZoomChanged(f64),
    RenderNeeded,
}

/// Core engine state: everything except the browser canvas element.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub doc: ShapeList,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    /// Room this canvas is bound to. Broadcasts for other rooms are ignored.
    pub room_id: String,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Last model-space pointer position over the canvas.
    pointer: Option<Point>,
}

impl EngineCore {
    #[must_use]
    pub fn new(room_id: impl Into<String>) -> Self {
        Self { room_id: room_id.into(), ..Self::default() }
    }

    // --- Pointer input ---

    /// Begin a gesture at a screen-space point.
    pub fn on_pointer_down(&mut self, screen: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        self.pointer = Some(world);

        match self.ui.tool {
            Tool::Select => {
                let picked = hit::find_topmost_shape_at(self.doc.as_slice(), world, HIT_TOLERANCE);
                self.ui.selected = picked;
                vec![Action::SelectionChanged(picked), Action::RenderNeeded]
            }
            Tool::Text => {
                self.input = InputState::AwaitingTextInput { at: world };
                vec![Action::RequestTextInput { screen }]
            }
            Tool::Eraser => {
                self.input = InputState::Dragging { start: world, current: world, points: Vec::new() };
                let mut actions: Vec<Action> = self.erase_at(world).into_iter().collect();
                actions.push(Action::RenderNeeded);
                actions
            }
            tool => {
                let points = if tool == Tool::Pencil { vec![world] } else { Vec::new() };
                self.input = InputState::Dragging { start: world, current: world, points };
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Track the pointer. Updates the live preview while dragging and erases
    /// continuously with the eraser tool.
    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        self.pointer = Some(world);

        let InputState::Dragging { current, points, .. } = &mut self.input else {
            return if self.ui.tool == Tool::Eraser { vec![Action::RenderNeeded] } else { Vec::new() };
        };
        *current = world;
        if self.ui.tool == Tool::Pencil {
            points.push(world);
        }

        let mut actions = Vec::new();
        if self.ui.tool == Tool::Eraser {
            actions.extend(self.erase_at(world));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Finish a drag. Drawing tools append the finished shape and send it.
    pub fn on_pointer_up(&mut self, screen: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        self.pointer = Some(world);

        match std::mem::take(&mut self.input) {
            InputState::Dragging { start, mut points, .. } => {
                if self.ui.tool == Tool::Pencil && points.last() != Some(&world) {
                    points.push(world);
                }
                match drag_geometry(self.ui.tool, start, world, points) {
                    Some(geometry) => self.commit(geometry),
                    None => vec![Action::RenderNeeded],
                }
            }
            other => {
                // A text click stays pending until the host answers.
                self.input = other;
                Vec::new()
            }
        }
    }

    /// The pointer left the canvas; hides the eraser cursor.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.pointer = None;
        if self.ui.tool == Tool::Eraser { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Text ---

    /// Complete a pending text placement. Whitespace-only text is discarded.
    pub fn submit_text(&mut self, value: &str) -> Vec<Action> {
        let InputState::AwaitingTextInput { at } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        if value.trim().is_empty() {
            return Vec::new();
        }
        self.commit(Geometry::Text { x: at.x, y: at.y, value: value.to_owned(), font_size: self.ui.font_size })
    }

    /// Abandon a pending text placement.
    pub fn cancel_text(&mut self) {
        if matches!(self.input, InputState::AwaitingTextInput { .. }) {
            self.input = InputState::Idle;
        }
    }

    // --- Local edits ---

    /// Remove the topmost shape under a model-space point. `None` when nothing
    /// was hit; nothing is sent in that case.
    pub fn erase_at(&mut self, world: Point) -> Option<Action> {
        let index = hit::find_topmost_shape_at(self.doc.as_slice(), world, HIT_TOLERANCE)?;
        let removed = self.doc.remove_at(index)?;
        self.forget_index(index);
        Some(Action::Send(ClientMessage::EraseShape { room_id: self.room_id.clone(), shape_id: removed.shape_id }))
    }

    /// Empty the canvas and tell the room.
    pub fn clear_all(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.ui.selected = None;
        vec![Action::Send(ClientMessage::ClearCanvas { room_id: self.room_id.clone() }), Action::RenderNeeded]
    }

    /// Change the local zoom and broadcast it. Invalid scales are ignored.
    pub fn set_zoom(&mut self, scale: f64) -> Vec<Action> {
        if !self.camera.set_zoom(scale) {
            return Vec::new();
        }
        let zoom = self.camera.zoom;
        vec![
            Action::Send(ClientMessage::Zoom { room_id: self.room_id.clone(), zoom_level: zoom }),
            Action::ZoomChanged(zoom),
            Action::RenderNeeded,
        ]
    }

    // --- Remote input ---

    /// Apply a server broadcast to the local canvas. Messages addressed to
    /// another room, presence, and errors produce no actions.
    pub fn apply_remote(&mut self, message: &ServerMessage) -> Vec<Action> {
        match message {
            ServerMessage::Shape { room_id, shape_data, .. } if self.is_current(room_id) => {
                render_if(self.doc.push(shape_data.clone()))
            }
            ServerMessage::EraseShape { room_id, shape_id } if self.is_current(room_id) => {
                render_if(self.remove_by_id(shape_id))
            }
            ServerMessage::ClearCanvas { room_id } if self.is_current(room_id) => {
                self.doc.clear();
                self.ui.selected = None;
                vec![Action::RenderNeeded]
            }
            ServerMessage::Zoom { room_id, zoom_level } if self.is_current(room_id) => {
                if self.camera.set_zoom(*zoom_level) {
                    vec![Action::ZoomChanged(self.camera.zoom), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            ServerMessage::Chat { room_id, message, .. } if self.is_current(room_id) => {
                let added = match legacy_shape_payload(message).map(|p| Shape::from_record(p, ShapeId::generate)) {
                    Some(Ok(shape)) => self.doc.push(shape),
                    _ => false,
                };
                render_if(added)
            }
            _ => Vec::new(),
        }
    }

    /// Replace the canvas with the history bootstrap result.
    pub fn load_history(&mut self, shapes: Vec<Shape>) {
        self.doc.load(shapes);
        self.ui.selected = None;
    }

    // --- Settings ---

    /// Set the active tool. Any gesture in progress is abandoned.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
        self.input = InputState::Idle;
        if tool != Tool::Select {
            self.ui.selected = None;
        }
    }

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.ui.stroke_color = color.into();
    }

    /// Set the stroke width for new shapes. Non-finite or non-positive
    /// widths are ignored.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.ui.stroke_width = width;
        }
    }

    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.ui.font_size = size;
        }
    }

    /// Switch theme. A stroke color still at the old theme's default follows
    /// the theme; a user-picked color is kept.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.ui.stroke_color == self.ui.theme.default_stroke() {
            self.ui.stroke_color = theme.default_stroke().to_owned();
        }
        self.ui.theme = theme;
    }

    /// Update viewport dimensions in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    // --- Queries ---

    /// Geometry of the shape being dragged out, for the live preview.
    #[must_use]
    pub fn preview(&self) -> Option<Geometry> {
        match &self.input {
            InputState::Dragging { start, current, points } => {
                drag_geometry(self.ui.tool, *start, *current, points.clone())
            }
            _ => None,
        }
    }

    /// Model-space center of the eraser cursor ring, if it should be drawn.
    #[must_use]
    pub fn eraser_cursor(&self) -> Option<Point> {
        if self.ui.tool == Tool::Eraser { self.pointer } else { None }
    }

    /// Read-only view for the renderer.
    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            shapes: self.doc.as_slice(),
            camera: self.camera,
            ui: &self.ui,
            preview: self.preview(),
            eraser_cursor: self.eraser_cursor(),
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
        }
    }

    // --- Internals ---

    fn commit(&mut self, geometry: Geometry) -> Vec<Action> {
        let shape = Shape::new(geometry, Some(self.ui.stroke_color.clone()), Some(self.ui.stroke_width));
        self.doc.push(shape.clone());
        vec![
            Action::Send(ClientMessage::Shape { room_id: self.room_id.clone(), shape_data: shape }),
            Action::RenderNeeded,
        ]
    }

    fn is_current(&self, room_id: &str) -> bool {
        self.room_id == room_id
    }

    fn remove_by_id(&mut self, id: &ShapeId) -> bool {
        let Some(index) = self.doc.position(id) else {
            return false;
        };
        self.doc.remove_at(index);
        self.forget_index(index);
        true
    }

    /// Keep the selection pointing at the same shape after `index` is removed.
    fn forget_index(&mut self, index: usize) {
        self.ui.selected = match self.ui.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
    }
}

fn render_if(changed: bool) -> Vec<Action> {
    if changed { vec![Action::RenderNeeded] } else { Vec::new() }
}

/// Geometry produced by dragging `tool` from `start` to `end`.
///
/// Circles take the larger extent as their diameter and sit in the drag
/// box's start corner. Tools that do not draw return `None`.
fn drag_geometry(tool: Tool, start: Point, end: Point, points: Vec<Point>) -> Option<Geometry> {
    let width = end.x - start.x;
    let height = end.y - start.y;
    let geometry = match tool {
        Tool::Rect => Geometry::Rect { x: start.x, y: start.y, width, height },
        Tool::Diamond => Geometry::Diamond { x: start.x, y: start.y, width, height },
        Tool::Circle => {
            let radius = width.max(height) / 2.0;
            Geometry::Circle { center_x: start.x + radius, center_y: start.y + radius, radius }
        }
        Tool::Line => Geometry::Line { x1: start.x, y1: start.y, x2: end.x, y2: end.y },
        Tool::Arrow => Geometry::Arrow { x1: start.x, y1: start.y, x2: end.x, y2: end.y },
        Tool::Pencil => Geometry::Pencil { points },
        Tool::Select | Tool::Text | Tool::Eraser => return None,
    };
    Some(geometry)
}
