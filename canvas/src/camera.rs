#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

pub use frames::Point;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

/// View transform for the canvas. The whiteboard has no pan; the only
/// transform is a uniform zoom about the origin.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to model coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: screen.x / self.zoom, y: screen.y / self.zoom }
    }

    /// Convert a model-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: world.x * self.zoom, y: world.y * self.zoom }
    }

    /// Convert a screen-space distance (pixels) to model-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Set the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. Non-finite and
    /// non-positive values are rejected and leave the camera unchanged.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() || zoom <= 0.0 {
            return false;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        true
    }
}
