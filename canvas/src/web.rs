//! Browser bindings: a [`Surface`] over `CanvasRenderingContext2d` and the
//! [`Engine`] wrapper that owns the canvas element.
//!
//! Only compiled for `wasm32`. Everything else in the crate is host-testable.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::engine::EngineCore;
use crate::render::{self, PathOp, Surface};

/// [`Surface`] implementation for a browser 2D context.
pub struct WebSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> WebSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for WebSurface<'_> {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, width, height);
        Ok(())
    }

    fn save(&mut self) -> Result<(), JsValue> {
        self.ctx.save();
        Ok(())
    }

    fn restore(&mut self) -> Result<(), JsValue> {
        self.ctx.restore();
        Ok(())
    }

    fn scale(&mut self, factor: f64) -> Result<(), JsValue> {
        self.ctx.scale(factor, factor)
    }

    fn set_stroke(&mut self, color: &str, width: f64) -> Result<(), JsValue> {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        Ok(())
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), JsValue> {
        self.ctx.stroke_rect(x, y, width, height);
        Ok(())
    }

    fn stroke_path(&mut self, ops: &[PathOp]) -> Result<(), JsValue> {
        self.ctx.begin_path();
        for op in ops {
            match *op {
                PathOp::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathOp::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathOp::Arc { center, radius } => {
                    // Start a fresh subpath so the circle is not joined to
                    // whatever came before it.
                    self.ctx.move_to(center.x + radius, center.y);
                    self.ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
                }
                PathOp::Close => self.ctx.close_path(),
            }
        }
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) -> Result<(), JsValue> {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, x, y)
    }
}

/// The full canvas engine: [`EngineCore`] plus the browser canvas it draws to.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Bind an engine for `room_id` to a canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, room_id: impl Into<String>) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self { canvas, ctx, core: EngineCore::new(room_id) })
    }

    /// Match the backing store to the element's CSS size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.core.set_viewport(f64::from(width), f64::from(height));
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        render::draw(&mut WebSurface::new(&self.ctx), &self.core.scene())
    }
}
