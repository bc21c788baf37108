//! Browser canvas surface
//!
//! Wraps a `CanvasRenderingContext2d` plus the three sprite images. An image
//! counts as ready only once it has decoded with a non-zero width, so a
//! broken or still-loading image falls back to a flat rectangle. Text always
//! asks for the display font; the browser uses sans-serif until it arrives.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Sprite, Surface, font_css};
use crate::sim::Rect;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    images: [Option<HtmlImageElement>; 3],
}

impl CanvasSurface {
    pub fn new(
        canvas: &HtmlCanvasElement,
        images: [Option<HtmlImageElement>; 3],
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
            images,
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        self.images[sprite.index()]
            .as_ref()
            .is_some_and(|img| img.complete() && img.natural_width() != 0)
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        let Some(img) = &self.images[sprite.index()] else {
            return;
        };
        if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            f64::from(rect.min.x),
            f64::from(rect.min.y),
            f64::from(rect.size.x),
            f64::from(rect.size.y),
        ) {
            log::warn!("Failed to draw {:?}: {:?}", sprite, e);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            f64::from(rect.min.x),
            f64::from(rect.min.y),
            f64::from(rect.size.x),
            f64::from(rect.size.y),
        );
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: u32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(&font_css(size_px));
        if let Err(e) = self.ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y)) {
            log::warn!("Failed to draw text: {:?}", e);
        }
    }
}
