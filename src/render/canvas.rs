//! Canvas 2D implementation of [`Surface`]

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Rect, Sprite, Surface, TextStyle};

/// Draws onto an HTML canvas. Images load in the background; drawing a
/// sprite before it has loaded is a silent no-op.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<Sprite, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        let mut images = HashMap::new();
        for sprite in Sprite::ALL {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(sprite.path());
                    images.insert(sprite, img);
                }
                Err(e) => log::warn!("Could not create image for {:?}: {:?}", sprite, e),
            }
        }

        Some(Self { ctx, images })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        let Some(img) = self.images.get(&sprite) else {
            return;
        };
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn draw_sprite_rotated(&mut self, sprite: Sprite, center: Vec2, size: Vec2, angle: f32) {
        let Some(img) = self.images.get(&sprite) else {
            return;
        };
        self.ctx.save();
        let _ = self.ctx.translate(center.x as f64, center.y as f64);
        let _ = self.ctx.rotate(angle as f64);
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            -size.x as f64 / 2.0,
            -size.y as f64 / 2.0,
            size.x as f64,
            size.y as f64,
        );
        self.ctx.restore();
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.ctx.set_fill_style_str(style.color);
        self.ctx.set_font(style.font);
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
