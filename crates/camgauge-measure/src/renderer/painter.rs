//! tiny-skia drawing surface over an RGB frame copy.
//!
//! All strokes and fills are drawn without anti-aliasing so the same input
//! always produces the same pixels.

use image::{Rgb, RgbImage};
use rusttype::{point as rt_point, Font, Scale};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform};

use camgauge_core::constants::DASH_LENGTH;

use crate::model::Color;

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = false;
    paint
}

fn stroke_for(width: f32, dashed: bool) -> Stroke {
    Stroke {
        width: width.max(1.0),
        dash: if dashed {
            StrokeDash::new(vec![DASH_LENGTH, DASH_LENGTH], 0.0)
        } else {
            None
        },
        ..Default::default()
    }
}

/// Owned pixmap with the frame's pixels, converted back on completion.
pub struct Painter {
    pixmap: Pixmap,
    width: u32,
    height: u32,
}

impl Painter {
    /// Copies `image` into a new pixmap. `None` for zero-sized images.
    pub fn from_rgb(image: &RgbImage) -> Option<Self> {
        let (width, height) = image.dimensions();
        let mut pixmap = Pixmap::new(width, height)?;
        for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(image.pixels()) {
            dst[0] = src.0[0];
            dst[1] = src.0[1];
            dst[2] = src.0[2];
            dst[3] = 255;
        }
        Some(Self { pixmap, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Converts the pixmap back into an RGB image.
    pub fn into_rgb(self) -> RgbImage {
        let data = self.pixmap.data();
        let width = self.width;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = ((y * width + x) * 4) as usize;
            Rgb([data[idx], data[idx + 1], data[idx + 2]])
        })
    }

    /// Straight line between two image positions.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f32, dashed: bool) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0 as f32, from.1 as f32);
        pb.line_to(to.0 as f32, to.1 as f32);
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &paint_for(color),
                &stroke_for(width, dashed),
                Transform::identity(),
                None,
            );
        }
    }

    /// Circle outline.
    pub fn circle(&mut self, center: (f64, f64), radius: f64, color: Color, width: f32) {
        if let Some(path) = PathBuilder::from_circle(center.0 as f32, center.1 as f32, radius as f32) {
            self.pixmap.stroke_path(
                &path,
                &paint_for(color),
                &stroke_for(width, false),
                Transform::identity(),
                None,
            );
        }
    }

    /// Filled disc.
    pub fn dot(&mut self, center: (f64, f64), radius: f64, color: Color) {
        if let Some(path) = PathBuilder::from_circle(center.0 as f32, center.1 as f32, radius as f32) {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Rectangle outline spanned by two corners in any order.
    pub fn rect_outline(&mut self, a: (f64, f64), b: (f64, f64), color: Color, width: f32) {
        let rect = Rect::from_ltrb(
            a.0.min(b.0) as f32,
            a.1.min(b.1) as f32,
            a.0.max(b.0) as f32,
            a.1.max(b.1) as f32,
        );
        if let Some(r) = rect {
            let path = PathBuilder::from_rect(r);
            self.pixmap.stroke_path(
                &path,
                &paint_for(color),
                &stroke_for(width, false),
                Transform::identity(),
                None,
            );
        }
    }

    /// Solid rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if let Some(r) = Rect::from_xywh(x, y, width, height) {
            self.pixmap
                .fill_rect(r, &paint_for(color), Transform::identity(), None);
        }
    }

    /// Draws `text` with its top-left corner at (`x`, `y`).
    pub fn text(&mut self, font: &Font<'_>, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let start = rt_point(x, y + v_metrics.ascent);
        let (width, height) = (self.width as i32, self.height as i32);
        let stride = self.width as usize;
        let data = self.pixmap.data_mut();

        for glyph in font.layout(text, scale, start) {
            let Some(bounding_box) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bounding_box.min.x;
                let py = gy as i32 + bounding_box.min.y;
                if px < 0 || px >= width || py < 0 || py >= height || v <= 0.0 {
                    return;
                }
                // Pixels are opaque, so blending reduces to a plain lerp.
                let idx = (py as usize * stride + px as usize) * 4;
                let a = v.min(1.0);
                for (channel, src) in [color.r, color.g, color.b].into_iter().enumerate() {
                    let dst = data[idx + channel] as f32;
                    data[idx + channel] = (src as f32 * a + dst * (1.0 - a)).round() as u8;
                }
            });
        }
    }
}
