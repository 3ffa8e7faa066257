//! Region-of-interest cropping.

use image::{imageops, GrayImage, RgbImage};

use camgauge_core::Point;

/// Axis-aligned crop rectangle in frame pixels; `width`/`height` exclude
/// the far corner, so a drag from (10, 10) to (20, 20) covers 10x10 pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RoiRect {
    /// Builds the rectangle spanned by two corners in any order, clamped to a
    /// `frame_width` x `frame_height` frame. `None` when nothing remains.
    pub fn from_corners(a: Point, b: Point, frame_width: u32, frame_height: u32) -> Option<Self> {
        let clamp_x = |v: i32| v.clamp(0, frame_width as i32) as u32;
        let clamp_y = |v: i32| v.clamp(0, frame_height as i32) as u32;

        let x0 = clamp_x(a.x.min(b.x));
        let x1 = clamp_x(a.x.max(b.x));
        let y0 = clamp_y(a.y.min(b.y));
        let y1 = clamp_y(a.y.max(b.y));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }

    /// Translates a crop-local point back into frame coordinates.
    pub fn to_frame(&self, local: Point) -> Point {
        self.origin() + local
    }
}

/// Copies the rectangle out of `frame` as 8-bit intensity.
pub fn crop_gray(frame: &RgbImage, roi: &RoiRect) -> GrayImage {
    let cropped = imageops::crop_imm(frame, roi.x, roi.y, roi.width, roi.height).to_image();
    imageops::grayscale(&cropped)
}
