//! Coordinate mapping between a display widget and the image it shows.
//!
//! The widget scales the image uniformly to fit ("keep aspect ratio") and
//! centres it, leaving letterbox bars on two sides. Pointer positions arrive
//! in widget pixels and must be mapped into image pixels before they reach
//! the measurement state machine.
//!
//! ```text
//! ratio    = min(widget_w / image_w, widget_h / image_h)
//! offset   = ((widget_w - image_w * ratio) / 2, (widget_h - image_h * ratio) / 2)
//! image_xy = clamp((pointer - offset) / ratio, 0, dim - 1)
//! ```

use std::fmt;

use crate::geometry::Point;
use crate::types::SurfaceSize;

/// Fit-and-centre transform for one image shown in one widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    image_width: u32,
    image_height: u32,
    widget_width: f64,
    widget_height: f64,
    ratio: f64,
    offset_x: f64,
    offset_y: f64,
}

impl DisplayMapping {
    /// Builds the mapping for an image of `image_width` x `image_height`
    /// shown in a widget of `surface` size.
    pub fn new(image_width: u32, image_height: u32, surface: SurfaceSize) -> Self {
        let (ratio, offset_x, offset_y) = if image_width == 0
            || image_height == 0
            || surface.width <= 0.0
            || surface.height <= 0.0
        {
            (0.0, 0.0, 0.0)
        } else {
            let ratio = (surface.width / image_width as f64).min(surface.height / image_height as f64);
            (
                ratio,
                (surface.width - image_width as f64 * ratio) / 2.0,
                (surface.height - image_height as f64 * ratio) / 2.0,
            )
        };

        Self {
            image_width,
            image_height,
            widget_width: surface.width,
            widget_height: surface.height,
            ratio,
            offset_x,
            offset_y,
        }
    }

    /// Uniform widget-pixels-per-image-pixel scale factor.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Letterbox offset of the image's top-left corner inside the widget.
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Returns true when the mapping cannot place any point (zero-sized
    /// image or widget).
    pub fn is_degenerate(&self) -> bool {
        self.ratio <= 0.0
    }

    /// Maps a widget-local pointer position into image pixels, clamped into
    /// the image bounds. Degenerate mappings send every point to the origin.
    pub fn widget_to_image(&self, x: f64, y: f64) -> Point {
        if self.is_degenerate() {
            return Point::new(0, 0);
        }
        let image_x = ((x - self.offset_x) / self.ratio).floor();
        let image_y = ((y - self.offset_y) / self.ratio).floor();
        let max_x = (self.image_width - 1) as f64;
        let max_y = (self.image_height - 1) as f64;
        Point::new(
            image_x.clamp(0.0, max_x) as i32,
            image_y.clamp(0.0, max_y) as i32,
        )
    }

    /// Maps an image pixel back to the widget position of its top-left corner.
    pub fn image_to_widget(&self, point: Point) -> (f64, f64) {
        (
            point.x as f64 * self.ratio + self.offset_x,
            point.y as f64 * self.ratio + self.offset_y,
        )
    }
}

impl fmt::Display for DisplayMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} in {:.0}x{:.0} | Ratio: {:.3} | Offset: ({:.1}, {:.1})",
            self.image_width,
            self.image_height,
            self.widget_width,
            self.widget_height,
            self.ratio,
            self.offset_x,
            self.offset_y
        )
    }
}
