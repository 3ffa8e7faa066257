//! Raster frame helpers.
//!
//! Frames arrive as 8-bit single- or three-channel images. Rendering always
//! works on an RGB copy, so the acquisition side may recycle its buffer as
//! soon as a render call returns.

use std::borrow::Cow;

use image::{DynamicImage, RgbImage};

use crate::error::{Error, Result};

/// Rejects frames that cannot be rendered (zero-sized).
pub fn validate_frame(frame: &DynamicImage) -> Result<()> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(Error::invalid_frame(format!(
            "frame has zero size ({}x{})",
            frame.width(),
            frame.height()
        )));
    }
    Ok(())
}

/// Borrows an RGB frame as-is, or promotes any other layout to RGB.
pub fn as_rgb(frame: &DynamicImage) -> Cow<'_, RgbImage> {
    match frame {
        DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
        other => Cow::Owned(other.to_rgb8()),
    }
}
