//! Edge maps.

use image::GrayImage;

/// Binary Canny edge map: 255 on edges, 0 elsewhere.
pub fn canny_edges(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    // imageproc rejects an inverted pair.
    let (low, high) = if high < low { (high, low) } else { (low, high) };
    imageproc::edges::canny(gray, low, high)
}

/// Coordinates of every edge pixel, in raster order.
pub fn edge_points(edges: &GrayImage) -> Vec<(u32, u32)> {
    edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 0)
        .map(|(x, y, _)| (x, y))
        .collect()
}
