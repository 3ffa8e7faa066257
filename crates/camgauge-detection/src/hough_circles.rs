//! Hough gradient transform for circles.
//!
//! Every edge pixel votes along its intensity gradient, both towards and
//! away from the brighter side, at each integer radius in
//! `[min_radius, max_radius]`. The accumulator is box-summed over 3x3 cells
//! to absorb rounding; local maxima reaching `param2` become center
//! candidates, strongest first, and candidates closer than `min_dist` to an
//! accepted center are dropped. Each accepted center takes the radius best
//! supported by the distances of the edge pixels around it.

use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use camgauge_core::geometry::distance;
use camgauge_core::Point;

use crate::edges::edge_points;
use crate::params::CircleDetectionParams;

/// A detected circle in edge-map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedCircle {
    pub center: Point,
    pub radius: f64,
    /// Box-summed accumulator value at the center.
    pub votes: u32,
}

struct EdgeSample {
    x: i32,
    y: i32,
    ux: f64,
    uy: f64,
}

fn gradient_samples(gray: &GrayImage, edges: &GrayImage) -> Vec<EdgeSample> {
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    edge_points(edges)
        .into_iter()
        .filter_map(|(x, y)| {
            let dx = gx.get_pixel(x, y).0[0] as f64;
            let dy = gy.get_pixel(x, y).0[0] as f64;
            let magnitude = dx.hypot(dy);
            (magnitude > 0.0).then(|| EdgeSample {
                x: x as i32,
                y: y as i32,
                ux: dx / magnitude,
                uy: dy / magnitude,
            })
        })
        .collect()
}

fn box_sum(acc: &[u32], width: usize, height: usize) -> Vec<u32> {
    let mut out = vec![0u32; acc.len()];
    for y in 0..height {
        for x in 0..width {
            let mut total = 0;
            for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                    total += acc[ny * width + nx];
                }
            }
            out[y * width + x] = total;
        }
    }
    out
}

fn is_local_max(values: &[u32], width: usize, height: usize, x: usize, y: usize) -> bool {
    let v = values[y * width + x];
    for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
        for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
            if values[ny * width + nx] > v {
                return false;
            }
        }
    }
    true
}

/// Radius best supported by the edge pixels around `center`, or `None` when
/// no edge pixel lies inside the radius range.
fn estimate_radius(center: Point, samples: &[EdgeSample], min_radius: u32, max_radius: u32) -> Option<f64> {
    let min_r = min_radius as usize;
    let max_r = max_radius as usize;
    let mut histogram = vec![0u32; max_r + 2];
    let mut distances = Vec::new();
    for s in samples {
        let d = distance(center, Point::new(s.x, s.y));
        let bin = d.round() as usize;
        if (min_r..=max_r).contains(&bin) {
            histogram[bin] += 1;
            distances.push(d);
        }
    }

    let mut best: Option<(usize, u32)> = None;
    for r in min_r..=max_r {
        let support: u32 = histogram[r.saturating_sub(1)..=(r + 1)].iter().sum();
        if support > 0 && best.is_none_or(|(_, s)| support > s) {
            best = Some((r, support));
        }
    }
    let (best_r, _) = best?;

    let window: Vec<f64> = distances
        .into_iter()
        .filter(|d| (d.round() as usize).abs_diff(best_r) <= 1)
        .collect();
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Finds circles, strongest first.
///
/// `gray` supplies gradient directions and `edges` the binary edge map of
/// the same image.
pub fn hough_circles(gray: &GrayImage, edges: &GrayImage, params: &CircleDetectionParams) -> Vec<DetectedCircle> {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 || edges.dimensions() != (width, height) {
        return Vec::new();
    }
    let (w, h) = (width as usize, height as usize);
    let min_radius = params.min_radius.max(1);
    let max_radius = params.max_radius.max(min_radius);

    let samples = gradient_samples(gray, edges);
    let mut acc = vec![0u32; w * h];
    for s in &samples {
        for r in min_radius..=max_radius {
            let r = r as f64;
            for sign in [1.0, -1.0] {
                let cx = (s.x as f64 + sign * s.ux * r).round();
                let cy = (s.y as f64 + sign * s.uy * r).round();
                if cx >= 0.0 && cy >= 0.0 && cx < width as f64 && cy < height as f64 {
                    acc[cy as usize * w + cx as usize] += 1;
                }
            }
        }
    }

    let summed = box_sum(&acc, w, h);
    let mut candidates: Vec<(u32, usize, usize)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = summed[y * w + x];
            if v >= params.param2 && is_local_max(&summed, w, h, x, y) {
                candidates.push((v, x, y));
            }
        }
    }
    // Strongest first, raster order among equals.
    candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.2.cmp(&b.2)).then(a.1.cmp(&b.1)));

    let min_dist = params.min_dist as f64;
    let mut circles: Vec<DetectedCircle> = Vec::new();
    for (votes, x, y) in candidates {
        let center = Point::new(x as i32, y as i32);
        if circles.iter().any(|c| distance(c.center, center) < min_dist) {
            continue;
        }
        if let Some(radius) = estimate_radius(center, &samples, min_radius, max_radius) {
            circles.push(DetectedCircle { center, radius, votes });
        }
    }

    tracing::debug!(
        "Hough circles: {} edge samples, {} circles",
        samples.len(),
        circles.len()
    );
    circles
}
