//! Probabilistic Hough transform for line segments.
//!
//! Edge pixels are visited in a fixed low-discrepancy order (a golden-ratio
//! stride through the raster list) so that early votes are spread along
//! every line instead of bunching at its left end. Each pixel votes into a
//! (theta, rho) accumulator with a 1 px rho step and a 1 degree theta step.
//! As soon as the strongest bin touched by a pixel reaches the threshold,
//! the corresponding line is traced through the edge map in both directions,
//! bridging at most `max_line_gap` missing pixels. Pixels on the traced
//! segment are removed from further consideration; if the segment is long
//! enough, their votes are withdrawn and the segment is reported.

use std::f64::consts::PI;

use image::GrayImage;

use camgauge_core::geometry::distance;
use camgauge_core::Point;

const ANGLE_BINS: usize = 180;

/// Fixed-point shift used while stepping along a traced line.
const SHIFT: u32 = 16;

/// A detected segment in edge-map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }
}

struct Accumulator {
    cos: Vec<f64>,
    sin: Vec<f64>,
    rho_bins: usize,
    votes: Vec<i32>,
}

impl Accumulator {
    fn new(width: u32, height: u32) -> Self {
        let step = PI / ANGLE_BINS as f64;
        let (cos, sin) = (0..ANGLE_BINS)
            .map(|n| {
                let theta = n as f64 * step;
                (theta.cos(), theta.sin())
            })
            .unzip();
        let rho_bins = ((width + height) * 2 + 1) as usize;
        Self {
            cos,
            sin,
            rho_bins,
            votes: vec![0; ANGLE_BINS * rho_bins],
        }
    }

    fn bin(&self, n: usize, x: i64, y: i64) -> usize {
        let rho = (x as f64 * self.cos[n] + y as f64 * self.sin[n]).round() as i64;
        let offset = (self.rho_bins as i64 - 1) / 2;
        n * self.rho_bins + (rho + offset) as usize
    }

    /// Adds the pixel's votes and returns the strongest (votes, angle bin).
    fn vote(&mut self, x: i64, y: i64) -> (i32, usize) {
        let mut best = (0, 0);
        for n in 0..ANGLE_BINS {
            let idx = self.bin(n, x, y);
            self.votes[idx] += 1;
            if self.votes[idx] > best.0 {
                best = (self.votes[idx], n);
            }
        }
        best
    }

    fn withdraw(&mut self, x: i64, y: i64) {
        for n in 0..ANGLE_BINS {
            let idx = self.bin(n, x, y);
            self.votes[idx] -= 1;
        }
    }
}

/// Fixed-point stepper along a line direction.
#[derive(Clone, Copy)]
struct Walk {
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
    /// True when x advances by whole pixels and y carries the fraction.
    x_major: bool,
}

impl Walk {
    fn new(x: i64, y: i64, a: f64, b: f64) -> Self {
        let one = (1i64 << SHIFT) as f64;
        let half = 1i64 << (SHIFT - 1);
        if a.abs() > b.abs() {
            Self {
                x0: x,
                y0: (y << SHIFT) + half,
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * one / a.abs()).round() as i64,
                x_major: true,
            }
        } else {
            Self {
                x0: (x << SHIFT) + half,
                y0: y,
                dx: (a * one / b.abs()).round() as i64,
                dy: if b > 0.0 { 1 } else { -1 },
                x_major: false,
            }
        }
    }

    fn pixel(&self, x: i64, y: i64) -> (i64, i64) {
        if self.x_major {
            (x, y >> SHIFT)
        } else {
            (x >> SHIFT, y)
        }
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Visiting order for `n` points: `i * stride mod n` with a stride near
/// `n / phi` that is coprime with `n`, so every index appears once.
fn visiting_order(n: usize) -> impl Iterator<Item = usize> {
    let mut stride = ((n as f64 * 0.618_033_988_7).round() as usize).max(1);
    while n > 2 && gcd(stride, n) != 1 {
        stride += 1;
    }
    if n <= 2 {
        stride = 1;
    }
    (0..n).map(move |i| (i * stride) % n)
}

/// Finds line segments in a binary edge map.
///
/// Segments shorter than `min_line_length` along both axes are discarded.
pub fn probabilistic_hough(
    edges: &GrayImage,
    threshold: u32,
    min_line_length: u32,
    max_line_gap: u32,
) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let w = width as i64;
    let h = height as i64;
    let threshold = threshold.max(1) as i32;
    let min_line_length = min_line_length as i64;
    let max_line_gap = max_line_gap as i64;

    let mut mask: Vec<bool> = edges.pixels().map(|p| p.0[0] > 0).collect();
    let points: Vec<(i64, i64)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 0)
        .map(|(x, y, _)| (x as i64, y as i64))
        .collect();

    let mut accumulator = Accumulator::new(width, height);
    let mut segments = Vec::new();
    let idx = |x: i64, y: i64| (y * w + x) as usize;

    for (px, py) in visiting_order(points.len()).map(|i| points[i]) {
        // Already consumed by an earlier segment.
        if !mask[idx(px, py)] {
            continue;
        }

        let (max_votes, max_n) = accumulator.vote(px, py);
        if max_votes < threshold {
            continue;
        }

        // Direction along the line whose normal is at angle max_n.
        let a = -accumulator.sin[max_n];
        let b = accumulator.cos[max_n];
        let walk = Walk::new(px, py, a, b);

        let mut line_end = [(px, py); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let (dx, dy) = if k == 0 { (walk.dx, walk.dy) } else { (-walk.dx, -walk.dy) };
            let (mut x, mut y) = (walk.x0, walk.y0);
            let mut gap = 0;
            loop {
                let (j, i) = walk.pixel(x, y);
                if j < 0 || j >= w || i < 0 || i >= h {
                    break;
                }
                if mask[idx(j, i)] {
                    gap = 0;
                    *end = (j, i);
                } else {
                    gap += 1;
                    if gap > max_line_gap {
                        break;
                    }
                }
                x += dx;
                y += dy;
            }
        }

        let good_line = (line_end[1].0 - line_end[0].0).abs() >= min_line_length
            || (line_end[1].1 - line_end[0].1).abs() >= min_line_length;

        for (k, &end) in line_end.iter().enumerate() {
            let (dx, dy) = if k == 0 { (walk.dx, walk.dy) } else { (-walk.dx, -walk.dy) };
            let (mut x, mut y) = (walk.x0, walk.y0);
            loop {
                let (j, i) = walk.pixel(x, y);
                if j < 0 || j >= w || i < 0 || i >= h {
                    break;
                }
                let at = idx(j, i);
                if mask[at] {
                    if good_line {
                        accumulator.withdraw(j, i);
                    }
                    mask[at] = false;
                }
                if (j, i) == end {
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        if good_line {
            segments.push(LineSegment {
                start: Point::new(line_end[0].0 as i32, line_end[0].1 as i32),
                end: Point::new(line_end[1].0 as i32, line_end[1].1 as i32),
            });
        }
    }

    tracing::debug!(
        "Hough lines: {} edge points, {} segments",
        points.len(),
        segments.len()
    );
    segments
}

/// Longest segment by Euclidean length; the earliest wins ties.
pub fn longest_segment(segments: &[LineSegment]) -> Option<LineSegment> {
    segments.iter().copied().fold(None, |best, segment| match best {
        Some(b) if b.length() >= segment.length() => Some(b),
        _ => Some(segment),
    })
}
