//! Pixel-space geometry used by the measurement tools.
//!
//! Image coordinates grow right (+x) and down (+y). Angles reported to the
//! user follow the visual convention instead: counter-clockwise from the
//! positive x axis, so a line rising to the right has a positive angle.
//!
//! Every helper here is pure. Degenerate input (zero-length directions,
//! parallel lines) yields `None` and the caller picks a fallback.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::PARALLEL_EPSILON;

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rounds a floating-point position to the nearest pixel.
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    pub fn to_f64(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }

    /// Clamps into `[0, width-1] x [0, height-1]`.
    pub fn clamped(self, width: u32, height: u32) -> Self {
        let max_x = width.saturating_sub(1).min(i32::MAX as u32) as i32;
        let max_y = height.saturating_sub(1).min(i32::MAX as u32) as i32;
        Self::new(self.x.clamp(0, max_x), self.y.clamp(0, max_y))
    }
}

/// `to - from` in floating point, free of integer overflow.
fn delta(from: Point, to: Point) -> (f64, f64) {
    (to.x as f64 - from.x as f64, to.y as f64 - from.y as f64)
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Returns the unit vector of `(dx, dy)`, or `None` for a zero vector.
pub fn normalize_direction(dx: f64, dy: f64) -> Option<(f64, f64)> {
    let length = dx.hypot(dy);
    if length == 0.0 || !length.is_finite() {
        return None;
    }
    Some((dx / length, dy / length))
}

/// Unit direction from `from` towards `to`.
pub fn direction_between(from: Point, to: Point) -> Option<(f64, f64)> {
    let (dx, dy) = delta(from, to);
    normalize_direction(dx, dy)
}

/// Orientation of a direction in degrees, in `[0, 180)`.
///
/// Equivalent to `atan2(-dy, dx)` folded into the upper half-plane. The
/// vector is first flipped into a canonical half-plane so that a direction
/// and its reverse produce bit-identical results.
pub fn angle_deg(dx: f64, dy: f64) -> f64 {
    let (dx, dy) = if dy > 0.0 || (dy == 0.0 && dx < 0.0) {
        (-dx, -dy)
    } else {
        (dx, dy)
    };
    let angle = (-dy).atan2(dx).to_degrees() + 0.0;
    if angle >= 180.0 {
        angle - 180.0
    } else {
        angle
    }
}

/// Angle between two lines given by their directions, in `[0, 180]`.
///
/// Directions need not be normalized; `None` if either is zero.
pub fn angle_between_deg(d1: (f64, f64), d2: (f64, f64)) -> Option<f64> {
    let (ux, uy) = normalize_direction(d1.0, d1.1)?;
    let (vx, vy) = normalize_direction(d2.0, d2.1)?;
    let dot = (ux * vx + uy * vy).clamp(-1.0, 1.0);
    Some(dot.acos().to_degrees())
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let (dx, dy) = delta(a, b);
    dx.hypot(dy)
}

/// Radius of the circle centred at `center` passing through `edge`.
pub fn circle_radius(center: Point, edge: Point) -> f64 {
    distance(center, edge)
}

/// Integer midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    let half = |u: i32, v: i32| ((u as i64 + v as i64) / 2) as i32;
    Point::new(half(a.x, b.x), half(a.y, b.y))
}

/// Signed distance from `point` to the infinite line through `p1` and `p2`.
///
/// The sign tells which side of the line the point lies on; it flips when
/// the line's endpoints are swapped. `None` when `p1 == p2`.
pub fn signed_perpendicular_distance(point: Point, p1: Point, p2: Point) -> Option<f64> {
    let (dx, dy) = delta(p1, p2);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }
    let (px, py) = delta(p1, point);
    let cross = dy * px - dx * py;
    Some(cross / length)
}

/// Unsigned distance from `point` to the infinite line through `p1` and `p2`.
pub fn perpendicular_distance(point: Point, p1: Point, p2: Point) -> Option<f64> {
    signed_perpendicular_distance(point, p1, p2).map(f64::abs)
}

/// Foot of the perpendicular dropped from `point` onto the line `p1`-`p2`.
pub fn perpendicular_foot(point: Point, p1: Point, p2: Point) -> Option<(f64, f64)> {
    let signed = signed_perpendicular_distance(point, p1, p2)?;
    let (ux, uy) = direction_between(p1, p2)?;
    // (uy, -ux) is the unit normal the signed distance is measured along.
    Some((
        point.x as f64 - signed * uy,
        point.y as f64 + signed * ux,
    ))
}

/// Intersection of the lines `p1 + t*d1` and `p3 + s*d2`.
///
/// `None` when the lines are parallel or nearly so.
pub fn line_intersection(p1: Point, d1: (f64, f64), p3: Point, d2: (f64, f64)) -> Option<Point> {
    let (dx1, dy1) = d1;
    let (dx2, dy2) = d2;
    let det = dx1 * dy2 - dy1 * dx2;
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let (ox, oy) = delta(p1, p3);
    let t = (ox * dy2 - oy * dx2) / det;
    Some(Point::from_f64(
        p1.x as f64 + t * dx1,
        p1.y as f64 + t * dy1,
    ))
}

/// Length of the image diagonal, used to extend infinite lines past the
/// frame edges.
pub fn diagonal_length(width: u32, height: u32) -> f64 {
    (width as f64).hypot(height as f64)
}

/// Endpoints of the segment through `anchor` along `direction`, extended by
/// `reach` in both directions.
pub fn extend_line(anchor: Point, direction: (f64, f64), reach: f64) -> ((f64, f64), (f64, f64)) {
    let (ax, ay) = anchor.to_f64();
    let (ux, uy) = direction;
    (
        (ax - ux * reach, ay - uy * reach),
        (ax + ux * reach, ay + uy * reach),
    )
}
