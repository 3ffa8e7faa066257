//! Drawing object model.
//!
//! Every annotation on a camera frame is a [`DrawingObject`]: a kind, the
//! control points the user placed (in image pixels), and a small set of
//! styling and state flags. What the points mean depends on the kind:
//!
//! | Kind | Points |
//! |---|---|
//! | `Point` | marker position |
//! | `Line` | anchor, point on the line |
//! | `Circle` | center, point on the rim |
//! | `LineSegment` | start, end |
//! | `Parallel` | two points on the first line, one point on the second |
//! | `CircleLine` | center, rim point, two points on the line |
//! | `TwoLines` | two points per line |
//! | `LineDetect` | ROI corners, then the detected endpoints |
//! | `CircleDetect` | ROI corners, then center and a rim point |

use std::fmt;

use serde::{Deserialize, Serialize};

use camgauge_core::constants::{HIT_TOLERANCE, POINT_MARKER_RADIUS};
use camgauge_core::geometry::{distance, perpendicular_distance, Point};

/// Closed set of annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingKind {
    Point,
    Line,
    Circle,
    LineSegment,
    Parallel,
    CircleLine,
    TwoLines,
    LineDetect,
    CircleDetect,
}

impl DrawingKind {
    pub const ALL: [DrawingKind; 9] = [
        DrawingKind::Point,
        DrawingKind::Line,
        DrawingKind::Circle,
        DrawingKind::LineSegment,
        DrawingKind::Parallel,
        DrawingKind::CircleLine,
        DrawingKind::TwoLines,
        DrawingKind::LineDetect,
        DrawingKind::CircleDetect,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DrawingKind::Point => "point",
            DrawingKind::Line => "line",
            DrawingKind::Circle => "circle",
            DrawingKind::LineSegment => "line_segment",
            DrawingKind::Parallel => "parallel",
            DrawingKind::CircleLine => "circle_line",
            DrawingKind::TwoLines => "two_lines",
            DrawingKind::LineDetect => "line_detect",
            DrawingKind::CircleDetect => "circle_detect",
        }
    }

    /// Parses the snake-case name used by [`DrawingKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Kinds whose result comes from the detection stage.
    pub fn is_detection(&self) -> bool {
        matches!(self, DrawingKind::LineDetect | DrawingKind::CircleDetect)
    }

    /// Number of pointer gestures needed before the object is committed.
    pub fn stages(&self) -> u8 {
        match self {
            DrawingKind::Parallel | DrawingKind::CircleLine | DrawingKind::TwoLines => 2,
            _ => 1,
        }
    }

    /// Origin assigned at commit time.
    pub fn origin(&self) -> Origin {
        if self.is_detection() {
            Origin::Detected
        } else {
            Origin::Manual
        }
    }
}

impl fmt::Display for DrawingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which undo history an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Manual,
    Detected,
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GREEN
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Styling and state flags of a drawing object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub color: Color,
    thickness: u32,
    /// The points are still ROI corners awaiting detection.
    pub is_roi: bool,
    pub line_detected: bool,
    pub circle_detected: bool,
    /// Marker radius for `Point` objects.
    pub radius: u32,
}

impl Properties {
    pub fn new(color: Color, thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
            ..Self::default()
        }
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    /// Sets the stroke width; zero is raised to one.
    pub fn set_thickness(&mut self, thickness: u32) {
        self.thickness = thickness.max(1);
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            color: Color::default(),
            thickness: 2,
            is_roi: false,
            line_detected: false,
            circle_detected: false,
            radius: POINT_MARKER_RADIUS,
        }
    }
}

/// One annotation on a camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingObject {
    pub id: u64,
    pub kind: DrawingKind,
    pub points: Vec<Point>,
    pub properties: Properties,
    pub visible: bool,
    pub selected: bool,
    pub origin: Origin,
}

impl DrawingObject {
    pub fn new(id: u64, kind: DrawingKind, properties: Properties) -> Self {
        Self {
            id,
            kind,
            points: Vec::new(),
            properties,
            visible: true,
            selected: false,
            origin: kind.origin(),
        }
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Places `point` at `index`: appends when `index` is one past the end,
    /// replaces otherwise. Returns false for indices further out.
    pub fn set_point(&mut self, index: usize, point: Point) -> bool {
        match index.cmp(&self.points.len()) {
            std::cmp::Ordering::Less => {
                self.points[index] = point;
                true
            }
            std::cmp::Ordering::Equal => {
                self.points.push(point);
                true
            }
            std::cmp::Ordering::Greater => false,
        }
    }

    /// Hit test against the drawn geometry, `tolerance` pixels wide.
    pub fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        let pts = &self.points;
        let near_line = |a: Point, b: Point| {
            perpendicular_distance(p, a, b).is_some_and(|d| d <= tolerance)
        };
        let near_segment = |a: Point, b: Point| segment_distance(p, a, b) <= tolerance;
        let near_rim = |c: Point, r: f64| (distance(c, p) - r).abs() <= tolerance;
        let near_rect = |a: Point, b: Point| {
            let (x0, x1) = (a.x.min(b.x) as f64, a.x.max(b.x) as f64);
            let (y0, y1) = (a.y.min(b.y) as f64, a.y.max(b.y) as f64);
            let (px, py) = p.to_f64();
            let inside_x = px >= x0 - tolerance && px <= x1 + tolerance;
            let inside_y = py >= y0 - tolerance && py <= y1 + tolerance;
            let on_vertical = (px - x0).abs() <= tolerance || (px - x1).abs() <= tolerance;
            let on_horizontal = (py - y0).abs() <= tolerance || (py - y1).abs() <= tolerance;
            (on_vertical && inside_y) || (on_horizontal && inside_x)
        };

        match (self.kind, pts.as_slice()) {
            (DrawingKind::Point, [c, ..]) => {
                distance(*c, p) <= self.properties.radius as f64 + tolerance
            }
            (DrawingKind::Line, [a, b, ..]) => near_line(*a, *b),
            (DrawingKind::LineSegment, [a, b, ..]) => near_segment(*a, *b),
            (DrawingKind::Circle, [c, e, ..]) => near_rim(*c, distance(*c, *e)),
            (DrawingKind::Parallel, [a, b, rest @ ..]) => {
                near_line(*a, *b)
                    || rest.first().is_some_and(|c| {
                        let shifted = *b + (*c - *a);
                        near_line(*c, shifted)
                    })
            }
            (DrawingKind::CircleLine, [c, e, rest @ ..]) => {
                near_rim(*c, distance(*c, *e))
                    || matches!(rest, [a, b, ..] if near_line(*a, *b))
            }
            (DrawingKind::TwoLines, [a, b, rest @ ..]) => {
                near_line(*a, *b) || matches!(rest, [c, d, ..] if near_line(*c, *d))
            }
            (DrawingKind::LineDetect, [a, b, ..]) => {
                if self.properties.is_roi {
                    near_rect(*a, *b)
                } else {
                    near_line(*a, *b)
                }
            }
            (DrawingKind::CircleDetect, [a, b, ..]) => {
                if self.properties.circle_detected {
                    near_rim(*a, distance(*a, *b))
                } else {
                    near_rect(*a, *b)
                }
            }
            _ => false,
        }
    }

    /// Hit test with the default tolerance.
    pub fn hit(&self, p: Point) -> bool {
        self.contains_point(p, HIT_TOLERANCE)
    }
}

/// Distance from `p` to the closed segment `a`-`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (ax, ay) = a.to_f64();
    let (bx, by) = b.to_f64();
    let (px, py) = p.to_f64();
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    (px - (ax + t * dx)).hypot(py - (ay + t * dy))
}
