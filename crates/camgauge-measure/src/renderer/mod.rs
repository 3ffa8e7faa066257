//! Frame renderer for measurement objects.
//! Draws committed objects and the in-progress object onto a copy of a
//! camera frame using tiny-skia, with text labels for derived metrics.
//!
//! Features:
//! - Pixel-deterministic (non-anti-aliased) rasterisation
//! - Infinite lines extended across the whole frame
//! - Dashed strokes for objects still being drawn
//! - Label boxes recorded alongside the image for callers that need the
//!   metric values

pub mod font_manager;
pub mod painter;

use image::RgbImage;
use rusttype::Font;
use serde::{Deserialize, Serialize};

use camgauge_core::constants::{
    ANCHOR_DOT_RADIUS, DEGREE_GLYPH_RADIUS, LABEL_FONT_SIZE, LABEL_OFFSET, LABEL_PADDING,
};
use camgauge_core::geometry::{
    angle_between_deg, angle_deg, circle_radius, diagonal_length, direction_between, distance,
    extend_line, line_intersection, midpoint, perpendicular_distance, perpendicular_foot, Point,
};

use crate::model::{Color, DrawingKind, DrawingObject};
use painter::Painter;

/// Gap between stacked label lines.
const LINE_SPACING: f32 = 4.0;

/// Extra radius of the highlight ring around a selected point marker.
const SELECTION_HALO: f64 = 4.0;

/// Axis-aligned box in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One line of text drawn onto a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub object_id: u64,
    pub text: String,
    /// Top-left corner of the text itself.
    pub anchor: Point,
    /// Background box, shared by stacked lines of one label.
    pub background: LabelBox,
    /// Followed by a small circle standing in for the degree sign.
    pub degree_glyph: bool,
}

/// An annotated frame together with the labels drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub image: RgbImage,
    pub labels: Vec<TextLabel>,
}

impl RenderedFrame {
    /// Texts of all labels, in drawing order.
    pub fn label_texts(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.text.as_str()).collect()
    }
}

/// Presentation settings shared by all objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub font_size: f32,
    /// Installed font family used instead of the bundled label font.
    pub font_family: Option<String>,
    pub label_background: Color,
    pub selection_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_size: LABEL_FONT_SIZE,
            font_family: None,
            label_background: Color::BLACK,
            selection_color: Color::RED,
        }
    }
}

/// Renders measurement objects onto frames.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RenderStyle,
}

/// Renders with the default style.
pub fn render_frame(
    base: &RgbImage,
    committed: &[DrawingObject],
    current: Option<&DrawingObject>,
) -> RenderedFrame {
    Renderer::default().render(base, committed, current)
}

struct Label<'a> {
    lines: &'a [String],
    /// Which lines get a trailing degree glyph.
    degrees: &'a [bool],
}

struct Frame<'f> {
    painter: Painter,
    font: Option<&'f Font<'static>>,
    style: RenderStyle,
    diagonal: f64,
    labels: Vec<TextLabel>,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Draws `committed` (visible ones, in order) and then `current` onto a
    /// copy of `base`. The base frame is never modified.
    pub fn render(
        &self,
        base: &RgbImage,
        committed: &[DrawingObject],
        current: Option<&DrawingObject>,
    ) -> RenderedFrame {
        let Some(painter) = Painter::from_rgb(base) else {
            return RenderedFrame {
                image: base.clone(),
                labels: Vec::new(),
            };
        };
        let mut frame = Frame {
            diagonal: diagonal_length(painter.width(), painter.height()),
            painter,
            font: font_manager::label_font(self.style.font_family.as_deref()),
            style: self.style.clone(),
            labels: Vec::new(),
        };

        for obj in committed.iter().filter(|o| o.visible) {
            frame.draw_object(obj, true);
        }
        if let Some(obj) = current {
            frame.draw_object(obj, false);
        }

        RenderedFrame {
            image: frame.painter.into_rgb(),
            labels: frame.labels,
        }
    }
}

fn xy(p: Point) -> (f64, f64) {
    p.to_f64()
}

impl Frame<'_> {
    fn draw_object(&mut self, obj: &DrawingObject, committed: bool) {
        let color = if obj.selected && obj.kind != DrawingKind::Point {
            self.style.selection_color
        } else {
            obj.properties.color
        };
        let width = obj.properties.thickness() as f32;
        let pts = obj.points.as_slice();

        match obj.kind {
            DrawingKind::Point => self.draw_point(obj),
            DrawingKind::Line => self.draw_line(obj.id, pts, color, width, !committed),
            DrawingKind::Circle => self.draw_circle(obj.id, pts, color, width),
            DrawingKind::LineSegment => self.draw_segment(obj.id, pts, color, width, !committed),
            DrawingKind::Parallel => self.draw_parallel(obj.id, pts, color, width, !committed),
            DrawingKind::CircleLine => self.draw_circle_line(obj.id, pts, color, width),
            DrawingKind::TwoLines => self.draw_two_lines(obj.id, pts, color, width),
            // A missed line detection keeps its ROI corners and shows them as
            // the line.
            DrawingKind::LineDetect => {
                if obj.properties.is_roi {
                    if let [a, b, ..] = pts {
                        self.painter.rect_outline(xy(*a), xy(*b), color, width);
                    }
                } else {
                    self.draw_line(obj.id, pts, color, width, false);
                }
            }
            DrawingKind::CircleDetect => {
                if obj.properties.circle_detected {
                    self.draw_circle(obj.id, pts, color, width);
                } else if let [a, b, ..] = pts {
                    self.painter.rect_outline(xy(*a), xy(*b), color, width);
                }
            }
        }
    }

    fn draw_point(&mut self, obj: &DrawingObject) {
        let Some(p) = obj.point(0) else {
            return;
        };
        let radius = obj.properties.radius as f64;
        if obj.selected {
            self.painter
                .dot(xy(p), radius + SELECTION_HALO, self.style.selection_color);
        }
        self.painter.dot(xy(p), radius, obj.properties.color);
        let anchor = (
            p.x as f32 + LABEL_OFFSET as f32 / 2.0,
            p.y as f32 - LABEL_OFFSET as f32 / 2.0 - self.line_height(),
        );
        self.draw_label(
            obj.id,
            Label { lines: &[p.to_string()], degrees: &[false] },
            anchor,
            obj.properties.color,
        );
    }

    /// Infinite line through `a` towards `b`, extended past the frame.
    fn infinite_line(&mut self, a: Point, b: Point, color: Color, width: f32, dashed: bool) -> Option<(f64, f64)> {
        let dir = direction_between(a, b)?;
        let (from, to) = extend_line(a, dir, self.diagonal);
        self.painter.line(from, to, color, width, dashed);
        Some(dir)
    }

    fn draw_line(&mut self, id: u64, pts: &[Point], color: Color, width: f32, dashed: bool) {
        let Some(&a) = pts.first() else {
            return;
        };
        self.painter.dot(xy(a), ANCHOR_DOT_RADIUS, color);
        let Some(&b) = pts.get(1) else {
            return;
        };
        if let Some((dx, dy)) = self.infinite_line(a, b, color, width, dashed) {
            let angle = angle_deg(dx, dy);
            let anchor = (
                a.x as f32 + LABEL_OFFSET as f32,
                a.y as f32 + LABEL_OFFSET as f32,
            );
            self.draw_label(
                id,
                Label { lines: &[format!("{angle:.1}")], degrees: &[true] },
                anchor,
                color,
            );
        }
    }

    fn draw_circle(&mut self, id: u64, pts: &[Point], color: Color, width: f32) {
        let Some(&c) = pts.first() else {
            return;
        };
        self.painter.dot(xy(c), ANCHOR_DOT_RADIUS, color);
        let Some(&e) = pts.get(1) else {
            return;
        };
        let r = circle_radius(c, e);
        self.painter.circle(xy(c), r, color, width);
        let anchor = (
            c.x as f32 + LABEL_OFFSET as f32,
            c.y as f32 + LABEL_OFFSET as f32,
        );
        self.draw_label(
            id,
            Label {
                lines: &[format!("({}, {})", c.x, c.y), format!("R={r:.1}px")],
                degrees: &[false, false],
            },
            anchor,
            color,
        );
    }

    fn draw_segment(&mut self, id: u64, pts: &[Point], color: Color, width: f32, dashed: bool) {
        let Some(&a) = pts.first() else {
            return;
        };
        self.painter.dot(xy(a), ANCHOR_DOT_RADIUS, color);
        let Some(&b) = pts.get(1) else {
            return;
        };
        self.painter.line(xy(a), xy(b), color, width, dashed);
        self.painter.dot(xy(b), ANCHOR_DOT_RADIUS, color);
        let mid = midpoint(a, b);
        let anchor = (
            mid.x as f32,
            mid.y as f32 - LABEL_OFFSET as f32 - self.line_height(),
        );
        self.draw_label(
            id,
            Label { lines: &[format!("{:.1}px", distance(a, b))], degrees: &[false] },
            anchor,
            color,
        );
    }

    /// The reference line is dashed until the object is committed.
    fn draw_parallel(&mut self, id: u64, pts: &[Point], color: Color, width: f32, dashed: bool) {
        let Some(&a) = pts.first() else {
            return;
        };
        self.painter.dot(xy(a), ANCHOR_DOT_RADIUS, color);
        let Some(&b) = pts.get(1) else {
            return;
        };
        let Some(dir) = self.infinite_line(a, b, color, width, dashed) else {
            return;
        };
        let angle = angle_deg(dir.0, dir.1);

        let Some(&c) = pts.get(2) else {
            let anchor = (
                a.x as f32 + LABEL_OFFSET as f32,
                a.y as f32 + LABEL_OFFSET as f32,
            );
            self.draw_label(
                id,
                Label { lines: &[format!("{angle:.1}")], degrees: &[true] },
                anchor,
                color,
            );
            return;
        };

        let (from, to) = extend_line(c, dir, self.diagonal);
        self.painter.line(from, to, color, width, false);
        self.painter.dot(xy(c), ANCHOR_DOT_RADIUS, color);

        let offset = perpendicular_distance(c, a, b).unwrap_or(0.0);
        if let Some(foot) = perpendicular_foot(c, a, b) {
            let mid = Point::from_f64((c.x as f64 + foot.0) / 2.0, (c.y as f64 + foot.1) / 2.0);
            let (from, to) = extend_line(mid, dir, self.diagonal);
            self.painter.line(from, to, color, width, true);
        }

        let anchor = (
            c.x as f32 + LABEL_OFFSET as f32,
            c.y as f32 + LABEL_OFFSET as f32,
        );
        self.draw_label(
            id,
            Label {
                lines: &[format!("{offset:.1}px"), format!("{angle:.1}")],
                degrees: &[false, true],
            },
            anchor,
            color,
        );
    }

    fn draw_circle_line(&mut self, id: u64, pts: &[Point], color: Color, width: f32) {
        let Some(&c) = pts.first() else {
            return;
        };
        self.painter.dot(xy(c), ANCHOR_DOT_RADIUS, color);
        let Some(&e) = pts.get(1) else {
            return;
        };
        self.painter.circle(xy(c), circle_radius(c, e), color, width);

        let Some(&l1) = pts.get(2) else {
            return;
        };
        self.painter.dot(xy(l1), ANCHOR_DOT_RADIUS, color);
        let Some(&l2) = pts.get(3) else {
            return;
        };
        if self.infinite_line(l1, l2, color, width, false).is_none() {
            return;
        }
        let (Some(foot), Some(d)) = (perpendicular_foot(c, l1, l2), perpendicular_distance(c, l1, l2)) else {
            return;
        };
        self.painter.line(xy(c), foot, color, width, true);
        let mid = ((c.x as f64 + foot.0) / 2.0, (c.y as f64 + foot.1) / 2.0);
        let anchor = (
            mid.0 as f32 + LABEL_OFFSET as f32 / 2.0,
            mid.1 as f32 - self.line_height() / 2.0,
        );
        self.draw_label(
            id,
            Label { lines: &[format!("{d:.1}px")], degrees: &[false] },
            anchor,
            color,
        );
    }

    fn draw_two_lines(&mut self, id: u64, pts: &[Point], color: Color, width: f32) {
        let Some(&a) = pts.first() else {
            return;
        };
        self.painter.dot(xy(a), ANCHOR_DOT_RADIUS, color);
        let Some(&b) = pts.get(1) else {
            return;
        };
        let d1 = self.infinite_line(a, b, color, width, false);

        let Some(&c) = pts.get(2) else {
            return;
        };
        self.painter.dot(xy(c), ANCHOR_DOT_RADIUS, color);
        let Some(&d) = pts.get(3) else {
            return;
        };
        let d2 = self.infinite_line(c, d, color, width, false);

        let (Some(d1), Some(d2)) = (d1, d2) else {
            return;
        };
        let Some(angle) = angle_between_deg(d1, d2) else {
            return;
        };
        let at = line_intersection(a, d1, c, d2).unwrap_or_else(|| midpoint(a, c));
        self.painter.dot(xy(at), ANCHOR_DOT_RADIUS, color);
        let anchor = (
            at.x as f32 + LABEL_OFFSET as f32,
            at.y as f32 - LABEL_OFFSET as f32 - self.line_height(),
        );
        self.draw_label(
            id,
            Label { lines: &[format!("{angle:.1}")], degrees: &[true] },
            anchor,
            color,
        );
    }

    fn line_height(&self) -> f32 {
        font_manager::measure_text(self.font, "0", self.style.font_size).1
    }

    /// Draws stacked text lines over one shared background box, moved
    /// inside the frame where possible, and records them.
    fn draw_label(&mut self, id: u64, label: Label<'_>, anchor: (f32, f32), color: Color) {
        let size = self.style.font_size;
        let metrics: Vec<(f32, f32)> = label
            .lines
            .iter()
            .map(|t| font_manager::measure_text(self.font, t, size))
            .collect();
        let glyph_room = 2.0 * DEGREE_GLYPH_RADIUS as f32 + 3.0;
        let text_width = metrics
            .iter()
            .zip(label.degrees)
            .map(|((w, _), &deg)| if deg { w + glyph_room } else { *w })
            .fold(0.0f32, f32::max);
        let text_height: f32 = metrics.iter().map(|(_, h)| h).sum::<f32>()
            + LINE_SPACING * (metrics.len().saturating_sub(1)) as f32;

        let pad = LABEL_PADDING as f32;
        let box_w = text_width + 2.0 * pad;
        let box_h = text_height + 2.0 * pad;
        let max_x = (self.painter.width() as f32 - box_w).max(0.0);
        let max_y = (self.painter.height() as f32 - box_h).max(0.0);
        let box_x = (anchor.0 - pad).clamp(0.0, max_x);
        let box_y = (anchor.1 - pad).clamp(0.0, max_y);
        let background = LabelBox { x: box_x, y: box_y, width: box_w, height: box_h };
        self.painter
            .fill_rect(box_x, box_y, box_w, box_h, self.style.label_background);

        let mut y = box_y + pad;
        let x = box_x + pad;
        for ((text, (w, h)), &deg) in label.lines.iter().zip(&metrics).zip(label.degrees) {
            if let Some(font) = self.font {
                self.painter.text(font, text, x, y, size, color);
            }
            if deg {
                let r = DEGREE_GLYPH_RADIUS;
                self.painter
                    .circle((x as f64 + *w as f64 + r + 2.0, y as f64 + r + 1.0), r, color, 1.0);
            }
            self.labels.push(TextLabel {
                object_id: id,
                text: text.clone(),
                anchor: Point::from_f64(x as f64, y as f64),
                background,
                degree_glyph: deg,
            });
            y += h + LINE_SPACING;
        }
    }
}
