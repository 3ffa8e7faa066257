//! Identifiers and pointer events exchanged with the windowing layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Opaque token naming one display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Opaque token naming one camera; all views of a camera share its drawings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CameraId(pub u32);

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera-{}", self.0)
    }
}

/// Pointer button designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Left button (or touch): draws.
    Primary,
    /// Right button: cancels a gesture or selects.
    Secondary,
}

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventKind {
    Press,
    Move,
    Release,
}

/// Rendered size of the widget showing a frame, in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where a pointer event happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerPosition {
    /// Already mapped into image pixels.
    Image(Point),
    /// Raw widget-local position plus the widget size needed to map it.
    Widget { x: f64, y: f64, surface: SurfaceSize },
}

/// One pointer event as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: MouseButton,
    pub position: PointerPosition,
}

impl PointerEvent {
    /// Creates an event whose position is already in image coordinates.
    pub fn at_image(kind: PointerEventKind, button: MouseButton, point: Point) -> Self {
        Self {
            kind,
            button,
            position: PointerPosition::Image(point),
        }
    }

    /// Creates an event carrying raw widget coordinates.
    pub fn at_widget(
        kind: PointerEventKind,
        button: MouseButton,
        x: f64,
        y: f64,
        surface: SurfaceSize,
    ) -> Self {
        Self {
            kind,
            button,
            position: PointerPosition::Widget { x, y, surface },
        }
    }

    pub fn press(point: Point) -> Self {
        Self::at_image(PointerEventKind::Press, MouseButton::Primary, point)
    }

    pub fn moved(point: Point) -> Self {
        Self::at_image(PointerEventKind::Move, MouseButton::Primary, point)
    }

    pub fn release(point: Point) -> Self {
        Self::at_image(PointerEventKind::Release, MouseButton::Primary, point)
    }

    pub fn secondary_press(point: Point) -> Self {
        Self::at_image(PointerEventKind::Press, MouseButton::Secondary, point)
    }
}
