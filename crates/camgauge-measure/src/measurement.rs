//! Per-view interaction state machine.
//!
//! Pointer gestures (press, move, release) build one drawing object at a
//! time. Single-stage kinds commit at the end of their first gesture.
//! `Parallel`, `TwoLines` and `CircleLine` pause after the first gesture
//! and wait for a second one:
//!
//! ```text
//!            press             release (1 stage)
//!   Idle ───────────▶ Stage1 ─────────────────────▶ Idle (committed)
//!     ▲                  │ release (2 stages)
//!     │                  ▼
//!     │           AwaitingStage2 ── press (Parallel) ──▶ Idle (committed)
//!     │                  │ press (TwoLines, CircleLine)
//!     │                  ▼
//!     └─── release ── Stage2
//! ```
//!
//! Detection kinds run the detection stage on release, replacing the ROI
//! corners with the detected primitive when something is found.

use image::RgbImage;

use camgauge_core::constants::HIT_TOLERANCE;
use camgauge_core::{ParameterSource, Point};
use camgauge_detection::{
    detect_circle_in_roi, detect_line_in_roi, CircleDetectionParams, LineDetectionParams,
};

use crate::layer::{LayerManager, SharedLayer};
use crate::model::{DrawingKind, Properties};
use crate::renderer::{RenderStyle, RenderedFrame, Renderer};

/// Where the current gesture stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No object in progress.
    Idle,
    /// Between the first press and its release.
    Stage1,
    /// First gesture done; the object waits for a second press.
    AwaitingStage2,
    /// Between the second press and its release.
    Stage2,
}

/// Drives one view's measurement tool against its camera's layer store.
pub struct MeasurementManager {
    layer: SharedLayer,
    draw_mode: Option<DrawingKind>,
    drawing: bool,
    phase: Phase,
    /// Id of the in-progress object this manager started.
    active_id: Option<u64>,
    properties: Properties,
    line_params: LineDetectionParams,
    circle_params: CircleDetectionParams,
    renderer: Renderer,
}

impl MeasurementManager {
    pub fn new(layer: SharedLayer) -> Self {
        Self {
            layer,
            draw_mode: None,
            drawing: false,
            phase: Phase::Idle,
            active_id: None,
            properties: Properties::default(),
            line_params: LineDetectionParams::default(),
            circle_params: CircleDetectionParams::default(),
            renderer: Renderer::default(),
        }
    }

    /// Creates a manager with a private layer store.
    pub fn standalone() -> Self {
        Self::new(LayerManager::shared())
    }

    pub fn layer(&self) -> &SharedLayer {
        &self.layer
    }

    pub fn draw_mode(&self) -> Option<DrawingKind> {
        self.draw_mode
    }

    /// True between the start of a gesture and the commit of its object.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Style applied to objects started from now on.
    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn set_render_style(&mut self, style: RenderStyle) {
        self.renderer = Renderer::new(style);
    }

    /// Re-reads detection parameters, substituting defaults for missing keys.
    pub fn set_parameters(&mut self, source: &dyn ParameterSource) {
        self.line_params = LineDetectionParams::from_source(source);
        self.circle_params = CircleDetectionParams::from_source(source);
    }

    pub fn line_params(&self) -> &LineDetectionParams {
        &self.line_params
    }

    pub fn circle_params(&self) -> &CircleDetectionParams {
        &self.circle_params
    }

    fn select_mode(&mut self, mode: Option<DrawingKind>) {
        self.abandon_gesture();
        self.draw_mode = mode;
        match mode {
            Some(kind) => tracing::debug!("Measurement mode: {}", kind),
            None => tracing::debug!("Measurement mode cleared"),
        }
    }

    pub fn start_point_measurement(&mut self) {
        self.select_mode(Some(DrawingKind::Point));
    }

    pub fn start_line_measurement(&mut self) {
        self.select_mode(Some(DrawingKind::Line));
    }

    pub fn start_circle_measurement(&mut self) {
        self.select_mode(Some(DrawingKind::Circle));
    }

    pub fn start_line_segment_measurement(&mut self) {
        self.select_mode(Some(DrawingKind::LineSegment));
    }

    pub fn start_parallel_measurement(&mut self) {
        self.select_mode(Some(DrawingKind::Parallel));
    }

    pub fn start_circle_line_measurement(&mut self) {
        self.select_mode(Some(DrawingKind::CircleLine));
    }

    pub fn start_two_lines_measurement(&mut self) {
        self.select_mode(Some(DrawingKind::TwoLines));
    }

    pub fn start_line_detection(&mut self) {
        self.select_mode(Some(DrawingKind::LineDetect));
    }

    pub fn start_circle_detection(&mut self) {
        self.select_mode(Some(DrawingKind::CircleDetect));
    }

    /// Selects any tool by kind.
    pub fn start_measurement(&mut self, kind: DrawingKind) {
        self.select_mode(Some(kind));
    }

    /// Deselects the tool; presses then only select objects.
    pub fn stop_measurement(&mut self) {
        self.select_mode(None);
    }

    /// Drops this manager's in-progress object, if it still owns one.
    fn abandon_gesture(&mut self) {
        if let Some(id) = self.active_id.take() {
            let mut layer = self.layer.lock();
            if layer.current_object().map(|o| o.id) == Some(id) {
                layer.discard_current();
            }
        }
        self.drawing = false;
        self.phase = Phase::Idle;
    }

    /// Resets to idle when the in-progress object was committed, cleared or
    /// replaced through another handle to the same layer.
    fn sync_with_layer(&mut self, layer: &LayerManager) {
        if self.phase == Phase::Idle {
            return;
        }
        if layer.current_object().map(|o| o.id) != self.active_id || self.active_id.is_none() {
            tracing::debug!("In-progress object gone; resetting gesture");
            self.active_id = None;
            self.drawing = false;
            self.phase = Phase::Idle;
        }
    }

    fn finish(&mut self, layer: &mut LayerManager) {
        layer.commit();
        self.active_id = None;
        self.drawing = false;
        self.phase = Phase::Idle;
    }

    /// Renders the layer's current state onto a copy of `frame`.
    pub fn render(&self, frame: &RgbImage) -> RenderedFrame {
        let layer = self.layer.lock();
        self.renderer
            .render(frame, layer.drawing_objects(), layer.current_object())
    }

    /// Primary-button press.
    ///
    /// Starting a gesture replaces the layer's in-progress object, so a
    /// press here discards a gesture left open by another view of the same
    /// camera; that view notices on its next event and resets to idle.
    pub fn on_press(&mut self, point: Point, frame: &RgbImage) -> Option<RenderedFrame> {
        let kind = self.draw_mode?;
        let layer_handle = self.layer.clone();
        let mut layer = layer_handle.lock();
        self.sync_with_layer(&layer);

        match self.phase {
            Phase::Idle => {
                let mut properties = self.properties;
                properties.is_roi = kind.is_detection();
                let id = layer.start(kind, properties);
                layer.set_current_point(0, point);
                self.active_id = Some(id);
                self.drawing = true;
                if kind == DrawingKind::Point {
                    self.finish(&mut layer);
                } else {
                    self.phase = Phase::Stage1;
                }
            }
            Phase::AwaitingStage2 => {
                let count = layer.current_object().map_or(0, |o| o.points.len());
                match kind {
                    DrawingKind::Parallel if count == 2 => {
                        layer.set_current_point(2, point);
                        self.finish(&mut layer);
                    }
                    DrawingKind::TwoLines | DrawingKind::CircleLine if count == 2 => {
                        layer.set_current_point(2, point);
                        self.phase = Phase::Stage2;
                    }
                    _ => return None,
                }
            }
            // A press while a gesture is still open (lost release) is ignored.
            Phase::Stage1 | Phase::Stage2 => return None,
        }

        drop(layer);
        Some(self.render(frame))
    }

    /// Pointer move; only meaningful while a gesture is open.
    pub fn on_move(&mut self, point: Point, frame: &RgbImage) -> Option<RenderedFrame> {
        self.draw_mode?;
        let layer_handle = self.layer.clone();
        let mut layer = layer_handle.lock();
        self.sync_with_layer(&layer);

        let index = match self.phase {
            Phase::Stage1 => 1,
            Phase::Stage2 => 3,
            Phase::Idle | Phase::AwaitingStage2 => return None,
        };
        if !layer.set_current_point(index, point) {
            return None;
        }

        drop(layer);
        Some(self.render(frame))
    }

    /// Primary-button release; ends the open gesture.
    pub fn on_release(&mut self, point: Point, frame: &RgbImage) -> Option<RenderedFrame> {
        let kind = self.draw_mode?;
        let layer_handle = self.layer.clone();
        let mut layer = layer_handle.lock();
        self.sync_with_layer(&layer);

        match self.phase {
            Phase::Stage1 => {
                // The release position fixes pt1, even when no move came first.
                layer.set_current_point(1, point);
                match kind {
                    DrawingKind::Parallel | DrawingKind::TwoLines | DrawingKind::CircleLine => {
                        self.phase = Phase::AwaitingStage2;
                    }
                    DrawingKind::LineDetect | DrawingKind::CircleDetect => {
                        self.run_detection(&mut layer, kind, frame);
                        self.finish(&mut layer);
                    }
                    _ => self.finish(&mut layer),
                }
            }
            Phase::Stage2 => {
                layer.set_current_point(3, point);
                self.finish(&mut layer);
            }
            Phase::Idle | Phase::AwaitingStage2 => return None,
        }

        drop(layer);
        Some(self.render(frame))
    }

    /// Secondary-button press: cancels an open gesture, otherwise selects
    /// the topmost object under the pointer.
    pub fn on_secondary_press(&mut self, point: Point, frame: &RgbImage) -> Option<RenderedFrame> {
        {
            let layer_handle = self.layer.clone();
            let layer = layer_handle.lock();
            self.sync_with_layer(&layer);
        }

        if self.drawing {
            tracing::debug!("Gesture cancelled at {}", point);
            self.abandon_gesture();
        } else {
            let hit = self.layer.lock().select_at(point, HIT_TOLERANCE);
            tracing::debug!("Selection at {}: {:?}", point, hit);
        }
        Some(self.render(frame))
    }

    fn run_detection(&self, layer: &mut LayerManager, kind: DrawingKind, frame: &RgbImage) {
        let Some(obj) = layer.current_object_mut() else {
            return;
        };
        let (Some(p0), Some(p1)) = (obj.point(0), obj.point(1)) else {
            return;
        };
        obj.properties.is_roi = false;

        match kind {
            DrawingKind::LineDetect => match detect_line_in_roi(frame, p0, p1, &self.line_params) {
                Some((a, b)) => {
                    tracing::info!("Line detected: {} -> {}", a, b);
                    obj.points = vec![a, b];
                    obj.properties.line_detected = true;
                }
                None => {
                    tracing::warn!("No line found in ROI {} {}; keeping the ROI", p0, p1);
                }
            },
            DrawingKind::CircleDetect => {
                match detect_circle_in_roi(frame, p0, p1, &self.circle_params) {
                    Some((center, radius)) => {
                        tracing::info!("Circle detected: center {} radius {:.1}", center, radius);
                        let rim = Point::new(center.x + radius.round() as i32, center.y);
                        obj.points = vec![center, rim];
                        obj.properties.circle_detected = true;
                    }
                    None => {
                        tracing::warn!("No circle found in ROI {} {}; keeping the ROI", p0, p1);
                    }
                }
            }
            _ => {}
        }
    }
}
