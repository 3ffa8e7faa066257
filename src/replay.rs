//! Scripted gesture replay.
//!
//! Drives a [`DrawingCoordinator`] from a JSON list of steps instead of a
//! windowing toolkit. Every step names one action:
//!
//! ```json
//! [
//!   { "tool": "line_segment" },
//!   { "press": [10, 10] },
//!   { "move": [50, 10] },
//!   { "release": [100, 10] },
//!   { "undo": "drawing" },
//!   { "clear": null }
//! ]
//! ```
//!
//! Gestures go to one view of a single camera; a second view of the same
//! camera is registered too, so the output reflects the shared drawings.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use camgauge_core::{CameraId, Point, PointerEvent, TracingLogSink, ViewId};
use camgauge_measure::{
    Color, DrawingCoordinator, DrawingKind, Properties, RenderStyle, RenderedFrame,
};
use camgauge_settings::Config;

/// Camera every replayed view belongs to.
pub const REPLAY_CAMERA: CameraId = CameraId(1);

/// View whose rendering is written out.
pub const MAIN_VIEW: ViewId = ViewId(1);

/// Mirror view sharing the camera's drawings.
pub const TAB_VIEW: ViewId = ViewId(2);

/// Which undo history an `undo` step targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoTarget {
    Drawing,
    Detection,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Selects a tool; `null` deselects.
    Tool(Option<DrawingKind>),
    Press([i32; 2]),
    Move([i32; 2]),
    Release([i32; 2]),
    /// Secondary-button press: cancels a gesture or selects.
    Cancel([i32; 2]),
    Undo(UndoTarget),
    Clear,
    ClearDetections,
    DeleteSelected,
}

/// Parses a JSON step list.
pub fn parse_script(json: &str) -> Result<Vec<Step>> {
    serde_json::from_str(json).context("Invalid gesture script")
}

fn at([x, y]: [i32; 2]) -> Point {
    Point::new(x, y)
}

/// A coordinator set up for one camera with a main and a mirror view.
pub struct Replay {
    coordinator: DrawingCoordinator,
    view: ViewId,
}

impl Replay {
    /// Registers the views, applies `config` and submits `frame`.
    ///
    /// `view` selects which of [`MAIN_VIEW`] and [`TAB_VIEW`] receives the
    /// gestures.
    pub fn new(frame: &DynamicImage, config: &Config, view: ViewId) -> Result<Self> {
        let mut coordinator = DrawingCoordinator::new();
        coordinator.register_view(MAIN_VIEW, REPLAY_CAMERA);
        coordinator.register_view(TAB_VIEW, REPLAY_CAMERA);
        if coordinator.camera_of(view).is_err() {
            anyhow::bail!("View {} is not one of {} and {}", view, MAIN_VIEW, TAB_VIEW);
        }

        coordinator.set_log_sink(Arc::new(TracingLogSink));
        coordinator.set_parameters(config);
        let style = RenderStyle {
            font_size: config.ui.label_font_size,
            font_family: config.ui.label_font_family.clone(),
            ..RenderStyle::default()
        };
        let properties = Properties::new(
            Color::from(config.ui.default_color),
            config.ui.default_thickness,
        );
        coordinator.set_style(style, properties);
        coordinator.submit_frame(REPLAY_CAMERA, frame)?;

        Ok(Self { coordinator, view })
    }

    pub fn coordinator(&self) -> &DrawingCoordinator {
        &self.coordinator
    }

    /// Applies one step to the driven view.
    pub fn apply(&mut self, step: &Step) -> Result<()> {
        let c = &mut self.coordinator;
        let view = self.view;
        tracing::debug!("Replaying {:?} on {}", step, view);
        match *step {
            Step::Tool(kind) => c.set_tool(view, kind)?,
            Step::Press(p) => {
                c.on_pointer(view, PointerEvent::press(at(p)))?;
            }
            Step::Move(p) => {
                c.on_pointer(view, PointerEvent::moved(at(p)))?;
            }
            Step::Release(p) => {
                c.on_pointer(view, PointerEvent::release(at(p)))?;
            }
            Step::Cancel(p) => {
                c.on_pointer(view, PointerEvent::secondary_press(at(p)))?;
            }
            Step::Undo(UndoTarget::Drawing) => {
                c.undo_last_drawing(view)?;
            }
            Step::Undo(UndoTarget::Detection) => {
                c.undo_last_detection(view)?;
            }
            Step::Clear => c.clear(view)?,
            Step::ClearDetections => {
                c.clear_detections(view)?;
            }
            Step::DeleteSelected => {
                c.delete_selected(view)?;
            }
        }
        Ok(())
    }

    /// Applies every step, then renders the main view.
    pub fn run(&mut self, steps: &[Step]) -> Result<RenderedFrame> {
        for (index, step) in steps.iter().enumerate() {
            self.apply(step)
                .with_context(|| format!("Step {} ({:?}) failed", index + 1, step))?;
        }
        Ok(self.coordinator.render_view(MAIN_VIEW)?)
    }
}

/// Loads the inputs, replays the script and writes the annotated image.
pub fn replay_files(
    image_path: &Path,
    script_path: &Path,
    out_path: &Path,
    config: &Config,
    view: ViewId,
) -> Result<RenderedFrame> {
    let frame = image::open(image_path)
        .with_context(|| format!("Failed to open image {}", image_path.display()))?;
    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let steps = parse_script(&script)?;

    let mut replay = Replay::new(&frame, config, view)?;
    let rendered = replay.run(&steps)?;
    rendered
        .image
        .save(out_path)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    tracing::info!(
        "Replayed {} steps onto {}; {} label(s)",
        steps.len(),
        out_path.display(),
        rendered.labels.len()
    );
    Ok(rendered)
}
