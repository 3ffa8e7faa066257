//! # CamGauge Measure
//!
//! Interactive measurement layer on top of live camera frames.
//!
//! - [`model`]: drawing kinds, styling and the drawing object itself
//! - [`layer`]: the per-camera store of committed and in-progress objects
//! - [`measurement`]: the per-view pointer state machine
//! - [`renderer`]: overlay rendering and measurement labels
//! - [`coordinator`]: routing between views, cameras and output sinks

pub mod coordinator;
pub mod layer;
pub mod measurement;
pub mod model;
pub mod renderer;

pub use coordinator::{DisplaySink, DrawingCoordinator};
pub use layer::{LayerManager, SharedLayer};
pub use measurement::{MeasurementManager, Phase};
pub use model::{Color, DrawingKind, DrawingObject, Origin, Properties};
pub use renderer::{render_frame, LabelBox, RenderStyle, RenderedFrame, Renderer, TextLabel};
