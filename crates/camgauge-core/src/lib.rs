//! # CamGauge Core
//!
//! Core types and pure helpers shared by every CamGauge crate:
//!
//! - [`geometry`]: pixel-space point type and the measurement math
//!   (directions, angles, intersections, perpendicular distances)
//! - [`mapping`]: widget-to-image coordinate mapping for letterboxed views
//! - [`types`]: view/camera identifiers and pointer events
//! - [`frame`]: raster frame validation and channel promotion
//! - [`params`]: the key-based parameter provider seam
//! - [`sink`]: the optional log side-channel
//! - [`error`]: the unified error type

pub mod constants;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod mapping;
pub mod params;
pub mod sink;
pub mod types;

pub use error::{Error, Result};
pub use frame::{as_rgb, validate_frame};
pub use geometry::Point;
pub use mapping::DisplayMapping;
pub use params::{ParameterSource, StaticParameters};
pub use sink::{LogSink, TracingLogSink};
pub use types::{CameraId, MouseButton, PointerEvent, PointerEventKind, PointerPosition, SurfaceSize, ViewId};
