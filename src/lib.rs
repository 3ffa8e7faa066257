//! # CamGauge
//!
//! Interactive measurement and annotation of live camera frames:
//! - Manual points, lines, circles, segments, parallels, line-circle and
//!   line-line measurements with live metric labels
//! - Line and circle detection inside user-drawn regions of interest
//! - Per-camera drawing stores shared by every view of a camera
//!
//! ## Architecture
//!
//! CamGauge is organized as a workspace with multiple crates:
//!
//! 1. **camgauge-core** - Points, geometry, coordinate mapping, events, errors
//! 2. **camgauge-detection** - Canny edges, Hough lines and circles in an ROI
//! 3. **camgauge-measure** - Drawing model, layer store, state machine, renderer
//! 4. **camgauge-settings** - Detection and display settings, JSON/TOML files
//! 5. **camgauge** - Logging setup, script replay and the command-line tool

pub mod replay;

pub use camgauge_core::{
    CameraId, DisplayMapping, Error, LogSink, MouseButton, ParameterSource, Point, PointerEvent,
    PointerEventKind, PointerPosition, Result, SurfaceSize, TracingLogSink, ViewId,
};
pub use camgauge_detection::{
    detect_circle_in_roi, detect_line_in_roi, CircleDetectionParams, LineDetectionParams,
};
pub use camgauge_measure::{
    render_frame, Color, DisplaySink, DrawingCoordinator, DrawingKind, DrawingObject,
    LayerManager, MeasurementManager, Properties, RenderStyle, RenderedFrame, TextLabel,
};
pub use camgauge_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, INFO by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    // Labels go to stdout, so diagnostics stay on stderr.
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
