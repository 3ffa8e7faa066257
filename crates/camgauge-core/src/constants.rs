//! Shared numeric constants.

/// Determinant magnitude below which two lines are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// Dash and gap length (pixels) for in-progress and auxiliary lines.
pub const DASH_LENGTH: f32 = 10.0;

/// Padding (pixels) between label text and its background box.
pub const LABEL_PADDING: i32 = 6;

/// Default label font size in pixels.
pub const LABEL_FONT_SIZE: f32 = 24.0;

/// Radius of the filled dot marking anchors and endpoints.
pub const ANCHOR_DOT_RADIUS: f64 = 4.0;

/// Radius of the hollow circle drawn as a degree sign.
pub const DEGREE_GLYPH_RADIUS: f64 = 4.0;

/// Default marker radius for single-point measurements.
pub const POINT_MARKER_RADIUS: u32 = 10;

/// Hit-test tolerance (pixels) used for selection.
pub const HIT_TOLERANCE: f64 = 10.0;

/// Offset (pixels) between an anchor and the label placed next to it.
pub const LABEL_OFFSET: i32 = 20;
