//! Key-based numeric parameter lookup.
//!
//! The settings store owns persistence; detection only ever asks for a
//! named integer and substitutes its own default when the key is missing.

use std::collections::HashMap;

/// Canny low threshold for line detection.
pub const CANNY_LINE_LOW: &str = "CannyLineLow";
/// Canny high threshold for line detection.
pub const CANNY_LINE_HIGH: &str = "CannyLineHigh";
/// Hough accumulator threshold for line detection.
pub const LINE_DET_THRESHOLD: &str = "LineDetThreshold";
/// Minimum accepted segment length.
pub const LINE_DET_MIN_LENGTH: &str = "LineDetMinLength";
/// Maximum gap bridged inside one segment.
pub const LINE_DET_MAX_GAP: &str = "LineDetMaxGap";
/// Canny low threshold for circle detection.
pub const CANNY_CIRCLE_LOW: &str = "CannyCircleLow";
/// Canny high threshold for circle detection.
pub const CANNY_CIRCLE_HIGH: &str = "CannyCircleHigh";
/// Center accumulator threshold for circle detection.
pub const CIRCLE_DET_PARAM2: &str = "CircleDetParam2";
/// Minimum distance between detected circle centers.
pub const CIRCLE_DET_MIN_DIST: &str = "CircleDetMinDist";
/// Smallest radius searched.
pub const CIRCLE_DET_MIN_RADIUS: &str = "CircleDetMinRadius";
/// Largest radius searched.
pub const CIRCLE_DET_MAX_RADIUS: &str = "CircleDetMaxRadius";

/// Every key the detection stage reads.
pub const DETECTION_KEYS: [&str; 11] = [
    CANNY_LINE_LOW,
    CANNY_LINE_HIGH,
    LINE_DET_THRESHOLD,
    LINE_DET_MIN_LENGTH,
    LINE_DET_MAX_GAP,
    CANNY_CIRCLE_LOW,
    CANNY_CIRCLE_HIGH,
    CIRCLE_DET_PARAM2,
    CIRCLE_DET_MIN_DIST,
    CIRCLE_DET_MIN_RADIUS,
    CIRCLE_DET_MAX_RADIUS,
];

/// Supplies named integer parameters.
pub trait ParameterSource {
    /// Returns the value for `key`, or `None` when it is not configured.
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Returns the value for `key`, or `default` when it is not configured.
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }
}

/// In-memory parameter map, handy for tests and scripted runs.
#[derive(Debug, Clone, Default)]
pub struct StaticParameters {
    values: HashMap<String, i64>,
}

impl StaticParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}

impl ParameterSource for StaticParameters {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }
}

impl ParameterSource for HashMap<String, i64> {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).copied()
    }
}
