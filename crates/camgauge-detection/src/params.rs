//! Detection parameters.
//!
//! Values come from a [`ParameterSource`] keyed by the settings names. A
//! missing key falls back to its default; out-of-range values are clamped
//! into the accepted range, and a Canny high threshold that does not exceed
//! the low threshold is raised to `low + 50`.

use serde::{Deserialize, Serialize};

use camgauge_core::params::{
    ParameterSource, CANNY_CIRCLE_HIGH, CANNY_CIRCLE_LOW, CANNY_LINE_HIGH, CANNY_LINE_LOW,
    CIRCLE_DET_MAX_RADIUS, CIRCLE_DET_MIN_DIST, CIRCLE_DET_MIN_RADIUS, CIRCLE_DET_PARAM2,
    LINE_DET_MAX_GAP, LINE_DET_MIN_LENGTH, LINE_DET_THRESHOLD,
};

/// Gap enforced between Canny thresholds when the configured pair is inverted.
const CANNY_THRESHOLD_GAP: u32 = 50;

fn canny_pair(source: &dyn ParameterSource, low_key: &str, high_key: &str) -> (f32, f32) {
    let low = source.get_int_or(low_key, 50).clamp(0, 255) as u32;
    let mut high = source.get_int_or(high_key, 150).clamp(0, 255) as u32;
    if high <= low {
        high = low + CANNY_THRESHOLD_GAP;
    }
    (low as f32, high as f32)
}

fn bounded(source: &dyn ParameterSource, key: &str, default: i64, min: i64, max: i64) -> u32 {
    source.get_int_or(key, default).clamp(min, max) as u32
}

/// Parameters of the Canny + probabilistic Hough line pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineDetectionParams {
    pub canny_low: f32,
    pub canny_high: f32,
    /// Minimum accumulator votes for a line.
    pub threshold: u32,
    /// Shortest segment accepted, measured along its dominant axis.
    pub min_line_length: u32,
    /// Largest run of missing edge pixels bridged inside one segment.
    pub max_line_gap: u32,
}

impl Default for LineDetectionParams {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            threshold: 50,
            min_line_length: 100,
            max_line_gap: 10,
        }
    }
}

impl LineDetectionParams {
    pub fn from_source(source: &dyn ParameterSource) -> Self {
        let (canny_low, canny_high) = canny_pair(source, CANNY_LINE_LOW, CANNY_LINE_HIGH);
        Self {
            canny_low,
            canny_high,
            threshold: bounded(source, LINE_DET_THRESHOLD, 50, 1, 1000),
            min_line_length: bounded(source, LINE_DET_MIN_LENGTH, 100, 1, 1000),
            max_line_gap: bounded(source, LINE_DET_MAX_GAP, 10, 0, 100),
        }
    }
}

/// Parameters of the Canny + Hough gradient circle pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleDetectionParams {
    pub canny_low: f32,
    pub canny_high: f32,
    /// Minimum center accumulator votes.
    pub param2: u32,
    /// Minimum distance between two accepted centers.
    pub min_dist: u32,
    pub min_radius: u32,
    pub max_radius: u32,
}

impl Default for CircleDetectionParams {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            param2: 30,
            min_dist: 20,
            min_radius: 10,
            max_radius: 100,
        }
    }
}

impl CircleDetectionParams {
    pub fn from_source(source: &dyn ParameterSource) -> Self {
        let (canny_low, canny_high) = canny_pair(source, CANNY_CIRCLE_LOW, CANNY_CIRCLE_HIGH);
        let min_radius = bounded(source, CIRCLE_DET_MIN_RADIUS, 10, 1, 4000);
        let mut max_radius = bounded(source, CIRCLE_DET_MAX_RADIUS, 100, 1, 4000);
        if max_radius < min_radius {
            max_radius = min_radius;
        }
        Self {
            canny_low,
            canny_high,
            param2: bounded(source, CIRCLE_DET_PARAM2, 30, 1, 200),
            min_dist: bounded(source, CIRCLE_DET_MIN_DIST, 20, 1, 4000),
            min_radius,
            max_radius,
        }
    }
}
