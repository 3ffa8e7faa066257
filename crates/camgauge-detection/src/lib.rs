//! # CamGauge Detection
//!
//! Line and circle detection inside a user-selected region of interest.
//!
//! Both entry points share one pipeline: crop the rectangle spanned by two
//! corners, convert it to intensity, run Canny, then a Hough transform, and
//! translate the best result back into frame coordinates. A miss is not an
//! error; callers get `None` and keep the region as drawn.

pub mod edges;
pub mod hough_circles;
pub mod hough_lines;
pub mod params;
pub mod roi;

use image::RgbImage;

use camgauge_core::Point;

pub use hough_circles::{hough_circles, DetectedCircle};
pub use hough_lines::{longest_segment, probabilistic_hough, LineSegment};
pub use params::{CircleDetectionParams, LineDetectionParams};
pub use roi::RoiRect;

/// Finds the longest line segment inside the rectangle spanned by
/// `roi_p1` and `roi_p2`, returned as frame-coordinate endpoints.
pub fn detect_line_in_roi(
    frame: &RgbImage,
    roi_p1: Point,
    roi_p2: Point,
    params: &LineDetectionParams,
) -> Option<(Point, Point)> {
    let (width, height) = frame.dimensions();
    let Some(roi) = RoiRect::from_corners(roi_p1, roi_p2, width, height) else {
        tracing::debug!("Line detection skipped: empty ROI {} {}", roi_p1, roi_p2);
        return None;
    };

    let gray = roi::crop_gray(frame, &roi);
    let edge_map = edges::canny_edges(&gray, params.canny_low, params.canny_high);
    let segments = probabilistic_hough(
        &edge_map,
        params.threshold,
        params.min_line_length,
        params.max_line_gap,
    );
    let best = longest_segment(&segments)?;

    let start = roi.to_frame(best.start);
    let end = roi.to_frame(best.end);
    tracing::debug!(
        "Line detected in ROI {:?}: {} -> {} ({} candidates)",
        roi,
        start,
        end,
        segments.len()
    );
    Some((start, end))
}

/// Finds the strongest circle inside the rectangle spanned by `roi_p1` and
/// `roi_p2`, returned as a frame-coordinate center and a radius in pixels.
pub fn detect_circle_in_roi(
    frame: &RgbImage,
    roi_p1: Point,
    roi_p2: Point,
    params: &CircleDetectionParams,
) -> Option<(Point, f64)> {
    let (width, height) = frame.dimensions();
    let Some(roi) = RoiRect::from_corners(roi_p1, roi_p2, width, height) else {
        tracing::debug!("Circle detection skipped: empty ROI {} {}", roi_p1, roi_p2);
        return None;
    };

    let gray = roi::crop_gray(frame, &roi);
    let edge_map = edges::canny_edges(&gray, params.canny_low, params.canny_high);
    let circles = hough_circles(&gray, &edge_map, params);
    let best = circles.first()?;

    let center = roi.to_frame(best.center);
    tracing::debug!(
        "Circle detected in ROI {:?}: center {} radius {:.1} ({} votes)",
        roi,
        center,
        best.radius,
        best.votes
    );
    Some((center, best.radius))
}
