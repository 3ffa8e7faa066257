use camgauge_core::Point;
use camgauge_measure::model::{Color, DrawingKind, DrawingObject, Origin, Properties};

fn object(kind: DrawingKind, points: &[(i32, i32)]) -> DrawingObject {
    let mut obj = DrawingObject::new(1, kind, Properties::default());
    obj.points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    obj
}

#[test]
fn test_detection_kinds_have_detected_origin() {
    for kind in DrawingKind::ALL {
        let expected = if kind.is_detection() {
            Origin::Detected
        } else {
            Origin::Manual
        };
        assert_eq!(DrawingObject::new(1, kind, Properties::default()).origin, expected);
    }
}

#[test]
fn test_stage_counts() {
    assert_eq!(DrawingKind::Parallel.stages(), 2);
    assert_eq!(DrawingKind::TwoLines.stages(), 2);
    assert_eq!(DrawingKind::CircleLine.stages(), 2);
    assert_eq!(DrawingKind::LineSegment.stages(), 1);
    assert_eq!(DrawingKind::LineDetect.stages(), 1);
}

#[test]
fn test_default_properties() {
    let props = Properties::default();
    assert_eq!(props.color, Color::GREEN);
    assert_eq!(props.thickness(), 2);
    assert!(!props.is_roi);
    assert!(!props.line_detected);
}

#[test]
fn test_kind_serializes_snake_case() {
    let json = serde_json::to_string(&DrawingKind::CircleLine).unwrap();
    assert_eq!(json, "\"circle_line\"");
}

#[test]
fn test_point_hit_uses_marker_radius() {
    let obj = object(DrawingKind::Point, &[(50, 50)]);
    assert!(obj.contains_point(Point::new(65, 50), 10.0));
    assert!(!obj.contains_point(Point::new(75, 50), 10.0));
}

#[test]
fn test_line_hit_is_unbounded() {
    let obj = object(DrawingKind::Line, &[(0, 0), (10, 0)]);
    assert!(obj.hit(Point::new(500, 3)));
    assert!(!obj.hit(Point::new(500, 30)));
}

#[test]
fn test_circle_hit_on_rim_only() {
    let obj = object(DrawingKind::Circle, &[(50, 50), (80, 50)]);
    assert!(obj.hit(Point::new(50, 21)));
    assert!(!obj.hit(Point::new(50, 50)));
}

#[test]
fn test_roi_hit_on_outline() {
    let mut obj = object(DrawingKind::LineDetect, &[(10, 10), (90, 90)]);
    obj.properties.is_roi = true;
    assert!(obj.hit(Point::new(50, 12)));
    assert!(!obj.hit(Point::new(50, 50)));
}

#[test]
fn test_resolved_roi_hit_along_its_line() {
    // Missed detection: the ROI corners stand in for the line.
    let obj = object(DrawingKind::LineDetect, &[(10, 10), (90, 90)]);
    assert!(obj.hit(Point::new(50, 50)));
    assert!(obj.hit(Point::new(150, 152)));
    assert!(!obj.hit(Point::new(50, 12)));
}

#[test]
fn test_parallel_second_line_hit() {
    let obj = object(DrawingKind::Parallel, &[(0, 0), (100, 0), (0, 40)]);
    assert!(obj.hit(Point::new(300, 41)));
    assert!(!obj.hit(Point::new(300, 20)));
}

#[test]
fn test_incomplete_object_never_hit() {
    let obj = object(DrawingKind::TwoLines, &[(0, 0)]);
    assert!(!obj.hit(Point::new(0, 0)));
}
