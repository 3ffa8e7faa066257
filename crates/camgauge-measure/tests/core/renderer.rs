use camgauge_core::Point;
use camgauge_measure::model::{Color, DrawingKind, DrawingObject, Properties};
use camgauge_measure::renderer::{render_frame, RenderStyle, Renderer};
use image::{Rgb, RgbImage};

fn object(id: u64, kind: DrawingKind, points: &[(i32, i32)]) -> DrawingObject {
    let mut obj = DrawingObject::new(id, kind, Properties::default());
    obj.points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    obj
}

fn blank(w: u32, h: u32) -> RgbImage {
    RgbImage::new(w, h)
}

#[test]
fn test_rendering_is_deterministic() {
    let base = blank(200, 150);
    let objs = vec![
        object(1, DrawingKind::Line, &[(10, 10), (150, 90)]),
        object(2, DrawingKind::Circle, &[(100, 75), (130, 75)]),
        object(3, DrawingKind::Parallel, &[(0, 20), (200, 30), (50, 100)]),
        object(4, DrawingKind::TwoLines, &[(0, 0), (200, 150), (0, 150), (200, 0)]),
    ];
    let first = render_frame(&base, &objs, None);
    let second = render_frame(&base, &objs, None);
    assert_eq!(first.image, second.image);
    assert_eq!(first.labels, second.labels);
}

#[test]
fn test_base_frame_is_not_modified() {
    let base = blank(100, 100);
    let objs = vec![object(1, DrawingKind::LineSegment, &[(10, 50), (90, 50)])];
    let rendered = render_frame(&base, &objs, None);
    assert!(base.pixels().all(|px| px.0 == [0, 0, 0]));
    assert_ne!(rendered.image, base);
}

#[test]
fn test_committed_segment_is_solid() {
    let base = blank(100, 100);
    let objs = vec![object(1, DrawingKind::LineSegment, &[(10, 50), (90, 50)])];
    let rendered = render_frame(&base, &objs, None);
    for x in [15, 25, 45, 75] {
        assert_eq!(rendered.image.get_pixel(x, 50), &Rgb([0, 255, 0]), "x = {x}");
    }
}

#[test]
fn test_in_progress_segment_is_dashed() {
    let base = blank(100, 100);
    let current = object(1, DrawingKind::LineSegment, &[(10, 50), (90, 50)]);
    let rendered = render_frame(&base, &[], Some(&current));
    assert_eq!(rendered.image.get_pixel(15, 50), &Rgb([0, 255, 0]));
    assert_eq!(rendered.image.get_pixel(25, 50), &Rgb([0, 0, 0]));
}

#[test]
fn test_hidden_objects_are_skipped() {
    let base = blank(100, 100);
    let mut obj = object(1, DrawingKind::LineSegment, &[(10, 50), (90, 50)]);
    obj.visible = false;
    let rendered = render_frame(&base, &[obj], None);
    assert_eq!(rendered.image, base);
    assert!(rendered.labels.is_empty());
}

#[test]
fn test_selected_object_uses_selection_color() {
    let base = blank(100, 100);
    let mut obj = object(1, DrawingKind::LineSegment, &[(10, 50), (90, 50)]);
    obj.selected = true;
    let rendered = render_frame(&base, &[obj], None);
    assert_eq!(rendered.image.get_pixel(30, 50), &Rgb([255, 0, 0]));
}

#[test]
fn test_object_color_and_thickness() {
    let base = blank(100, 100);
    let mut obj = object(1, DrawingKind::LineSegment, &[(10, 50), (90, 50)]);
    obj.properties = Properties::new(Color::new(0, 0, 255), 6);
    let rendered = render_frame(&base, &[obj], None);
    assert_eq!(rendered.image.get_pixel(30, 52), &Rgb([0, 0, 255]));
    assert_eq!(rendered.image.get_pixel(30, 56), &Rgb([0, 0, 0]));
}

#[test]
fn test_line_angle_label() {
    let base = blank(200, 200);
    let rendered = render_frame(&base, &[object(1, DrawingKind::Line, &[(20, 120), (120, 20)])], None);
    assert_eq!(rendered.label_texts(), vec!["45.0"]);
    assert!(rendered.labels[0].degree_glyph);
}

#[test]
fn test_circle_labels_share_one_box() {
    let base = blank(200, 200);
    let rendered = render_frame(&base, &[object(7, DrawingKind::Circle, &[(50, 50), (80, 50)])], None);
    assert_eq!(rendered.label_texts(), vec!["(50, 50)", "R=30.0px"]);
    assert_eq!(rendered.labels[0].background, rendered.labels[1].background);
    assert!(rendered.labels.iter().all(|l| l.object_id == 7));
    assert!(rendered.labels[1].anchor.y > rendered.labels[0].anchor.y);
}

#[test]
fn test_two_lines_angle_label() {
    let base = blank(200, 200);
    let obj = object(1, DrawingKind::TwoLines, &[(10, 10), (110, 10), (10, 10), (110, 110)]);
    let rendered = render_frame(&base, &[obj], None);
    assert_eq!(rendered.label_texts(), vec!["45.0"]);
}

#[test]
fn test_parallel_lines_fall_back_without_intersection() {
    let base = blank(200, 200);
    let obj = object(1, DrawingKind::TwoLines, &[(0, 50), (100, 50), (0, 90), (100, 90)]);
    let rendered = render_frame(&base, &[obj], None);
    assert_eq!(rendered.label_texts(), vec!["0.0"]);
}

#[test]
fn test_degenerate_line_draws_no_label() {
    let base = blank(100, 100);
    let rendered = render_frame(&base, &[object(1, DrawingKind::Line, &[(40, 40), (40, 40)])], None);
    assert!(rendered.labels.is_empty());
}

#[test]
fn test_roi_is_a_solid_unlabelled_rectangle() {
    let base = blank(100, 100);
    let mut roi = object(1, DrawingKind::LineDetect, &[(10, 10), (60, 60)]);
    roi.properties.is_roi = true;
    let rendered = render_frame(&base, &[], Some(&roi));
    assert!(rendered.labels.is_empty());
    for x in 12..58 {
        assert_eq!(rendered.image.get_pixel(x, 10), &Rgb([0, 255, 0]), "x = {x}");
    }
    assert_eq!(rendered.image.get_pixel(35, 35), &Rgb([0, 0, 0]));
}

#[test]
fn test_missed_line_detection_draws_roi_diagonal_as_line() {
    let base = blank(200, 200);
    let resolved = object(1, DrawingKind::LineDetect, &[(20, 20), (60, 60)]);
    let rendered = render_frame(&base, &[resolved], None);
    assert_eq!(rendered.image.get_pixel(150, 150), &Rgb([0, 255, 0]));
    assert_eq!(rendered.image.get_pixel(40, 20), &Rgb([0, 0, 0]));
    assert_eq!(rendered.label_texts(), vec!["135.0"]);
}

#[test]
fn test_in_progress_parallel_reference_line_is_dashed() {
    let base = blank(200, 100);
    let parallel = object(1, DrawingKind::Parallel, &[(0, 50), (150, 50)]);
    let lit = |image: &RgbImage| (100..140).filter(|&x| image.get_pixel(x, 50).0 != [0, 0, 0]).count();

    let in_progress = render_frame(&base, &[], Some(&parallel));
    let lit_in_progress = lit(&in_progress.image);
    assert!(lit_in_progress > 0 && lit_in_progress < 40, "lit = {lit_in_progress}");

    let committed = render_frame(&base, &[parallel], None);
    assert_eq!(lit(&committed.image), 40);
}

#[test]
fn test_detected_circle_is_labelled() {
    let base = blank(200, 200);
    let mut obj = object(1, DrawingKind::CircleDetect, &[(100, 100), (125, 100)]);
    obj.properties.circle_detected = true;
    let rendered = render_frame(&base, &[obj], None);
    assert_eq!(rendered.label_texts(), vec!["(100, 100)", "R=25.0px"]);
}

#[test]
fn test_label_box_stays_inside_frame() {
    let base = blank(200, 100);
    let rendered = render_frame(&base, &[object(1, DrawingKind::Point, &[(195, 3)])], None);
    let bg = rendered.labels[0].background;
    assert!(bg.x >= 0.0 && bg.y >= 0.0);
    assert!(bg.x + bg.width <= 200.0);
}

#[test]
fn test_label_background_color() {
    let base = RgbImage::from_pixel(200, 200, Rgb([128, 128, 128]));
    let style = RenderStyle {
        label_background: Color::WHITE,
        ..RenderStyle::default()
    };
    let rendered = Renderer::new(style).render(
        &base,
        &[object(1, DrawingKind::Point, &[(100, 100)])],
        None,
    );
    let bg = rendered.labels[0].background;
    // Top-left corner of the box lies inside the padding, away from glyphs.
    let px = rendered.image.get_pixel(bg.x as u32 + 1, bg.y as u32 + 1);
    assert_eq!(px, &Rgb([255, 255, 255]));
}

#[test]
fn test_label_text_is_drawn_with_bundled_font() {
    let base = blank(200, 200);
    let rendered = render_frame(&base, &[object(1, DrawingKind::Line, &[(20, 120), (120, 20)])], None);
    let bg = rendered.labels[0].background;
    let (x0, y0) = (bg.x as u32 + 6, bg.y as u32 + 6);
    // First glyph only, left of the degree mark.
    let glyph_pixels = (x0..x0 + 12)
        .flat_map(|x| (y0..(bg.y + bg.height) as u32 - 6).map(move |y| (x, y)))
        .filter(|&(x, y)| rendered.image.get_pixel(x, y).0[1] > 0)
        .count();
    assert!(glyph_pixels > 10, "glyph pixels = {glyph_pixels}");
}

#[test]
fn test_unknown_font_family_falls_back_to_bundled_font() {
    let base = blank(200, 200);
    let objs = [object(1, DrawingKind::Circle, &[(60, 60), (90, 60)])];
    let style = RenderStyle {
        font_family: Some("No Such Family 9f3c".to_string()),
        ..RenderStyle::default()
    };
    let overridden = Renderer::new(style).render(&base, &objs, None);
    let bundled = render_frame(&base, &objs, None);
    assert_eq!(overridden.image, bundled.image);
    assert_eq!(overridden.labels, bundled.labels);
}
