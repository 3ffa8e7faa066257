use std::sync::Arc;

use camgauge_core::{
    CameraId, Error, MouseButton, PointerEvent, PointerEventKind, SurfaceSize, ViewId, Point,
};
use camgauge_measure::coordinator::DrawingCoordinator;
use camgauge_measure::model::DrawingKind;
use camgauge_measure::renderer::RenderedFrame;
use image::{DynamicImage, GrayImage, RgbImage};
use parking_lot::Mutex;

const CAM_A: CameraId = CameraId(1);
const CAM_B: CameraId = CameraId(2);
const MAIN_A: ViewId = ViewId(1);
const TAB_A: ViewId = ViewId(2);
const MAIN_B: ViewId = ViewId(3);

fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

fn frame(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::new(w, h))
}

fn coordinator() -> DrawingCoordinator {
    let mut c = DrawingCoordinator::new();
    c.register_view(MAIN_A, CAM_A);
    c.register_view(TAB_A, CAM_A);
    c.register_view(MAIN_B, CAM_B);
    c.submit_frame(CAM_A, &frame(200, 200)).unwrap();
    c.submit_frame(CAM_B, &frame(200, 200)).unwrap();
    c
}

fn draw_segment(c: &mut DrawingCoordinator, view: ViewId, from: Point, to: Point) {
    c.set_tool(view, Some(DrawingKind::LineSegment)).unwrap();
    c.on_pointer(view, PointerEvent::press(from)).unwrap();
    c.on_pointer(view, PointerEvent::release(to)).unwrap();
}

#[test]
fn test_views_of_one_camera_share_drawings() {
    let mut c = coordinator();
    draw_segment(&mut c, MAIN_A, p(10, 10), p(100, 10));

    let tab = c.render_view(TAB_A).unwrap();
    assert_eq!(tab.label_texts(), vec!["90.0px"]);
    let other = c.render_view(MAIN_B).unwrap();
    assert!(other.labels.is_empty());
    assert!(Arc::ptr_eq(&c.layer(CAM_A).unwrap(), c.manager(TAB_A).unwrap().layer()));
}

#[test]
fn test_image_positions_are_clamped_into_the_frame() {
    let mut c = coordinator();
    draw_segment(&mut c, MAIN_A, p(-500, 5000), p(i32::MAX, i32::MIN));

    let layer = c.layer(CAM_A).unwrap();
    let objs = layer.lock().drawing_objects().to_vec();
    assert_eq!(objs.len(), 1);
    assert_eq!(objs[0].points, vec![p(0, 199), p(199, 0)]);
}

#[test]
fn test_press_on_sibling_view_takes_over_open_gesture() {
    let mut c = coordinator();
    c.set_tool(MAIN_A, Some(DrawingKind::Line)).unwrap();
    c.set_tool(TAB_A, Some(DrawingKind::LineSegment)).unwrap();
    c.on_pointer(MAIN_A, PointerEvent::press(p(10, 10))).unwrap();
    c.on_pointer(TAB_A, PointerEvent::press(p(20, 50))).unwrap();

    assert!(c.on_pointer(MAIN_A, PointerEvent::moved(p(90, 90))).unwrap().is_none());
    assert!(!c.manager(MAIN_A).unwrap().is_drawing());

    c.on_pointer(TAB_A, PointerEvent::release(p(120, 50))).unwrap();
    let layer = c.layer(CAM_A).unwrap();
    let objs = layer.lock().drawing_objects().to_vec();
    assert_eq!(objs.len(), 1);
    assert_eq!(objs[0].kind, DrawingKind::LineSegment);
}

#[test]
fn test_changes_are_presented_on_every_view_of_the_camera() {
    let presented: Arc<Mutex<Vec<ViewId>>> = Arc::default();
    let sink = presented.clone();
    let mut c = coordinator();
    c.set_display_sink(Box::new(move |view: ViewId, _: &RenderedFrame| {
        sink.lock().push(view);
    }));

    c.set_tool(MAIN_A, Some(DrawingKind::Point)).unwrap();
    presented.lock().clear();
    c.on_pointer(MAIN_A, PointerEvent::press(p(50, 50))).unwrap();

    let seen = presented.lock().clone();
    assert_eq!(seen, vec![MAIN_A, TAB_A]);
}

#[test]
fn test_widget_positions_are_mapped() {
    let mut c = DrawingCoordinator::new();
    c.register_view(MAIN_A, CAM_A);
    c.submit_frame(CAM_A, &frame(200, 100)).unwrap();
    c.set_tool(MAIN_A, Some(DrawingKind::Point)).unwrap();

    let event = PointerEvent::at_widget(
        PointerEventKind::Press,
        MouseButton::Primary,
        20.0,
        120.0,
        SurfaceSize::new(400.0, 400.0),
    );
    c.on_pointer(MAIN_A, event).unwrap();

    let layer = c.layer(CAM_A).unwrap();
    let layer = layer.lock();
    assert_eq!(layer.drawing_objects()[0].points, vec![p(10, 10)]);
}

#[test]
fn test_gray_frames_are_accepted() {
    let mut c = DrawingCoordinator::new();
    c.register_view(MAIN_A, CAM_A);
    c.submit_frame(CAM_A, &DynamicImage::ImageLuma8(GrayImage::new(64, 48)))
        .unwrap();
    let rendered = c.render_view(MAIN_A).unwrap();
    assert_eq!(rendered.image.dimensions(), (64, 48));
}

#[test]
fn test_lookup_errors() {
    let mut c = coordinator();
    let err = c.on_pointer(ViewId(99), PointerEvent::press(p(1, 1))).unwrap_err();
    assert!(matches!(err, Error::UnknownView(ViewId(99))));
    assert!(c.submit_frame(CameraId(42), &frame(10, 10)).unwrap_err().is_lookup_error());
    assert!(c.set_tool(ViewId(99), None).is_err());
}

#[test]
fn test_pointer_without_frame_is_rejected() {
    let mut c = DrawingCoordinator::new();
    c.register_view(MAIN_A, CAM_A);
    c.set_tool(MAIN_A, Some(DrawingKind::Point)).unwrap();
    let err = c.on_pointer(MAIN_A, PointerEvent::press(p(1, 1))).unwrap_err();
    assert!(matches!(err, Error::InvalidFrame { .. }));
}

#[test]
fn test_empty_frame_is_rejected() {
    let mut c = coordinator();
    assert!(matches!(
        c.submit_frame(CAM_A, &frame(0, 0)),
        Err(Error::InvalidFrame { .. })
    ));
}

#[test]
fn test_operations_are_reported_to_log_sink() {
    let messages: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = messages.clone();
    let mut c = coordinator();
    c.set_log_sink(Arc::new(move |msg: &str| sink.lock().push(msg.to_string())));

    draw_segment(&mut c, TAB_A, p(10, 10), p(100, 10));
    assert!(c.undo_last_drawing(TAB_A).unwrap());
    assert!(!c.undo_last_detection(TAB_A).unwrap());
    c.clear(TAB_A).unwrap();

    let messages = messages.lock();
    assert_eq!(
        *messages,
        vec![
            "Undid last drawing on view-2".to_string(),
            "Cleared drawings on view-2".to_string(),
        ]
    );
}

#[test]
fn test_render_cache_follows_revision() {
    let mut c = coordinator();
    draw_segment(&mut c, MAIN_A, p(10, 10), p(100, 10));
    let before = c.render_view(MAIN_A).unwrap();
    assert_eq!(c.render_view(MAIN_A).unwrap(), before);

    assert!(c.undo_last_drawing(MAIN_A).unwrap());
    let after = c.render_view(MAIN_A).unwrap();
    assert!(after.labels.is_empty());
    assert_ne!(after.image, before.image);
}

#[test]
fn test_new_frame_invalidates_cache() {
    let mut c = coordinator();
    let dark = c.render_view(MAIN_B).unwrap();
    let bright = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 200, image::Rgb([200, 200, 200])));
    c.submit_frame(CAM_B, &bright).unwrap();
    let lit = c.render_view(MAIN_B).unwrap();
    assert_ne!(dark.image, lit.image);
}

#[test]
fn test_cancel_through_coordinator() {
    let mut c = coordinator();
    c.set_tool(MAIN_A, Some(DrawingKind::Circle)).unwrap();
    c.on_pointer(MAIN_A, PointerEvent::press(p(50, 50))).unwrap();
    c.on_pointer(MAIN_A, PointerEvent::moved(p(80, 50))).unwrap();
    assert!(c.layer(CAM_A).unwrap().lock().current_object().is_some());

    let rendered = c
        .on_pointer(MAIN_A, PointerEvent::secondary_press(p(80, 50)))
        .unwrap();
    assert!(rendered.is_some());
    assert!(c.layer(CAM_A).unwrap().lock().current_object().is_none());
    assert_eq!(c.manager(MAIN_A).unwrap().draw_mode(), Some(DrawingKind::Circle));
}

#[test]
fn test_delete_selected_on_shared_layer() {
    let mut c = coordinator();
    draw_segment(&mut c, MAIN_A, p(10, 100), p(190, 100));
    c.set_tool(TAB_A, None).unwrap();
    c.on_pointer(TAB_A, PointerEvent::secondary_press(p(100, 102)))
        .unwrap();
    assert_eq!(c.delete_selected(TAB_A).unwrap(), 1);
    assert!(c.render_view(MAIN_A).unwrap().labels.is_empty());
}

#[test]
fn test_clear_detections_keeps_manual_drawings() {
    let mut c = coordinator();
    draw_segment(&mut c, MAIN_A, p(10, 10), p(100, 10));
    c.set_tool(MAIN_A, Some(DrawingKind::LineDetect)).unwrap();
    c.on_pointer(MAIN_A, PointerEvent::press(p(0, 0))).unwrap();
    c.on_pointer(MAIN_A, PointerEvent::release(p(5, 5))).unwrap();

    assert_eq!(c.clear_detections(MAIN_A).unwrap(), 1);
    assert_eq!(c.layer(CAM_A).unwrap().lock().drawing_objects().len(), 1);
}

#[test]
fn test_views_of_lists_registered_views() {
    let mut c = coordinator();
    assert_eq!(c.views_of(CAM_A), vec![MAIN_A, TAB_A]);
    assert!(c.unregister_view(TAB_A));
    assert_eq!(c.views_of(CAM_A), vec![MAIN_A]);
    assert!(!c.unregister_view(TAB_A));
}
