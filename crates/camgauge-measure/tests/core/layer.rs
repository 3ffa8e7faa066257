use camgauge_core::Point;
use camgauge_measure::layer::LayerManager;
use camgauge_measure::model::{DrawingKind, Origin, Properties};

fn commit(layer: &mut LayerManager, kind: DrawingKind, points: &[(i32, i32)]) -> u64 {
    layer.start(kind, Properties::default());
    for &(x, y) in points {
        layer.update_current(Point::new(x, y));
    }
    layer.commit().unwrap()
}

#[test]
fn test_commit_moves_current_into_list() {
    let mut layer = LayerManager::new();
    let id = layer.start(DrawingKind::LineSegment, Properties::default());
    assert!(layer.update_current(Point::new(1, 2)));
    assert!(layer.update_current(Point::new(3, 4)));
    assert!(layer.drawing_objects().is_empty());

    assert_eq!(layer.commit(), Some(id));
    assert!(layer.current_object().is_none());
    assert_eq!(layer.drawing_objects().len(), 1);
    assert_eq!(layer.drawing_objects()[0].points.len(), 2);
    assert_eq!(layer.commit(), None);
}

#[test]
fn test_update_without_current_is_rejected() {
    let mut layer = LayerManager::new();
    assert!(!layer.update_current(Point::new(1, 1)));
    assert!(!layer.set_current_point(0, Point::new(1, 1)));
}

#[test]
fn test_undo_histories_are_isolated() {
    let mut layer = LayerManager::new();
    let manual_a = commit(&mut layer, DrawingKind::Line, &[(0, 0), (10, 0)]);
    let detected = commit(&mut layer, DrawingKind::LineDetect, &[(0, 0), (10, 10)]);
    let manual_b = commit(&mut layer, DrawingKind::Circle, &[(5, 5), (9, 5)]);

    assert!(layer.undo_last_detection());
    let ids: Vec<u64> = layer.drawing_objects().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![manual_a, manual_b]);
    assert!(!layer.undo_last_detection());

    commit(&mut layer, DrawingKind::LineDetect, &[(0, 0), (10, 10)]);
    assert!(layer.undo_last_drawing());
    assert!(layer.undo_last_drawing());
    assert!(!layer.undo_last_drawing());
    assert_eq!(layer.drawing_objects().len(), 1);
    assert_eq!(layer.drawing_objects()[0].origin, Origin::Detected);
    assert_ne!(layer.drawing_objects()[0].id, detected);
}

#[test]
fn test_undo_leaves_current_object_alone() {
    let mut layer = LayerManager::new();
    commit(&mut layer, DrawingKind::Line, &[(0, 0), (10, 0)]);
    layer.start(DrawingKind::Circle, Properties::default());
    assert!(layer.undo_last_drawing());
    assert!(layer.current_object().is_some());
}

#[test]
fn test_clear_drops_everything() {
    let mut layer = LayerManager::new();
    commit(&mut layer, DrawingKind::Line, &[(0, 0), (10, 0)]);
    layer.start(DrawingKind::Circle, Properties::default());
    layer.clear();
    assert!(layer.drawing_objects().is_empty());
    assert!(layer.current_object().is_none());
}

#[test]
fn test_clear_detections_keeps_manual() {
    let mut layer = LayerManager::new();
    commit(&mut layer, DrawingKind::LineDetect, &[(0, 0), (10, 10)]);
    commit(&mut layer, DrawingKind::Line, &[(0, 0), (10, 0)]);
    commit(&mut layer, DrawingKind::CircleDetect, &[(0, 0), (10, 10)]);
    assert_eq!(layer.clear_detections(), 2);
    assert_eq!(layer.drawing_objects().len(), 1);
    assert_eq!(layer.drawing_objects()[0].kind, DrawingKind::Line);
}

#[test]
fn test_select_picks_topmost_and_deletes() {
    let mut layer = LayerManager::new();
    commit(&mut layer, DrawingKind::Line, &[(0, 50), (100, 50)]);
    let top = commit(&mut layer, DrawingKind::LineSegment, &[(0, 52), (100, 52)]);

    assert_eq!(layer.select_at(Point::new(50, 51), 10.0), Some(top));
    assert_eq!(layer.selected_count(), 1);
    assert_eq!(layer.delete_selected(), 1);
    assert_eq!(layer.drawing_objects().len(), 1);
    assert_eq!(layer.drawing_objects()[0].kind, DrawingKind::Line);
}

#[test]
fn test_select_miss_clears_selection() {
    let mut layer = LayerManager::new();
    commit(&mut layer, DrawingKind::Point, &[(20, 20)]);
    assert!(layer.select_at(Point::new(20, 20), 10.0).is_some());
    assert_eq!(layer.select_at(Point::new(300, 300), 10.0), None);
    assert_eq!(layer.selected_count(), 0);
    assert_eq!(layer.delete_selected(), 0);
}

#[test]
fn test_hidden_objects_are_not_hit() {
    let mut layer = LayerManager::new();
    commit(&mut layer, DrawingKind::Point, &[(20, 20)]);
    layer.start(DrawingKind::Point, Properties::default());
    layer.update_current(Point::new(20, 20));
    layer.current_object_mut().unwrap().visible = false;
    layer.commit();
    let hit = layer.hit_test(Point::new(20, 20), 5.0).unwrap();
    assert!(hit.visible);
}

#[test]
fn test_revision_tracks_mutations() {
    let mut layer = LayerManager::new();
    let r0 = layer.revision();
    commit(&mut layer, DrawingKind::Line, &[(0, 0), (10, 0)]);
    let r1 = layer.revision();
    assert!(r1 > r0);

    assert!(!layer.undo_last_detection());
    assert_eq!(layer.revision(), r1);
    assert!(layer.current_object_mut().is_none());
    assert_eq!(layer.revision(), r1);

    assert!(layer.undo_last_drawing());
    assert!(layer.revision() > r1);
}
