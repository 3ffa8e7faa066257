//! Per-camera drawing store with separate manual and detection histories.

use std::sync::Arc;

use parking_lot::Mutex;

use camgauge_core::geometry::Point;

use crate::model::{DrawingKind, DrawingObject, Origin, Properties};

/// Handle to a camera's layer store, shared by every view of that camera.
pub type SharedLayer = Arc<Mutex<LayerManager>>;

/// Owns the committed drawing objects of one camera plus the single
/// in-progress object.
///
/// `LayerManager` is responsible for:
/// - Holding committed objects in insertion order, which is also z-order
/// - Holding at most one uncommitted `current_object`
/// - Undoing the most recent manual or detection object independently
/// - Point-based selection and deletion of the selected object
///
/// # Revision
///
/// Every mutation that can change the rendered output bumps a monotonic
/// revision counter. Callers cache rendered frames against it.
#[derive(Debug, Default)]
pub struct LayerManager {
    drawing_objects: Vec<DrawingObject>,
    current_object: Option<DrawingObject>,
    next_id: u64,
    revision: u64,
}

impl LayerManager {
    /// Creates an empty store.
    ///
    /// # Examples
    ///
    /// ```
    /// use camgauge_measure::layer::LayerManager;
    ///
    /// let layer = LayerManager::new();
    /// assert!(layer.drawing_objects().is_empty());
    /// assert!(layer.current_object().is_none());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a new store in a shareable handle.
    pub fn shared() -> SharedLayer {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Committed objects in z-order.
    pub fn drawing_objects(&self) -> &[DrawingObject] {
        &self.drawing_objects
    }

    /// The object being drawn, if any.
    pub fn current_object(&self) -> Option<&DrawingObject> {
        self.current_object.as_ref()
    }

    /// Mutable access to the in-progress object; counts as a change.
    pub fn current_object_mut(&mut self) -> Option<&mut DrawingObject> {
        if self.current_object.is_some() {
            self.bump();
        }
        self.current_object.as_mut()
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Starts a new in-progress object, replacing any previous one.
    ///
    /// # Returns
    ///
    /// The id assigned to the new object.
    pub fn start(&mut self, kind: DrawingKind, properties: Properties) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        if let Some(old) = self.current_object.take() {
            tracing::debug!("Discarding unfinished {} #{}", old.kind, old.id);
        }
        self.current_object = Some(DrawingObject::new(id, kind, properties));
        self.bump();
        id
    }

    /// Places a control point on the in-progress object.
    ///
    /// # Arguments
    ///
    /// * `index` - Appends when equal to the current point count, replaces
    ///   an existing point when smaller
    /// * `point` - Image-space position
    ///
    /// # Returns
    ///
    /// `false` when there is no in-progress object or `index` would leave a
    /// hole in the point list.
    pub fn set_current_point(&mut self, index: usize, point: Point) -> bool {
        let Some(current) = self.current_object.as_mut() else {
            return false;
        };
        let placed = current.set_point(index, point);
        if placed {
            self.bump();
        }
        placed
    }

    /// Appends a point to the in-progress object.
    pub fn update_current(&mut self, point: Point) -> bool {
        let len = self.current_object.as_ref().map_or(0, |c| c.points.len());
        self.set_current_point(len, point)
    }

    /// Moves the in-progress object into the committed list.
    ///
    /// The object's origin is set from its kind. Returns the committed id.
    pub fn commit(&mut self) -> Option<u64> {
        let mut obj = self.current_object.take()?;
        obj.origin = obj.kind.origin();
        let id = obj.id;
        tracing::info!(
            "Committed {} #{} with {} points",
            obj.kind,
            obj.id,
            obj.points.len()
        );
        self.drawing_objects.push(obj);
        self.bump();
        Some(id)
    }

    /// Drops the in-progress object. Returns whether one existed.
    pub fn discard_current(&mut self) -> bool {
        let existed = self.current_object.take().is_some();
        if existed {
            self.bump();
        }
        existed
    }

    fn undo_last(&mut self, origin: Origin) -> bool {
        let Some(pos) = self.drawing_objects.iter().rposition(|o| o.origin == origin) else {
            return false;
        };
        let removed = self.drawing_objects.remove(pos);
        tracing::info!("Undo removed {} #{}", removed.kind, removed.id);
        self.bump();
        true
    }

    /// Removes the most recently committed manual object.
    ///
    /// Detection objects are untouched. Returns `false` when there is none.
    pub fn undo_last_drawing(&mut self) -> bool {
        self.undo_last(Origin::Manual)
    }

    /// Removes the most recently committed detection object.
    ///
    /// Manual objects are untouched. Returns `false` when there is none.
    pub fn undo_last_detection(&mut self) -> bool {
        self.undo_last(Origin::Detected)
    }

    /// Removes every object, committed or in progress.
    pub fn clear(&mut self) {
        self.drawing_objects.clear();
        self.current_object = None;
        self.bump();
    }

    /// Removes every detection object, keeping manual ones.
    ///
    /// # Returns
    ///
    /// Number of objects removed.
    pub fn clear_detections(&mut self) -> usize {
        let before = self.drawing_objects.len();
        self.drawing_objects.retain(|o| o.origin != Origin::Detected);
        let removed = before - self.drawing_objects.len();
        if removed > 0 {
            self.bump();
        }
        removed
    }

    /// Topmost visible committed object under `point`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<&DrawingObject> {
        self.drawing_objects
            .iter()
            .rev()
            .find(|o| o.visible && o.contains_point(point, tolerance))
    }

    /// Selects the topmost object under `point` and deselects all others.
    ///
    /// # Returns
    ///
    /// The id of the selected object, or `None` when nothing was hit (the
    /// selection is cleared either way).
    pub fn select_at(&mut self, point: Point, tolerance: f64) -> Option<u64> {
        let hit = self.hit_test(point, tolerance).map(|o| o.id);
        for obj in &mut self.drawing_objects {
            obj.selected = Some(obj.id) == hit;
        }
        self.bump();
        hit
    }

    /// Deselects every object.
    pub fn clear_selection(&mut self) {
        for obj in &mut self.drawing_objects {
            obj.selected = false;
        }
        self.bump();
    }

    pub fn selected_count(&self) -> usize {
        self.drawing_objects.iter().filter(|o| o.selected).count()
    }

    /// Removes the selected objects.
    ///
    /// # Returns
    ///
    /// Number of objects removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.drawing_objects.len();
        self.drawing_objects.retain(|o| !o.selected);
        let removed = before - self.drawing_objects.len();
        if removed > 0 {
            tracing::info!("Deleted {} selected object(s)", removed);
            self.bump();
        }
        removed
    }
}
