//! Multi-view dispatch.
//!
//! The coordinator owns one layer store per camera and one measurement
//! manager per view. Views of the same camera share the camera's store, so
//! a drawing made on one view appears on all of them without copying.
//!
//! Frames arrive per camera through [`DrawingCoordinator::submit_frame`];
//! pointer events arrive per view through [`DrawingCoordinator::on_pointer`].
//! Rendered frames go to the attached [`DisplaySink`], and user-visible
//! operations are described to the optional [`LogSink`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use image::{DynamicImage, RgbImage};

use camgauge_core::frame::{as_rgb, validate_frame};
use camgauge_core::{
    CameraId, DisplayMapping, Error, LogSink, MouseButton, ParameterSource, PointerEvent,
    PointerEventKind, PointerPosition, Result, ViewId,
};

use crate::layer::{LayerManager, SharedLayer};
use crate::measurement::MeasurementManager;
use crate::model::{DrawingKind, Properties};
use crate::renderer::{RenderStyle, RenderedFrame};

/// Receives annotated frames for on-screen presentation.
pub trait DisplaySink {
    fn present(&mut self, view: ViewId, frame: &RenderedFrame);
}

impl<F> DisplaySink for F
where
    F: FnMut(ViewId, &RenderedFrame),
{
    fn present(&mut self, view: ViewId, frame: &RenderedFrame) {
        self(view, frame)
    }
}

struct CameraSlot {
    layer: SharedLayer,
    frame: Option<RgbImage>,
    /// Bumped on every submitted frame.
    generation: u64,
}

struct CachedRender {
    revision: u64,
    generation: u64,
    frame: RenderedFrame,
}

struct ViewSlot {
    camera: CameraId,
    manager: MeasurementManager,
    cache: Option<CachedRender>,
}

/// Routes events and frames between views, cameras and sinks.
#[derive(Default)]
pub struct DrawingCoordinator {
    cameras: HashMap<CameraId, CameraSlot>,
    views: BTreeMap<ViewId, ViewSlot>,
    display: Option<Box<dyn DisplaySink>>,
    log: Option<Arc<dyn LogSink>>,
    style: RenderStyle,
    properties: Properties,
}

impl DrawingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_display_sink(&mut self, sink: Box<dyn DisplaySink>) {
        self.display = Some(sink);
    }

    pub fn set_log_sink(&mut self, sink: Arc<dyn LogSink>) {
        self.log = Some(sink);
    }

    fn note(&self, message: &str) {
        tracing::info!("{}", message);
        if let Some(log) = &self.log {
            log.log(message);
        }
    }

    /// Registers `view` as a display of `camera`, creating the camera's
    /// layer store on first use. Re-registering a view resets its tool.
    pub fn register_view(&mut self, view: ViewId, camera: CameraId) {
        let slot = self.cameras.entry(camera).or_insert_with(|| CameraSlot {
            layer: LayerManager::shared(),
            frame: None,
            generation: 0,
        });
        let mut manager = MeasurementManager::new(slot.layer.clone());
        manager.set_render_style(self.style.clone());
        manager.set_properties(self.properties);
        self.views.insert(
            view,
            ViewSlot {
                camera,
                manager,
                cache: None,
            },
        );
        tracing::debug!("Registered {} on {}", view, camera);
    }

    pub fn unregister_view(&mut self, view: ViewId) -> bool {
        self.views.remove(&view).is_some()
    }

    /// Views attached to `camera`, in id order.
    pub fn views_of(&self, camera: CameraId) -> Vec<ViewId> {
        self.views
            .iter()
            .filter(|(_, slot)| slot.camera == camera)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn camera_of(&self, view: ViewId) -> Result<CameraId> {
        self.views
            .get(&view)
            .map(|slot| slot.camera)
            .ok_or(Error::UnknownView(view))
    }

    /// The layer store shared by all views of `camera`.
    pub fn layer(&self, camera: CameraId) -> Result<SharedLayer> {
        self.cameras
            .get(&camera)
            .map(|slot| slot.layer.clone())
            .ok_or(Error::UnknownCamera(camera))
    }

    pub fn manager(&self, view: ViewId) -> Result<&MeasurementManager> {
        self.views
            .get(&view)
            .map(|slot| &slot.manager)
            .ok_or(Error::UnknownView(view))
    }

    pub fn manager_mut(&mut self, view: ViewId) -> Result<&mut MeasurementManager> {
        self.views
            .get_mut(&view)
            .map(|slot| &mut slot.manager)
            .ok_or(Error::UnknownView(view))
    }

    /// Selects the tool of one view; `None` deselects it.
    pub fn set_tool(&mut self, view: ViewId, kind: Option<DrawingKind>) -> Result<()> {
        let manager = self.manager_mut(view)?;
        match kind {
            Some(kind) => manager.start_measurement(kind),
            None => manager.stop_measurement(),
        }
        self.refresh_camera_of(view)
    }

    /// Applies detection parameters to every view.
    pub fn set_parameters(&mut self, source: &dyn ParameterSource) {
        for slot in self.views.values_mut() {
            slot.manager.set_parameters(source);
        }
    }

    /// Sets the style of labels and of objects started from now on.
    pub fn set_style(&mut self, style: RenderStyle, properties: Properties) {
        self.properties = properties;
        for slot in self.views.values_mut() {
            slot.manager.set_render_style(style.clone());
            slot.manager.set_properties(properties);
            slot.cache = None;
        }
        self.style = style;
    }

    /// Stores the newest frame of `camera` and re-presents its views.
    pub fn submit_frame(&mut self, camera: CameraId, frame: &DynamicImage) -> Result<()> {
        validate_frame(frame)?;
        let slot = self
            .cameras
            .get_mut(&camera)
            .ok_or(Error::UnknownCamera(camera))?;
        slot.frame = Some(as_rgb(frame).into_owned());
        slot.generation += 1;
        self.refresh_camera(camera)
    }

    fn camera_frame(&self, camera: CameraId) -> Result<(&RgbImage, u64)> {
        let slot = self
            .cameras
            .get(&camera)
            .ok_or(Error::UnknownCamera(camera))?;
        let frame = slot
            .frame
            .as_ref()
            .ok_or_else(|| Error::invalid_frame(format!("no frame submitted for {camera}")))?;
        Ok((frame, slot.generation))
    }

    /// Annotated frame of `view`, from cache when neither the layer nor the
    /// camera frame changed since the last render.
    pub fn render_view(&mut self, view: ViewId) -> Result<RenderedFrame> {
        let camera = self.camera_of(view)?;
        let revision = self.layer(camera)?.lock().revision();
        let (frame, generation) = self.camera_frame(camera)?;

        let slot = self.views.get(&view).ok_or(Error::UnknownView(view))?;
        if let Some(cached) = &slot.cache {
            if cached.revision == revision && cached.generation == generation {
                return Ok(cached.frame.clone());
            }
        }
        let rendered = slot.manager.render(frame);

        if let Some(slot) = self.views.get_mut(&view) {
            slot.cache = Some(CachedRender {
                revision,
                generation,
                frame: rendered.clone(),
            });
        }
        Ok(rendered)
    }

    fn present(&mut self, view: ViewId, frame: &RenderedFrame) {
        if let Some(display) = self.display.as_mut() {
            display.present(view, frame);
        }
    }

    /// Re-renders and presents every view of `camera`.
    fn refresh_camera(&mut self, camera: CameraId) -> Result<()> {
        if self.cameras.get(&camera).is_some_and(|slot| slot.frame.is_none()) {
            return Ok(());
        }
        for view in self.views_of(camera) {
            let rendered = self.render_view(view)?;
            self.present(view, &rendered);
        }
        Ok(())
    }

    fn refresh_camera_of(&mut self, view: ViewId) -> Result<()> {
        let camera = self.camera_of(view)?;
        self.refresh_camera(camera)
    }

    /// Feeds one pointer event to `view`'s state machine.
    ///
    /// Widget positions are mapped into image pixels first and image
    /// positions are clamped into the frame. Returns the re-rendered frame,
    /// or `None` when the event changed nothing. Every view of the same
    /// camera is re-presented after a change.
    pub fn on_pointer(&mut self, view: ViewId, event: PointerEvent) -> Result<Option<RenderedFrame>> {
        let camera = self.camera_of(view)?;
        let camera_slot = self
            .cameras
            .get(&camera)
            .ok_or(Error::UnknownCamera(camera))?;
        let generation = camera_slot.generation;
        let frame = camera_slot
            .frame
            .as_ref()
            .ok_or_else(|| Error::invalid_frame(format!("no frame submitted for {camera}")))?;

        let point = match event.position {
            PointerPosition::Image(p) => p.clamped(frame.width(), frame.height()),
            PointerPosition::Widget { x, y, surface } => {
                DisplayMapping::new(frame.width(), frame.height(), surface).widget_to_image(x, y)
            }
        };

        let slot = self.views.get_mut(&view).ok_or(Error::UnknownView(view))?;
        let manager = &mut slot.manager;
        let rendered = match (event.kind, event.button) {
            (PointerEventKind::Press, MouseButton::Primary) => manager.on_press(point, frame),
            (PointerEventKind::Press, MouseButton::Secondary) => {
                manager.on_secondary_press(point, frame)
            }
            (PointerEventKind::Move, _) => manager.on_move(point, frame),
            (PointerEventKind::Release, MouseButton::Primary) => manager.on_release(point, frame),
            (PointerEventKind::Release, MouseButton::Secondary) => None,
        };

        let Some(rendered) = rendered else {
            return Ok(None);
        };
        let revision = slot.manager.layer().lock().revision();
        slot.cache = Some(CachedRender {
            revision,
            generation,
            frame: rendered.clone(),
        });

        self.present(view, &rendered);
        for other in self.views_of(camera).into_iter().filter(|v| *v != view) {
            let mirrored = self.render_view(other)?;
            self.present(other, &mirrored);
        }
        Ok(Some(rendered))
    }

    /// Undoes the newest manual drawing on `view`'s camera.
    pub fn undo_last_drawing(&mut self, view: ViewId) -> Result<bool> {
        let camera = self.camera_of(view)?;
        let removed = self.layer(camera)?.lock().undo_last_drawing();
        if removed {
            self.note(&format!("Undid last drawing on {view}"));
            self.refresh_camera(camera)?;
        }
        Ok(removed)
    }

    /// Undoes the newest detection result on `view`'s camera.
    pub fn undo_last_detection(&mut self, view: ViewId) -> Result<bool> {
        let camera = self.camera_of(view)?;
        let removed = self.layer(camera)?.lock().undo_last_detection();
        if removed {
            self.note(&format!("Undid last detection on {view}"));
            self.refresh_camera(camera)?;
        }
        Ok(removed)
    }

    /// Removes every drawing on `view`'s camera.
    pub fn clear(&mut self, view: ViewId) -> Result<()> {
        let camera = self.camera_of(view)?;
        self.layer(camera)?.lock().clear();
        self.note(&format!("Cleared drawings on {view}"));
        self.refresh_camera(camera)
    }

    /// Removes detection results on `view`'s camera, keeping manual drawings.
    pub fn clear_detections(&mut self, view: ViewId) -> Result<usize> {
        let camera = self.camera_of(view)?;
        let removed = self.layer(camera)?.lock().clear_detections();
        self.note(&format!("Cleared {removed} detection(s) on {view}"));
        self.refresh_camera(camera)?;
        Ok(removed)
    }

    /// Deletes the selected objects on `view`'s camera.
    pub fn delete_selected(&mut self, view: ViewId) -> Result<usize> {
        let camera = self.camera_of(view)?;
        let removed = self.layer(camera)?.lock().delete_selected();
        if removed > 0 {
            self.note(&format!("Deleted {removed} selected object(s) on {view}"));
            self.refresh_camera(camera)?;
        }
        Ok(removed)
    }
}
