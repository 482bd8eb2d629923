//! AnnotationCanvas: the editor component
//!
//! Owns the base image, the drawing surface and the session state, and turns
//! host events into state changes and repaints.
//!
//! The canvas becomes ready only after two independent conditions hold: the
//! host has attached a surface with a measurable viewport, and the source image
//! has been decoded. Either may happen first. Until then every interaction is
//! silently dropped.

use std::path::{Path, PathBuf};

use anyhow::bail;
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::annotations::handlers::{Outcome, handle_editor_msg};
use crate::capture::image::{ImageSource, scale_to_viewport};
use crate::config::EditorConfig;
use crate::domain::{Bounds, Cursor, Point, SurfaceSize, Viewport, map_client_point};
use crate::export;
use crate::render::image::{Scene, compose, pixmap_from_rgba, redraw, rgba_from_pixmap};
use crate::session::messages::{EditorMsg, PointerAction, PointerKind};
use crate::session::shortcuts::{Key, Modifiers, handle_key_event};
use crate::session::state::AnnotationState;

/// Token tying a decode result to the load request that produced it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The annotation editor
pub struct AnnotationCanvas {
    source: ImageSource,
    config: EditorConfig,
    state: AnnotationState,
    /// Close callback supplied by the host, invoked at most once
    on_close: Option<Box<dyn FnMut()>>,
    viewport: Option<Viewport>,
    decoded: Option<RgbaImage>,
    load_failed: bool,
    load_generation: u64,
    pending_load: Option<LoadTicket>,
    /// Scaled source image; set exactly once and never drawn on
    base_image: Option<Pixmap>,
    surface: Option<Pixmap>,
    scale: Option<f32>,
    /// Destination for export requests; the default export path when unset
    export_path: Option<PathBuf>,
    closed: bool,
}

impl std::fmt::Debug for AnnotationCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationCanvas")
            .field("source", &self.source.describe())
            .field("ready", &self.is_ready())
            .field("load_failed", &self.load_failed)
            .field("closed", &self.closed)
            .field("shapes", &self.state.shapes().len())
            .finish()
    }
}

impl AnnotationCanvas {
    pub fn new(
        source: ImageSource,
        config: EditorConfig,
        on_close: impl FnMut() + 'static,
    ) -> Self {
        let state = AnnotationState::new(&config);
        Self {
            source,
            config,
            state,
            on_close: Some(Box::new(on_close)),
            viewport: None,
            decoded: None,
            load_failed: false,
            load_generation: 0,
            pending_load: None,
            base_image: None,
            surface: None,
            scale: None,
            export_path: None,
            closed: false,
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &AnnotationState {
        &self.state
    }

    /// Whether the base image exists and interactions are accepted
    pub fn is_ready(&self) -> bool {
        !self.closed && self.base_image.is_some()
    }

    /// Whether the source image failed to decode; the canvas stays not ready
    pub fn has_failed(&self) -> bool {
        self.load_failed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Scale factor from source-image pixels to canvas pixels
    pub fn scale(&self) -> Option<f32> {
        self.scale
    }

    /// Backing-store size of the drawing surface
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.surface
            .as_ref()
            .map(|s| SurfaceSize::new(s.width(), s.height()))
    }

    /// The visible surface, including any selection highlight
    pub fn surface(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.active_tool().cursor()
    }

    /// Route export requests to `path` instead of the default export location
    pub fn set_export_path(&mut self, path: impl Into<PathBuf>) {
        self.export_path = Some(path.into());
    }

    /// Where an export request writes the composite
    pub fn export_path(&self) -> PathBuf {
        match &self.export_path {
            Some(path) => path.clone(),
            None => export::default_export_path(&self.config.export_file_name),
        }
    }

    /// Start a new load of the source image
    ///
    /// Only the result carrying the latest ticket is accepted.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        let ticket = LoadTicket(self.load_generation);
        if !self.closed {
            self.pending_load = Some(ticket);
        }
        ticket
    }

    /// Deliver a decode result from the host
    ///
    /// Results for stale tickets, or arriving after close, are dropped. A decode
    /// error is logged and leaves the canvas permanently not ready.
    pub fn image_decoded(
        &mut self,
        ticket: LoadTicket,
        result: anyhow::Result<RgbaImage>,
    ) -> bool {
        if self.closed || self.pending_load != Some(ticket) {
            log::debug!("Dropping image load result for stale ticket {:?}", ticket);
            return false;
        }
        self.pending_load = None;

        match result {
            Ok(rgba) => {
                self.decoded = Some(rgba);
                self.try_finish_init()
            }
            Err(err) => {
                log::error!("Error loading image {}: {:?}", self.source.describe(), err);
                self.load_failed = true;
                false
            }
        }
    }

    /// Report the measured layout area of the drawing surface
    ///
    /// Unmeasurable sizes are ignored so the host can call this on every layout
    /// pass until the container settles.
    pub fn attach_surface(&mut self, viewport: Viewport) -> bool {
        if self.closed || self.base_image.is_some() {
            return false;
        }
        if !viewport.is_measurable() {
            log::trace!("Surface not measurable yet: {:?}", viewport);
            return false;
        }
        self.viewport = Some(viewport);
        self.try_finish_init()
    }

    /// Attach using the container size, minus the configured padding
    pub fn attach_container(&mut self, width: f32, height: f32) -> bool {
        let padding = self.config.viewport_padding;
        self.attach_surface(Viewport::from_container(width, height, padding))
    }

    fn try_finish_init(&mut self) -> bool {
        if self.base_image.is_some() || self.load_failed {
            return false;
        }
        let (Some(viewport), Some(decoded)) = (self.viewport, self.decoded.as_ref()) else {
            return false;
        };
        let Some(scaled) = scale_to_viewport(decoded, viewport) else {
            log::warn!("Cannot fit image into viewport {:?}", viewport);
            return false;
        };
        let Some(base) = pixmap_from_rgba(&scaled.rgba) else {
            log::warn!("Cannot allocate surface for scaled image");
            return false;
        };

        log::info!(
            "Editor ready: {}x{} canvas (scale {:.3})",
            base.width(),
            base.height(),
            scaled.scale
        );
        self.surface = Some(base.clone());
        self.base_image = Some(base);
        self.scale = Some(scaled.scale);
        self.decoded = None;
        self.redraw();
        true
    }

    /// Feed a raw pointer event in client coordinates
    ///
    /// The position is mapped into canvas space using the surface's on-screen
    /// bounds. Returns true if the surface was repainted.
    pub fn pointer_event(&mut self, client: Point, bounds: Bounds, kind: PointerKind) -> bool {
        if !self.is_ready() {
            log::trace!("Ignoring {:?} before editor is ready", kind);
            return false;
        }
        let Some(backing) = self.surface_size() else {
            return false;
        };
        let Some(p) = map_client_point(client, bounds, backing) else {
            return false;
        };
        self.dispatch(EditorMsg::Pointer(kind.at(p))).redraw
    }

    /// Feed a pointer action that is already in canvas space
    pub fn pointer(&mut self, action: PointerAction) -> bool {
        self.dispatch(EditorMsg::Pointer(action)).redraw
    }

    /// Feed a key press
    pub fn key_event(&mut self, key: Key, modifiers: Modifiers) -> Outcome {
        if !self.is_ready() {
            return Outcome::default();
        }
        match handle_key_event(&self.state, key, modifiers) {
            Some(msg) => self.dispatch(msg),
            None => Outcome::default(),
        }
    }

    /// Apply an editor message
    ///
    /// Before the canvas is ready only tool, style and close messages take
    /// effect; everything touching shapes or pixels is dropped.
    pub fn dispatch(&mut self, msg: EditorMsg) -> Outcome {
        if self.closed {
            return Outcome::default();
        }
        let touches_surface = matches!(
            msg,
            EditorMsg::Pointer(_)
                | EditorMsg::DeleteSelected
                | EditorMsg::Undo
                | EditorMsg::Redo
                | EditorMsg::Export
        );
        if touches_surface && !self.is_ready() {
            log::trace!("Ignoring {:?} before editor is ready", msg);
            return Outcome::default();
        }

        let outcome = handle_editor_msg(&mut self.state, msg);
        if outcome.redraw {
            self.redraw();
        }
        if outcome.export {
            let path = self.export_path();
            if let Err(err) = self.export_to(&path) {
                log::error!("Failed to export annotated image: {:?}", err);
            }
        }
        if outcome.close {
            self.close();
        }
        outcome
    }

    /// Repaint the surface from the base image and current state
    pub fn redraw(&mut self) {
        let (Some(base), Some(surface)) = (self.base_image.as_ref(), self.surface.as_mut()) else {
            return;
        };
        let scene = Scene {
            base,
            shapes: self.state.shapes(),
            current: self.state.current_shape(),
            selected: self.state.selected_shape_id(),
            highlight: Some(self.config.highlight_color),
        };
        redraw(surface, &scene);
    }

    /// Render the composite for export
    ///
    /// With `include_selection` the visible surface is returned as-is;
    /// otherwise the selection highlight is left out. Any in-progress shape is
    /// part of the composite either way. Pure read, no state changes.
    pub fn composite(&self, include_selection: bool) -> Option<RgbaImage> {
        if !self.is_ready() {
            return None;
        }
        if include_selection {
            return self.surface.as_ref().map(rgba_from_pixmap);
        }
        let base = self.base_image.as_ref()?;
        let pixmap = compose(&Scene {
            base,
            shapes: self.state.shapes(),
            current: self.state.current_shape(),
            selected: None,
            highlight: None,
        });
        Some(rgba_from_pixmap(&pixmap))
    }

    /// The composite as configured for export
    pub fn export_image(&self) -> Option<RgbaImage> {
        self.composite(self.config.export_include_selection)
    }

    /// Encode the export composite as PNG bytes
    pub fn export_png(&self) -> anyhow::Result<Vec<u8>> {
        let Some(img) = self.export_image() else {
            bail!("Editor is not ready; nothing to export");
        };
        let mut buffer = Vec::new();
        export::save_rgba_to_buffer(&img, &mut buffer)?;
        Ok(buffer)
    }

    /// Write the export composite to `path` as PNG
    pub fn export_to(&self, path: &Path) -> anyhow::Result<()> {
        let Some(img) = self.export_image() else {
            bail!("Editor is not ready; nothing to export");
        };
        export::save_rgba(&img, path)
    }

    /// Close the editor, discarding all state
    ///
    /// Outstanding image loads are invalidated. The close callback runs once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.state = AnnotationState::new(&self.config);
        self.pending_load = None;
        self.viewport = None;
        self.decoded = None;
        self.base_image = None;
        self.surface = None;
        self.scale = None;
        log::debug!("Editor closed");
        if let Some(mut on_close) = self.on_close.take() {
            on_close();
        }
    }
}
