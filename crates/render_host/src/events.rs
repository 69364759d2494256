//! Typed UI event dispatch
//!
//! UI controls enqueue typed events; the host drains the queue on its thread
//! and applies each event to the session. Dispatch replaces ad-hoc
//! string-keyed callbacks with one match over a closed event set, so a new
//! control is a new variant the compiler forces every host to handle.

use std::collections::VecDeque;

use crate::assets::{self, AssetStore};
use crate::frame::{FrameDriver, FrameScheduler};
use crate::renderer::RendererBackend;
use crate::session::RenderSession;

/// A selection made from one of the dropdown lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A material preset by name
    Preset(String),
    /// A binary model by file name
    Model(String),
    /// A mesh by file name
    Mesh(String),
    /// An environment lighting set by name
    Environment(String),
}

/// A continuous material control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    /// Metallic factor
    Metallic,
    /// Roughness factor
    Roughness,
    /// Clear coat factor
    ClearCoat,
}

/// A two-state control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Spin the displayed object
    ObjectRotation,
    /// Orbit the camera
    CameraRotation,
    /// Stream device camera frames into the scene
    CameraStream,
    /// Present into the other drawing target kind
    SurfaceKind,
}

/// One event produced by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A dropdown selection changed
    SelectionChanged(Selection),
    /// A slider moved to a new value
    SliderChanged(Slider, f32),
    /// A two-state control flipped
    ToggleChanged(Toggle, bool),
    /// The vsync source fired
    FrameTick,
}

/// FIFO queue of pending UI events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<UiEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event
    pub fn push(&mut self, event: UiEvent) {
        self.events.push_back(event);
    }

    /// Dequeue the oldest pending event
    pub fn pop(&mut self) -> Option<UiEvent> {
        self.events.pop_front()
    }

    /// Whether no events are pending
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Drain the queue and apply every event to the session.
///
/// Asset loading failures are logged and do not stop dispatch; the session
/// keeps its previous content. Selecting a model or mesh stops any active
/// camera stream first, since the stream targets the previous scene content.
pub fn dispatch(
    queue: &mut EventQueue,
    session: &mut RenderSession,
    driver: &mut FrameDriver,
    scheduler: &mut dyn FrameScheduler,
    renderer: &mut dyn RendererBackend,
    store: &AssetStore,
) {
    while let Some(event) = queue.pop() {
        match event {
            UiEvent::SelectionChanged(Selection::Preset(name)) => {
                session.select_preset(&name);
            }
            UiEvent::SelectionChanged(Selection::Model(name)) => {
                session.stop_camera(renderer);
                if let Err(e) = assets::load_model(store, renderer, &name) {
                    log::error!("model {name:?} failed to load: {e}");
                }
            }
            UiEvent::SelectionChanged(Selection::Mesh(name)) => {
                session.stop_camera(renderer);
                if let Err(e) = assets::load_mesh(renderer, &name) {
                    log::error!("mesh {name:?} failed to load: {e}");
                }
            }
            UiEvent::SelectionChanged(Selection::Environment(name)) => {
                let bundled = store.list(assets::ENV_DIR, "No environment found");
                if !bundled.iter().any(|entry| entry == &name) {
                    log::warn!("environment {name:?} not bundled, engine default applies");
                }
                if let Err(e) = assets::load_environment(renderer) {
                    log::error!("environment {name:?} failed to load: {e}");
                }
            }
            UiEvent::SliderChanged(Slider::Metallic, value) => session.set_metallic(value),
            UiEvent::SliderChanged(Slider::Roughness, value) => session.set_roughness(value),
            UiEvent::SliderChanged(Slider::ClearCoat, value) => session.set_clear_coat(value),
            UiEvent::ToggleChanged(Toggle::ObjectRotation, on) => session.set_object_rotation(on),
            UiEvent::ToggleChanged(Toggle::CameraRotation, on) => session.set_camera_rotation(on),
            UiEvent::ToggleChanged(Toggle::CameraStream, on) => {
                if on {
                    session.start_camera(renderer);
                } else {
                    session.stop_camera(renderer);
                }
            }
            UiEvent::ToggleChanged(Toggle::SurfaceKind, _) => {
                if let Err(fault) = session.toggle_surface_kind(renderer) {
                    log::error!("surface toggle failed: {fault}");
                }
            }
            UiEvent::FrameTick => driver.on_frame(scheduler, session, renderer),
        }
    }
}
