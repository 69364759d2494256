//! Material viewer demo application
//!
//! Drives the render host through a scripted session: load the default
//! environment and model, walk through material presets and slider moves,
//! stream a synthetic camera, and flip the drawing target, all against the
//! scripted engine backend. Build with `--features native-renderer` to run
//! against the real engine instead.

use std::error::Error;

use raw_window_handle::{AndroidNdkWindowHandle, RawWindowHandle};
use render_host::assets::{self, AssetStore, Catalog};
use render_host::camera::{CameraBridge, CameraDevice, CameraError, CameraProvider};
use render_host::config::{Config, ViewerConfig};
use render_host::events::{self, EventQueue, Selection, Slider, Toggle, UiEvent};
use render_host::foundation::time::Timer;
use render_host::frame::{FrameDriver, FrameScheduler};
use render_host::palette::{MaterialPalette, PaletteParser};
use render_host::renderer::{RendererBackend, StreamHandle, SwapchainTarget};
use render_host::session::RenderSession;
use render_host::surface::SurfaceBinding;

/// Simulated vsync source. The demo has no display, so "requesting a frame"
/// just records that the next loop iteration should deliver a tick.
#[derive(Default)]
struct SimulatedVsync {
    armed: bool,
}

impl FrameScheduler for SimulatedVsync {
    fn request_frame(&mut self) {
        self.armed = true;
    }

    fn cancel_frame(&mut self) {
        self.armed = false;
    }
}

/// Camera device that delivers no real frames but honors the full preview
/// lifecycle, standing in for the platform camera.
struct SyntheticCamera;

impl CameraDevice for SyntheticCamera {
    fn supported_preview_sizes(&self) -> Vec<(u32, u32)> {
        vec![(1280, 720), (640, 480)]
    }

    fn set_preview_size(&mut self, width: u32, height: u32) {
        log::debug!("synthetic camera preview size {width}x{height}");
    }

    fn attach_preview_target(&mut self) -> Result<(), CameraError> {
        Ok(())
    }

    fn detach_preview_target(&mut self) -> Result<(), CameraError> {
        Ok(())
    }

    fn start_preview(&mut self) {
        log::debug!("synthetic camera preview started");
    }

    fn stop_preview(&mut self) {
        log::debug!("synthetic camera preview stopped");
    }

    fn update_tex_image(&mut self) {}
}

struct SyntheticCameraProvider;

impl CameraProvider for SyntheticCameraProvider {
    fn open(&mut self) -> Result<Box<dyn CameraDevice>, CameraError> {
        Ok(Box::new(SyntheticCamera))
    }
}

#[cfg(feature = "native-renderer")]
fn make_renderer() -> Box<dyn RendererBackend> {
    Box::new(render_host::renderer::ffi::NativeRenderer::new())
}

#[cfg(not(feature = "native-renderer"))]
fn make_renderer() -> Box<dyn RendererBackend> {
    Box::new(render_host::renderer::mock::ScriptedRenderer::new())
}

fn load_palette(store: &AssetStore) -> MaterialPalette {
    let mut presets = std::collections::HashMap::new();
    match store.read_to_string(assets::PALETTE_FILE) {
        Ok(source) => {
            if let Err(e) = PaletteParser::parse_into(&source, &mut presets) {
                // Presets declared before the failure stay usable
                log::error!("material palette parse failed: {e}");
            }
        }
        Err(e) => log::error!("material palette unavailable: {e}"),
    }
    let palette = MaterialPalette::from_presets(presets);
    log::info!("loaded {} material preset(s)", palette.len());
    palette
}

/// The scripted UI: the events a user session would produce, keyed by the
/// frame at which they fire.
fn scripted_event(frame: u64) -> Option<UiEvent> {
    match frame {
        10 => Some(UiEvent::SelectionChanged(Selection::Preset(
            "Silver".to_string(),
        ))),
        25 => Some(UiEvent::SliderChanged(Slider::Roughness, 0.15)),
        40 => Some(UiEvent::SliderChanged(Slider::ClearCoat, 0.8)),
        55 => Some(UiEvent::SelectionChanged(Selection::Preset(
            "Gold".to_string(),
        ))),
        70 => Some(UiEvent::ToggleChanged(Toggle::CameraStream, true)),
        85 => Some(UiEvent::ToggleChanged(Toggle::SurfaceKind, true)),
        95 => Some(UiEvent::ToggleChanged(Toggle::SurfaceKind, false)),
        105 => Some(UiEvent::ToggleChanged(Toggle::CameraStream, false)),
        110 => Some(UiEvent::ToggleChanged(Toggle::ObjectRotation, false)),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    render_host::foundation::logging::init();
    log::info!("material viewer starting");

    let config = ViewerConfig::load_or_default("viewer.toml");
    let store = AssetStore::new(&config.asset_root);

    let catalog = Catalog::from_store(&store);
    for entry in catalog.entries() {
        log::info!("catalog entry: {}", entry.name());
    }

    let palette = load_palette(&store);

    let surface = SurfaceBinding::new(
        SwapchainTarget::Window(RawWindowHandle::AndroidNdk(AndroidNdkWindowHandle::empty())),
        SwapchainTarget::Texture {
            texture: config.camera_texture,
        },
        config.surface_width,
        config.surface_height,
    );
    let camera = CameraBridge::new(
        config.stream_mode,
        StreamHandle(1),
        config.camera_texture,
        Box::new(SyntheticCameraProvider),
    );

    let mut renderer = make_renderer();
    let mut session = RenderSession::new(&config, palette, surface, camera);
    session.initialize(renderer.as_mut())?;

    log::info!("environment: {}", config.default_environment);
    assets::load_environment(renderer.as_mut())?;
    if let Err(e) = assets::load_model(&store, renderer.as_mut(), &config.default_model) {
        log::error!("default model failed to load: {e}");
    }
    renderer.update_transform()?;

    let mut driver = FrameDriver::new();
    let mut scheduler = SimulatedVsync::default();
    let mut queue = EventQueue::new();
    let mut timer = Timer::new();

    session.resume(&mut driver, &mut scheduler, renderer.as_mut());

    while driver.frame_count() < 120 {
        if let Some(event) = scripted_event(driver.frame_count()) {
            log::info!("ui event: {event:?}");
            queue.push(event);
        }
        queue.push(UiEvent::FrameTick);
        events::dispatch(
            &mut queue,
            &mut session,
            &mut driver,
            &mut scheduler,
            renderer.as_mut(),
            &store,
        );
        timer.update();
    }

    log::info!(
        "ran {} frames in {:.2}s ({:.1} fps)",
        timer.frame_count(),
        timer.total_time(),
        timer.average_fps()
    );

    session.pause(&mut driver, &mut scheduler, renderer.as_mut());
    session.shutdown(renderer.as_mut());
    log::info!("material viewer finished");
    Ok(())
}
