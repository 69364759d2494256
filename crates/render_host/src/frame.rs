//! Frame driver
//!
//! The per-display-refresh callback. While scheduled, every invocation
//! immediately re-registers itself with the vsync source (continuous
//! self-rescheduling, not a fixed-period timer) and then, only if the engine
//! reports ready, performs the fixed per-frame sequence: camera pull, then
//! material push, then exactly one render request.
//!
//! Pausing cancels the callback outright; there is no missed-frame queuing
//! or backpressure. Everything runs on the UI thread.

use crate::renderer::RendererBackend;
use crate::session::RenderSession;

/// The display's vsync source, as a seam the host platform implements
pub trait FrameScheduler {
    /// Register the frame callback for the next display refresh
    fn request_frame(&mut self);

    /// Cancel a previously registered frame callback
    fn cancel_frame(&mut self);
}

/// Scheduling state of the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No callback registered with the vsync source
    Idle,
    /// Callback registered; each invocation re-registers itself
    Scheduled,
}

/// Per-vsync frame driver state machine
#[derive(Debug)]
pub struct FrameDriver {
    state: DriverState,
    frame_count: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    /// Create an idle driver
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            frame_count: 0,
        }
    }

    /// Current scheduling state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of frame callbacks handled since creation
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Arm the driver: register the callback with the vsync source
    pub fn resume(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.state == DriverState::Idle {
            scheduler.request_frame();
            self.state = DriverState::Scheduled;
            log::debug!("frame driver scheduled");
        }
    }

    /// Disarm the driver: cancel the registered callback
    pub fn pause(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.state == DriverState::Scheduled {
            scheduler.cancel_frame();
            self.state = DriverState::Idle;
            log::debug!("frame driver cancelled");
        }
    }

    /// Handle one vsync callback.
    ///
    /// Re-registers first, then runs the per-frame sequence only when the
    /// engine reports ready. Ordering is fixed: camera pull, material push,
    /// render request. Faults at the renderer boundary are logged and do
    /// not stop the driver.
    pub fn on_frame(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        session: &mut RenderSession,
        renderer: &mut dyn RendererBackend,
    ) {
        if self.state != DriverState::Scheduled {
            // A cancelled callback can still fire once on some platforms.
            return;
        }
        scheduler.request_frame();
        self.frame_count += 1;

        if !renderer.is_ready() {
            return;
        }

        session.pull_camera_frame();

        if let Err(fault) = session.flush_material(renderer) {
            log::warn!("material push failed: {fault}");
        }

        if let Err(fault) = renderer.render(session.render_flags()) {
            log::warn!("render request failed: {fault}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraBridge, CameraDevice, CameraError, CameraProvider, StreamMode};
    use crate::config::ViewerConfig;
    use crate::palette::MaterialPalette;
    use crate::renderer::mock::{Call, ScriptedRenderer};
    use crate::renderer::{RenderFlags, StreamHandle, SwapchainTarget};
    use crate::session::RenderSession;
    use crate::surface::SurfaceBinding;

    #[derive(Default)]
    struct CountingScheduler {
        requests: u32,
        cancels: u32,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }

        fn cancel_frame(&mut self) {
            self.cancels += 1;
        }
    }

    struct NoCameraProvider;

    impl CameraProvider for NoCameraProvider {
        fn open(&mut self) -> Result<Box<dyn CameraDevice>, CameraError> {
            Err(CameraError::Open("no camera in tests".to_string()))
        }
    }

    fn test_session() -> RenderSession {
        use raw_window_handle::{AndroidNdkWindowHandle, RawWindowHandle};
        let surface = SurfaceBinding::new(
            SwapchainTarget::Window(RawWindowHandle::AndroidNdk(AndroidNdkWindowHandle::empty())),
            SwapchainTarget::Texture { texture: 1 },
            1280,
            720,
        );
        let camera = CameraBridge::new(
            StreamMode::ExternalImage,
            StreamHandle(1),
            0,
            Box::new(NoCameraProvider),
        );
        RenderSession::new(
            &ViewerConfig::default(),
            MaterialPalette::new(),
            surface,
            camera,
        )
    }

    #[test]
    fn test_resume_and_pause_transition_states() {
        let mut scheduler = CountingScheduler::default();
        let mut driver = FrameDriver::new();
        assert_eq!(driver.state(), DriverState::Idle);

        driver.resume(&mut scheduler);
        assert_eq!(driver.state(), DriverState::Scheduled);
        assert_eq!(scheduler.requests, 1);

        // Resuming twice does not double-register
        driver.resume(&mut scheduler);
        assert_eq!(scheduler.requests, 1);

        driver.pause(&mut scheduler);
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(scheduler.cancels, 1);
    }

    #[test]
    fn test_not_ready_reschedules_but_does_nothing_else() {
        let mut scheduler = CountingScheduler::default();
        let mut renderer = ScriptedRenderer::new();
        let mut session = test_session();
        let mut driver = FrameDriver::new();

        driver.resume(&mut scheduler);
        session.set_metallic(0.5);
        driver.on_frame(&mut scheduler, &mut session, &mut renderer);

        assert_eq!(scheduler.requests, 2); // resume + re-register
        assert!(renderer.calls().is_empty());
    }

    #[test]
    fn test_dirty_material_pushed_once_then_flag_cleared() {
        let mut scheduler = CountingScheduler::default();
        let mut renderer = ScriptedRenderer::new();
        renderer.set_ready(true);
        let mut session = test_session();
        let mut driver = FrameDriver::new();
        driver.resume(&mut scheduler);

        session.set_metallic(0.25);
        assert!(session.is_material_dirty());

        driver.on_frame(&mut scheduler, &mut session, &mut renderer);
        assert!(!session.is_material_dirty());
        assert_eq!(
            renderer.count(|c| matches!(c, Call::UpdateMaterial { .. })),
            1
        );
        assert_eq!(renderer.count(|c| matches!(c, Call::UpdateAlbedo { .. })), 1);
        assert_eq!(renderer.count(|c| matches!(c, Call::Render(_))), 1);

        // Next frame: no further material push, still one render
        renderer.clear_calls();
        driver.on_frame(&mut scheduler, &mut session, &mut renderer);
        assert_eq!(
            renderer.count(|c| matches!(c, Call::UpdateMaterial { .. })),
            0
        );
        assert_eq!(renderer.count(|c| matches!(c, Call::Render(_))), 1);
    }

    #[test]
    fn test_material_push_precedes_render() {
        let mut scheduler = CountingScheduler::default();
        let mut renderer = ScriptedRenderer::new();
        renderer.set_ready(true);
        let mut session = test_session();
        let mut driver = FrameDriver::new();
        driver.resume(&mut scheduler);

        session.set_roughness(0.9);
        driver.on_frame(&mut scheduler, &mut session, &mut renderer);

        let calls = renderer.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], Call::UpdateMaterial { .. }));
        assert!(matches!(calls[1], Call::UpdateAlbedo { .. }));
        assert!(matches!(calls[2], Call::Render(_)));
    }

    #[test]
    fn test_render_uses_session_flags() {
        let mut scheduler = CountingScheduler::default();
        let mut renderer = ScriptedRenderer::new();
        renderer.set_ready(true);
        let mut session = test_session();
        let mut driver = FrameDriver::new();
        driver.resume(&mut scheduler);

        // Rotation toggles alone do not dirty the material
        session.set_object_rotation(true);
        session.set_camera_rotation(true);
        assert!(!session.is_material_dirty());

        driver.on_frame(&mut scheduler, &mut session, &mut renderer);
        assert_eq!(
            renderer.calls(),
            &[Call::Render(
                RenderFlags::ROTATE_OBJECT | RenderFlags::ROTATE_CAMERA
            )]
        );
    }

    #[test]
    fn test_idle_driver_ignores_stray_callback() {
        let mut scheduler = CountingScheduler::default();
        let mut renderer = ScriptedRenderer::new();
        renderer.set_ready(true);
        let mut session = test_session();
        let mut driver = FrameDriver::new();

        driver.on_frame(&mut scheduler, &mut session, &mut renderer);
        assert_eq!(scheduler.requests, 0);
        assert!(renderer.calls().is_empty());
    }
}
