//! Camera bridge
//!
//! Feeds the device camera's preview into the engine, in one of two
//! streaming modes fixed at process start: the engine either samples a GPU
//! texture by handle, or is handed an opaque image-stream handle. The
//! platform camera sits behind the [`CameraDevice`] seam so hosts and tests
//! can substitute their own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::{RendererBackend, StreamHandle};

/// How camera frames reach the engine. Selected once at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMode {
    /// The engine is handed an opaque image-stream handle
    ExternalImage,
    /// The engine samples a GPU texture by numeric handle
    TextureObject,
}

/// Camera bridge errors
#[derive(Error, Debug)]
pub enum CameraError {
    /// The platform camera could not be opened
    #[error("camera open failed: {0}")]
    Open(String),

    /// The device reported no supported preview resolutions
    #[error("camera reports no supported preview sizes")]
    NoPreviewSize,

    /// The preview stream could not be bound to its target
    #[error("preview target binding failed: {0}")]
    PreviewTarget(String),
}

/// An open platform camera
pub trait CameraDevice {
    /// Supported preview resolutions, best first
    fn supported_preview_sizes(&self) -> Vec<(u32, u32)>;

    /// Select the preview resolution
    fn set_preview_size(&mut self, width: u32, height: u32);

    /// Bind the preview stream to its texture/stream target
    fn attach_preview_target(&mut self) -> Result<(), CameraError>;

    /// Unbind the preview stream from its target
    fn detach_preview_target(&mut self) -> Result<(), CameraError>;

    /// Start delivering preview frames
    fn start_preview(&mut self);

    /// Stop delivering preview frames. Blocks until delivery has stopped.
    fn stop_preview(&mut self);

    /// Pull the latest delivered frame into the bound texture
    fn update_tex_image(&mut self);
}

/// Opens platform cameras on demand
pub trait CameraProvider {
    /// Open the device camera
    fn open(&mut self) -> Result<Box<dyn CameraDevice>, CameraError>;
}

/// Bridge between the platform camera and the engine's camera inputs
pub struct CameraBridge {
    mode: StreamMode,
    stream: StreamHandle,
    texture: u64,
    provider: Box<dyn CameraProvider>,
    device: Option<Box<dyn CameraDevice>>,
    preview_size: (u32, u32),
}

impl CameraBridge {
    /// Create a bridge in the given streaming mode.
    ///
    /// `stream` is the handle announced in external-image mode; `texture`
    /// is the GPU texture announced in texture-object mode.
    pub fn new(
        mode: StreamMode,
        stream: StreamHandle,
        texture: u64,
        provider: Box<dyn CameraProvider>,
    ) -> Self {
        Self {
            mode,
            stream,
            texture,
            provider,
            device: None,
            preview_size: (0, 0),
        }
    }

    /// The streaming mode this bridge was built with
    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    /// Whether a camera is currently open and streaming
    pub fn is_streaming(&self) -> bool {
        self.device.is_some()
    }

    /// Open the camera, start its preview, and announce the stream to the
    /// engine. Starting an already-started bridge is a no-op.
    ///
    /// A preview-target binding failure is logged and the preview is still
    /// attempted.
    pub fn start(&mut self, renderer: &mut dyn RendererBackend) -> Result<(), CameraError> {
        if self.device.is_some() {
            return Ok(());
        }

        let mut device = self.provider.open()?;
        let (width, height) = device
            .supported_preview_sizes()
            .first()
            .copied()
            .ok_or(CameraError::NoPreviewSize)?;
        device.set_preview_size(width, height);

        if let Err(e) = device.attach_preview_target() {
            log::warn!("camera preview target attach failed: {e}");
        }
        device.start_preview();
        log::info!("camera preview started at {width}x{height}");

        let announced = match self.mode {
            StreamMode::ExternalImage => renderer.bind_camera_stream(Some(self.stream)),
            StreamMode::TextureObject => renderer.bind_camera_texture(self.texture, width, height),
        };
        if let Err(fault) = announced {
            log::warn!("camera stream announcement failed: {fault}");
        }

        self.preview_size = (width, height);
        self.device = Some(device);
        Ok(())
    }

    /// Clear the engine's stream binding, stop the preview, and release the
    /// camera. Stopping a bridge that never started is a safe no-op.
    ///
    /// Blocks until the camera is released.
    pub fn stop(&mut self, renderer: &mut dyn RendererBackend) {
        let Some(mut device) = self.device.take() else {
            return;
        };

        let cleared = match self.mode {
            StreamMode::ExternalImage => renderer.bind_camera_stream(None),
            StreamMode::TextureObject => renderer.bind_camera_texture(0, 0, 0),
        };
        if let Err(fault) = cleared {
            log::warn!("camera stream clear failed: {fault}");
        }

        device.stop_preview();
        if let Err(e) = device.detach_preview_target() {
            log::warn!("camera preview target detach failed: {e}");
        }
        log::info!("camera preview stopped");
        // Dropping the device releases the platform camera.
    }

    /// Pull the latest camera frame into the bound texture.
    ///
    /// Only meaningful in texture-object mode; a no-op otherwise, and while
    /// no camera is open.
    pub fn pull_frame(&mut self) {
        if self.mode == StreamMode::TextureObject {
            if let Some(device) = self.device.as_mut() {
                device.update_tex_image();
            }
        }
    }
}

impl std::fmt::Debug for CameraBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraBridge")
            .field("mode", &self.mode)
            .field("streaming", &self.device.is_some())
            .field("preview_size", &self.preview_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::mock::{Call, ScriptedRenderer};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeCameraState {
        previewing: Cell<bool>,
        pulls: Cell<u32>,
    }

    struct FakeCamera {
        state: Rc<FakeCameraState>,
        attach_fails: bool,
    }

    impl CameraDevice for FakeCamera {
        fn supported_preview_sizes(&self) -> Vec<(u32, u32)> {
            vec![(640, 480), (1280, 720)]
        }

        fn set_preview_size(&mut self, _width: u32, _height: u32) {}

        fn attach_preview_target(&mut self) -> Result<(), CameraError> {
            if self.attach_fails {
                Err(CameraError::PreviewTarget("busy".to_string()))
            } else {
                Ok(())
            }
        }

        fn detach_preview_target(&mut self) -> Result<(), CameraError> {
            Ok(())
        }

        fn start_preview(&mut self) {
            self.state.previewing.set(true);
        }

        fn stop_preview(&mut self) {
            self.state.previewing.set(false);
        }

        fn update_tex_image(&mut self) {
            self.state.pulls.set(self.state.pulls.get() + 1);
        }
    }

    struct FakeProvider {
        state: Rc<FakeCameraState>,
        attach_fails: bool,
    }

    impl CameraProvider for FakeProvider {
        fn open(&mut self) -> Result<Box<dyn CameraDevice>, CameraError> {
            Ok(Box::new(FakeCamera {
                state: Rc::clone(&self.state),
                attach_fails: self.attach_fails,
            }))
        }
    }

    fn bridge(mode: StreamMode, attach_fails: bool) -> (CameraBridge, Rc<FakeCameraState>) {
        let state = Rc::new(FakeCameraState::default());
        let bridge = CameraBridge::new(
            mode,
            StreamHandle(11),
            42,
            Box::new(FakeProvider {
                state: Rc::clone(&state),
                attach_fails,
            }),
        );
        (bridge, state)
    }

    #[test]
    fn test_start_announces_stream_in_external_mode() {
        let mut renderer = ScriptedRenderer::new();
        let (mut bridge, state) = bridge(StreamMode::ExternalImage, false);
        bridge.start(&mut renderer).unwrap();
        assert!(bridge.is_streaming());
        assert!(state.previewing.get());
        assert_eq!(
            renderer.count(|c| matches!(c, Call::BindCameraStream { bound: true })),
            1
        );
    }

    #[test]
    fn test_start_announces_texture_with_first_preview_size() {
        let mut renderer = ScriptedRenderer::new();
        let (mut bridge, _) = bridge(StreamMode::TextureObject, false);
        bridge.start(&mut renderer).unwrap();
        assert_eq!(
            renderer.calls(),
            &[Call::BindCameraTexture {
                texture: 42,
                width: 640,
                height: 480,
            }]
        );
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut renderer = ScriptedRenderer::new();
        let (mut bridge, _) = bridge(StreamMode::ExternalImage, false);
        bridge.stop(&mut renderer);
        assert!(renderer.calls().is_empty());
        assert!(!bridge.is_streaming());
    }

    #[test]
    fn test_stop_clears_stream_then_releases() {
        let mut renderer = ScriptedRenderer::new();
        let (mut bridge, state) = bridge(StreamMode::ExternalImage, false);
        bridge.start(&mut renderer).unwrap();
        renderer.clear_calls();

        bridge.stop(&mut renderer);
        assert!(!bridge.is_streaming());
        assert!(!state.previewing.get());
        assert_eq!(
            renderer.calls(),
            &[Call::BindCameraStream { bound: false }]
        );
    }

    #[test]
    fn test_stop_in_texture_mode_clears_with_zeroes() {
        let mut renderer = ScriptedRenderer::new();
        let (mut bridge, _) = bridge(StreamMode::TextureObject, false);
        bridge.start(&mut renderer).unwrap();
        renderer.clear_calls();

        bridge.stop(&mut renderer);
        assert_eq!(
            renderer.calls(),
            &[Call::BindCameraTexture {
                texture: 0,
                width: 0,
                height: 0,
            }]
        );
    }

    #[test]
    fn test_preview_attempted_despite_attach_failure() {
        let mut renderer = ScriptedRenderer::new();
        let (mut bridge, state) = bridge(StreamMode::ExternalImage, true);
        bridge.start(&mut renderer).unwrap();
        assert!(state.previewing.get());
    }

    #[test]
    fn test_pull_frame_only_in_texture_mode() {
        let mut renderer = ScriptedRenderer::new();

        let (mut external, external_state) = bridge(StreamMode::ExternalImage, false);
        external.start(&mut renderer).unwrap();
        external.pull_frame();
        assert_eq!(external_state.pulls.get(), 0);

        let (mut texture, texture_state) = bridge(StreamMode::TextureObject, false);
        texture.start(&mut renderer).unwrap();
        texture.pull_frame();
        texture.pull_frame();
        assert_eq!(texture_state.pulls.get(), 2);
    }

    #[test]
    fn test_double_start_opens_once() {
        let mut renderer = ScriptedRenderer::new();
        let (mut bridge, _) = bridge(StreamMode::ExternalImage, false);
        bridge.start(&mut renderer).unwrap();
        bridge.start(&mut renderer).unwrap();
        assert_eq!(
            renderer.count(|c| matches!(c, Call::BindCameraStream { bound: true })),
            1
        );
    }
}
