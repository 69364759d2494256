//! Scripted renderer backend
//!
//! A recording implementation of [`RendererBackend`] used by the test suites
//! and by headless demo runs. Every call is appended to a log; readiness can
//! be toggled from the outside to exercise the frame driver's guard.

use super::{RenderFlags, RendererBackend, RendererResult, StreamHandle, SwapchainTarget};

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `initialize` was called
    Initialize {
        /// MSAA sample count passed through
        sample_count: u32,
        /// External-image streaming flag passed through
        use_external_stream: bool,
    },
    /// `load_environment` was called
    LoadEnvironment,
    /// `load_mesh` was called with this name
    LoadMesh(String),
    /// `load_model_from_buffer` was called with a buffer of this length
    LoadModel {
        /// Buffer length in bytes
        len: usize,
    },
    /// `resize` was called
    Resize {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// `destroy` was called
    Destroy,
    /// `render` was called with these flags
    Render(RenderFlags),
    /// `update_transform` was called
    UpdateTransform,
    /// `update_material` was called
    UpdateMaterial {
        /// Metallic factor
        metallic: f32,
        /// Roughness factor
        roughness: f32,
        /// Clear coat factor
        clear_coat: f32,
    },
    /// `update_material_albedo` was called
    UpdateAlbedo {
        /// Red channel
        r: f32,
        /// Green channel
        g: f32,
        /// Blue channel
        b: f32,
    },
    /// `bind_swapchain` was called; `true` when a target was supplied
    BindSwapchain {
        /// Whether a target was bound (vs. cleared)
        bound: bool,
    },
    /// `bind_camera_stream` was called; `true` when a stream was supplied
    BindCameraStream {
        /// Whether a stream was bound (vs. cleared)
        bound: bool,
    },
    /// `bind_camera_texture` was called
    BindCameraTexture {
        /// GPU texture handle
        texture: u64,
        /// Preview width
        width: u32,
        /// Preview height
        height: u32,
    },
    /// `finish` was called
    Finish,
}

/// Recording renderer backend with scriptable readiness
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    ready: bool,
    calls: Vec<Call>,
}

impl ScriptedRenderer {
    /// Create a backend that reports not-ready until initialized
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the readiness signal
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// All calls recorded so far, in order
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of recorded calls matching the predicate
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Drop the recorded call log
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl RendererBackend for ScriptedRenderer {
    fn initialize(
        &mut self,
        sample_count: u32,
        _shared_context: u64,
        use_external_stream: bool,
    ) -> RendererResult {
        self.calls.push(Call::Initialize {
            sample_count,
            use_external_stream,
        });
        self.ready = true;
        Ok(())
    }

    fn load_environment(&mut self) -> RendererResult {
        self.calls.push(Call::LoadEnvironment);
        Ok(())
    }

    fn load_mesh(&mut self, name: &str) -> RendererResult {
        self.calls.push(Call::LoadMesh(name.to_string()));
        Ok(())
    }

    fn load_model_from_buffer(&mut self, bytes: &[u8]) -> RendererResult {
        self.calls.push(Call::LoadModel { len: bytes.len() });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RendererResult {
        self.calls.push(Call::Resize { width, height });
        Ok(())
    }

    fn destroy(&mut self) -> RendererResult {
        self.calls.push(Call::Destroy);
        self.ready = false;
        Ok(())
    }

    fn render(&mut self, flags: RenderFlags) -> RendererResult {
        self.calls.push(Call::Render(flags));
        Ok(())
    }

    fn update_transform(&mut self) -> RendererResult {
        self.calls.push(Call::UpdateTransform);
        Ok(())
    }

    fn update_material(
        &mut self,
        metallic: f32,
        roughness: f32,
        clear_coat: f32,
    ) -> RendererResult {
        self.calls.push(Call::UpdateMaterial {
            metallic,
            roughness,
            clear_coat,
        });
        Ok(())
    }

    fn update_material_albedo(&mut self, r: f32, g: f32, b: f32) -> RendererResult {
        self.calls.push(Call::UpdateAlbedo { r, g, b });
        Ok(())
    }

    fn bind_swapchain(&mut self, target: Option<&SwapchainTarget>) -> RendererResult {
        self.calls.push(Call::BindSwapchain {
            bound: target.is_some(),
        });
        Ok(())
    }

    fn bind_camera_stream(&mut self, stream: Option<StreamHandle>) -> RendererResult {
        self.calls.push(Call::BindCameraStream {
            bound: stream.is_some(),
        });
        Ok(())
    }

    fn bind_camera_texture(&mut self, texture: u64, width: u32, height: u32) -> RendererResult {
        self.calls.push(Call::BindCameraTexture {
            texture,
            width,
            height,
        });
        Ok(())
    }

    fn finish(&mut self) -> RendererResult {
        self.calls.push(Call::Finish);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
