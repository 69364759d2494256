//! # Renderer Boundary
//!
//! The external renderer is an opaque native engine; this module pins down
//! the fixed call surface the host consumes and nothing more. The engine's
//! scene graph, GPU pipeline, and image-based lighting all live on the far
//! side of this boundary and are out of scope here.
//!
//! The underlying library reports no structured errors, so every call is
//! still wrapped in a [`RendererResult`] at this layer. That gives the
//! surrounding code one uniform place to add handling later without touching
//! call sites. The only health signal the host acts on today is
//! [`RendererBackend::is_ready`].
//!
//! Two implementations exist:
//! - [`mock::ScriptedRenderer`]: a recording backend for tests and headless
//!   runs
//! - `ffi::NativeRenderer` (feature `native-renderer`): bindings to the
//!   prebuilt engine library

#[cfg(feature = "native-renderer")]
pub mod ffi;
pub mod mock;

use raw_window_handle::RawWindowHandle;
use thiserror::Error;

/// Result type for renderer boundary operations
pub type RendererResult<T = ()> = Result<T, RendererFault>;

/// A fault reported at the renderer boundary.
///
/// The native engine does not currently surface failures, so faults mostly
/// originate in the binding layer itself (bad handle kind, interior NUL in a
/// name, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("renderer fault: {reason}")]
pub struct RendererFault {
    /// Human-readable description of what went wrong
    pub reason: String,
}

impl RendererFault {
    /// Create a new fault with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

bitflags::bitflags! {
    /// Per-frame rotation flags passed to the render call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderFlags: u32 {
        /// Spin the displayed object around its own axis
        const ROTATE_OBJECT = 1 << 0;
        /// Orbit the camera around the object
        const ROTATE_CAMERA = 1 << 1;
    }
}

/// Opaque handle to a platform image stream (camera preview)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHandle(pub u64);

/// The platform drawing target the engine presents frames into.
///
/// Exactly one of two mutually exclusive kinds is active at a time; the
/// [`crate::surface::SurfaceBinding`] enforces that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwapchainTarget {
    /// An exclusive platform window surface
    Window(RawWindowHandle),
    /// A composited texture-backed surface, identified by GPU texture handle
    Texture {
        /// GPU texture object the engine renders into
        texture: u64,
    },
}

/// # Renderer Backend Trait
///
/// The fixed call surface of the external engine. Implementations manage
/// their own state; the host never looks past this interface.
///
/// All calls happen on the UI thread; implementations need no internal
/// synchronization on the host's account.
pub trait RendererBackend {
    /// One-time engine initialization.
    ///
    /// # Arguments
    /// * `sample_count` - MSAA sample count
    /// * `shared_context` - platform GL context handle shared with the
    ///   engine, or 0
    /// * `use_external_stream` - whether camera frames arrive as an opaque
    ///   image stream rather than a GPU texture
    fn initialize(
        &mut self,
        sample_count: u32,
        shared_context: u64,
        use_external_stream: bool,
    ) -> RendererResult;

    /// Load the engine's built-in environment lighting
    fn load_environment(&mut self) -> RendererResult;

    /// Load a mesh by name from the engine's own asset source
    fn load_mesh(&mut self, name: &str) -> RendererResult;

    /// Load a binary model from a whole in-memory buffer
    fn load_model_from_buffer(&mut self, bytes: &[u8]) -> RendererResult;

    /// Notify the engine of new swapchain pixel dimensions
    fn resize(&mut self, width: u32, height: u32) -> RendererResult;

    /// Tear the engine's scene down
    fn destroy(&mut self) -> RendererResult;

    /// Request exactly one rendered frame
    fn render(&mut self, flags: RenderFlags) -> RendererResult;

    /// Recompute the displayed object's transform after a load
    fn update_transform(&mut self) -> RendererResult;

    /// Push the current material's scalar parameters
    fn update_material(&mut self, metallic: f32, roughness: f32, clear_coat: f32)
        -> RendererResult;

    /// Push the current material's RGB albedo
    fn update_material_albedo(&mut self, r: f32, g: f32, b: f32) -> RendererResult;

    /// Hand the engine a new swapchain target, or `None` when the surface
    /// is gone
    fn bind_swapchain(&mut self, target: Option<&SwapchainTarget>) -> RendererResult;

    /// Hand the engine the camera's image stream, or `None` to clear it
    fn bind_camera_stream(&mut self, stream: Option<StreamHandle>) -> RendererResult;

    /// Tell the engine which GPU texture the camera preview lands in.
    ///
    /// A zero texture with zero dimensions clears the binding.
    fn bind_camera_texture(&mut self, texture: u64, width: u32, height: u32) -> RendererResult;

    /// Flush any pending engine work tied to the departing surface
    fn finish(&mut self) -> RendererResult;

    /// Whether the engine is ready to accept per-frame calls.
    ///
    /// This is the sole health signal the frame driver consults.
    fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_flags_compose() {
        let flags = RenderFlags::ROTATE_OBJECT | RenderFlags::ROTATE_CAMERA;
        assert!(flags.contains(RenderFlags::ROTATE_OBJECT));
        assert!(flags.contains(RenderFlags::ROTATE_CAMERA));
        assert_ne!(RenderFlags::ROTATE_OBJECT, RenderFlags::ROTATE_CAMERA);
    }

    #[test]
    fn test_fault_message() {
        let fault = RendererFault::new("no swapchain");
        assert_eq!(fault.to_string(), "renderer fault: no swapchain");
    }
}
