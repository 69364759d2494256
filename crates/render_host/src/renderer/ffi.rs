//! FFI bindings to the external native renderer
//!
//! The engine ships as a prebuilt shared library named `prism`. Its call
//! surface takes plain scalars and raw pointers; ownership of every buffer
//! stays on this side of the boundary (the engine copies what it keeps).
//!
//! The library reports no errors; faults produced here come from the binding
//! layer itself (unsupported window-handle kind, interior NUL in a name).

#![allow(unsafe_code)]

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};

use raw_window_handle::RawWindowHandle;

use super::{
    RenderFlags, RendererBackend, RendererFault, RendererResult, StreamHandle, SwapchainTarget,
};

#[link(name = "prism")]
extern "C" {
    fn prism_init(msaa_sample_count: c_int, shared_context: u64, use_external_stream: c_int);
    fn prism_load_ibl();
    fn prism_load_mesh(name: *const c_char);
    fn prism_load_model(bytes: *const u8, len: usize);
    fn prism_resize(width: c_int, height: c_int);
    fn prism_destroy();
    fn prism_render(rotate_object: c_int, rotate_camera: c_int);
    fn prism_update_transform();
    fn prism_update_material(metallic: f32, roughness: f32, clear_coat: f32);
    fn prism_update_material_albedo(r: f32, g: f32, b: f32);
    fn prism_set_swapchain(native_window: *mut c_void);
    fn prism_set_camera_stream(stream: u64);
    fn prism_set_camera_texture(texture: u64, width: c_int, height: c_int);
    fn prism_finish();
    fn prism_is_ready() -> c_int;
}

/// Backend bound to the native `prism` engine library
#[derive(Debug, Default)]
pub struct NativeRenderer {
    initialized: bool,
}

impl NativeRenderer {
    /// Create an uninitialized native backend
    pub fn new() -> Self {
        Self::default()
    }

    fn window_pointer(target: &SwapchainTarget) -> RendererResult<*mut c_void> {
        match target {
            SwapchainTarget::Window(RawWindowHandle::AndroidNdk(handle)) => {
                Ok(handle.a_native_window)
            }
            SwapchainTarget::Window(other) => Err(RendererFault::new(format!(
                "unsupported window handle kind: {other:?}"
            ))),
            SwapchainTarget::Texture { .. } => Err(RendererFault::new(
                "texture-backed swapchain requires a platform surface",
            )),
        }
    }
}

impl RendererBackend for NativeRenderer {
    fn initialize(
        &mut self,
        sample_count: u32,
        shared_context: u64,
        use_external_stream: bool,
    ) -> RendererResult {
        unsafe {
            prism_init(
                sample_count as c_int,
                shared_context,
                c_int::from(use_external_stream),
            );
        }
        self.initialized = true;
        Ok(())
    }

    fn load_environment(&mut self) -> RendererResult {
        unsafe { prism_load_ibl() };
        Ok(())
    }

    fn load_mesh(&mut self, name: &str) -> RendererResult {
        let name = CString::new(name)
            .map_err(|_| RendererFault::new("mesh name contains interior NUL"))?;
        unsafe { prism_load_mesh(name.as_ptr()) };
        Ok(())
    }

    fn load_model_from_buffer(&mut self, bytes: &[u8]) -> RendererResult {
        unsafe { prism_load_model(bytes.as_ptr(), bytes.len()) };
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RendererResult {
        unsafe { prism_resize(width as c_int, height as c_int) };
        Ok(())
    }

    fn destroy(&mut self) -> RendererResult {
        unsafe { prism_destroy() };
        self.initialized = false;
        Ok(())
    }

    fn render(&mut self, flags: RenderFlags) -> RendererResult {
        unsafe {
            prism_render(
                c_int::from(flags.contains(RenderFlags::ROTATE_OBJECT)),
                c_int::from(flags.contains(RenderFlags::ROTATE_CAMERA)),
            );
        }
        Ok(())
    }

    fn update_transform(&mut self) -> RendererResult {
        unsafe { prism_update_transform() };
        Ok(())
    }

    fn update_material(
        &mut self,
        metallic: f32,
        roughness: f32,
        clear_coat: f32,
    ) -> RendererResult {
        unsafe { prism_update_material(metallic, roughness, clear_coat) };
        Ok(())
    }

    fn update_material_albedo(&mut self, r: f32, g: f32, b: f32) -> RendererResult {
        unsafe { prism_update_material_albedo(r, g, b) };
        Ok(())
    }

    fn bind_swapchain(&mut self, target: Option<&SwapchainTarget>) -> RendererResult {
        let pointer = match target {
            Some(target) => Self::window_pointer(target)?,
            None => std::ptr::null_mut(),
        };
        unsafe { prism_set_swapchain(pointer) };
        Ok(())
    }

    fn bind_camera_stream(&mut self, stream: Option<StreamHandle>) -> RendererResult {
        unsafe { prism_set_camera_stream(stream.map_or(0, |s| s.0)) };
        Ok(())
    }

    fn bind_camera_texture(&mut self, texture: u64, width: u32, height: u32) -> RendererResult {
        unsafe { prism_set_camera_texture(texture, width as c_int, height as c_int) };
        Ok(())
    }

    fn finish(&mut self) -> RendererResult {
        unsafe { prism_finish() };
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.initialized && unsafe { prism_is_ready() } != 0
    }
}
