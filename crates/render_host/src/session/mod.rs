//! Render session
//!
//! The owned coordination object for one renderer-hosting session: the
//! current material and its dirty flag, the preset palette, rotation flags,
//! the surface binding, and the camera bridge. The session is created by
//! whoever hosts the renderer, passed by reference to whatever UI currently
//! needs it, and torn down with an explicit [`RenderSession::shutdown`] call
//! rather than process-wide retention.
//!
//! All methods run on the UI thread.

use crate::camera::CameraBridge;
use crate::config::ViewerConfig;
use crate::frame::{FrameDriver, FrameScheduler};
use crate::palette::{Material, MaterialPalette};
use crate::renderer::{RenderFlags, RendererBackend, RendererResult};
use crate::surface::SurfaceBinding;

/// One renderer-hosting session
pub struct RenderSession {
    material: Material,
    material_dirty: bool,
    palette: MaterialPalette,
    flags: RenderFlags,
    surface: SurfaceBinding,
    camera: CameraBridge,
    camera_requested: bool,
    msaa_samples: u32,
    shared_context: u64,
}

impl RenderSession {
    /// Create a session from configuration and its collaborating parts
    pub fn new(
        config: &ViewerConfig,
        palette: MaterialPalette,
        surface: SurfaceBinding,
        camera: CameraBridge,
    ) -> Self {
        let mut flags = RenderFlags::empty();
        flags.set(RenderFlags::ROTATE_OBJECT, config.object_rotation);
        flags.set(RenderFlags::ROTATE_CAMERA, config.camera_rotation);
        Self {
            material: Material::default(),
            material_dirty: false,
            palette,
            flags,
            surface,
            camera,
            camera_requested: false,
            msaa_samples: config.msaa_samples,
            shared_context: 0,
        }
    }

    /// Initialize the engine and attach the drawing surface
    pub fn initialize(&mut self, renderer: &mut dyn RendererBackend) -> RendererResult {
        let use_external_stream =
            self.camera.mode() == crate::camera::StreamMode::ExternalImage;
        renderer.initialize(self.msaa_samples, self.shared_context, use_external_stream)?;
        self.surface.attach(renderer)?;
        log::info!(
            "session initialized ({}x{}, {} msaa sample(s))",
            self.surface.size().0,
            self.surface.size().1,
            self.msaa_samples
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Material state

    /// Snapshot of the current material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// The preset palette this session selects from
    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    /// Whether the current material differs from what the engine last saw
    pub fn is_material_dirty(&self) -> bool {
        self.material_dirty
    }

    /// Copy a named preset's fields into the current material and mark it
    /// pending. Returns `false` when no preset has that name.
    pub fn select_preset(&mut self, name: &str) -> bool {
        match self.palette.get(name) {
            Some(preset) => {
                self.material = preset.clone();
                self.material_dirty = true;
                log::debug!("preset {name:?} selected");
                true
            }
            None => {
                log::warn!("unknown material preset {name:?}");
                false
            }
        }
    }

    /// Set the metallic factor (slider semantics)
    pub fn set_metallic(&mut self, value: f32) {
        self.material.metallic = value;
        self.material_dirty = true;
    }

    /// Set the roughness factor (slider semantics)
    pub fn set_roughness(&mut self, value: f32) {
        self.material.roughness = value;
        self.material_dirty = true;
    }

    /// Set the clear coat factor (slider semantics)
    pub fn set_clear_coat(&mut self, value: f32) {
        self.material.clear_coat = value;
        self.material_dirty = true;
    }

    /// Push the current material to the engine if it is pending, clearing
    /// the flag on success
    pub fn flush_material(&mut self, renderer: &mut dyn RendererBackend) -> RendererResult {
        if !self.material_dirty {
            return Ok(());
        }
        renderer.update_material(
            self.material.metallic,
            self.material.roughness,
            self.material.clear_coat,
        )?;
        renderer.update_material_albedo(
            self.material.albedo[0],
            self.material.albedo[1],
            self.material.albedo[2],
        )?;
        self.material_dirty = false;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rotation flags

    /// Current per-frame rotation flags
    pub fn render_flags(&self) -> RenderFlags {
        self.flags
    }

    /// Toggle the object's spin
    pub fn set_object_rotation(&mut self, enabled: bool) {
        self.flags.set(RenderFlags::ROTATE_OBJECT, enabled);
    }

    /// Toggle the camera orbit
    pub fn set_camera_rotation(&mut self, enabled: bool) {
        self.flags.set(RenderFlags::ROTATE_CAMERA, enabled);
    }

    // ------------------------------------------------------------------
    // Camera

    /// Whether camera streaming has been requested by the user
    pub fn is_camera_requested(&self) -> bool {
        self.camera_requested
    }

    /// Start camera streaming now and keep it on across pauses
    pub fn start_camera(&mut self, renderer: &mut dyn RendererBackend) {
        self.camera_requested = true;
        if let Err(e) = self.camera.start(renderer) {
            log::warn!("camera start failed: {e}");
        }
    }

    /// Stop camera streaming and forget the request
    pub fn stop_camera(&mut self, renderer: &mut dyn RendererBackend) {
        self.camera_requested = false;
        self.camera.stop(renderer);
    }

    /// Pull the latest camera frame, when texture streaming is active
    pub fn pull_camera_frame(&mut self) {
        self.camera.pull_frame();
    }

    // ------------------------------------------------------------------
    // Surface

    /// The surface binding this session presents into
    pub fn surface(&self) -> &SurfaceBinding {
        &self.surface
    }

    /// Switch the drawing target to the other kind
    pub fn toggle_surface_kind(&mut self, renderer: &mut dyn RendererBackend) -> RendererResult {
        self.surface.toggle(renderer)
    }

    /// Update the desired surface dimensions
    pub fn resize_surface(
        &mut self,
        renderer: &mut dyn RendererBackend,
        width: u32,
        height: u32,
    ) -> RendererResult {
        self.surface.resize(renderer, width, height)
    }

    // ------------------------------------------------------------------
    // Lifecycle

    /// Foregrounded: arm the frame driver and restart the camera if it was
    /// streaming when the session was paused
    pub fn resume(
        &mut self,
        driver: &mut FrameDriver,
        scheduler: &mut dyn FrameScheduler,
        renderer: &mut dyn RendererBackend,
    ) {
        log::info!("session resumed");
        driver.resume(scheduler);
        if self.camera_requested {
            if let Err(e) = self.camera.start(renderer) {
                log::warn!("camera restart failed: {e}");
            }
        }
    }

    /// Backgrounded: cancel the frame driver and stop the camera, keeping
    /// the streaming request for the next resume
    pub fn pause(
        &mut self,
        driver: &mut FrameDriver,
        scheduler: &mut dyn FrameScheduler,
        renderer: &mut dyn RendererBackend,
    ) {
        log::info!("session paused");
        driver.pause(scheduler);
        self.camera.stop(renderer);
    }

    /// Explicit teardown: stop the camera, detach the surface, and shut the
    /// engine down. Consumes the session.
    pub fn shutdown(mut self, renderer: &mut dyn RendererBackend) {
        log::info!("session shutting down");
        self.camera.stop(renderer);
        if let Err(fault) = self.surface.detach(renderer) {
            log::warn!("surface detach failed during shutdown: {fault}");
        }
        if let Err(fault) = renderer.destroy() {
            log::warn!("engine destroy failed during shutdown: {fault}");
        }
        if let Err(fault) = renderer.finish() {
            log::warn!("engine finish failed during shutdown: {fault}");
        }
    }
}

impl std::fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("material", &self.material)
            .field("material_dirty", &self.material_dirty)
            .field("flags", &self.flags)
            .field("camera_requested", &self.camera_requested)
            .finish()
    }
}
