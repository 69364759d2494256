//! Render surface binding
//!
//! Owns the platform drawing target the engine presents into and relays
//! surface lifecycle to the renderer. Exactly one target is bound at a time;
//! a kind toggle always detaches the old target before attaching the new
//! one. All calls happen on the UI thread.

use crate::renderer::{RendererBackend, RendererResult, SwapchainTarget};

/// The two mutually exclusive kinds of drawing target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Exclusive platform window surface
    Window,
    /// Composited texture-backed surface
    Texture,
}

impl SwapchainTarget {
    /// Which of the two target kinds this is
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Window(_) => TargetKind::Window,
            Self::Texture { .. } => TargetKind::Texture,
        }
    }
}

/// Binding between the engine and the active drawing target.
///
/// Holds the active target and the parked target of the other kind, so a
/// kind toggle can swap between the two without the caller re-supplying
/// handles.
#[derive(Debug)]
pub struct SurfaceBinding {
    active: SwapchainTarget,
    parked: SwapchainTarget,
    bound: bool,
    width: u32,
    height: u32,
}

impl SurfaceBinding {
    /// Create an unbound surface binding.
    ///
    /// `active` and `parked` should be of different kinds; toggling swaps
    /// between them.
    pub fn new(active: SwapchainTarget, parked: SwapchainTarget, width: u32, height: u32) -> Self {
        if active.kind() == parked.kind() {
            log::warn!("surface binding created with two targets of the same kind");
        }
        Self {
            active,
            parked,
            bound: false,
            width,
            height,
        }
    }

    /// Kind of the currently active target
    pub fn kind(&self) -> TargetKind {
        self.active.kind()
    }

    /// Whether the active target is currently bound to the engine
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Desired pixel dimensions of the drawing target
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bind the active target to the engine and push the current size
    pub fn attach(&mut self, renderer: &mut dyn RendererBackend) -> RendererResult {
        if self.bound {
            renderer.bind_swapchain(None)?;
        }
        renderer.bind_swapchain(Some(&self.active))?;
        renderer.resize(self.width, self.height)?;
        self.bound = true;
        Ok(())
    }

    /// Notify the engine the drawing target is gone
    pub fn detach(&mut self, renderer: &mut dyn RendererBackend) -> RendererResult {
        if self.bound {
            renderer.bind_swapchain(None)?;
            self.bound = false;
        }
        Ok(())
    }

    /// Update the desired pixel dimensions and notify the engine
    pub fn resize(
        &mut self,
        renderer: &mut dyn RendererBackend,
        width: u32,
        height: u32,
    ) -> RendererResult {
        self.width = width;
        self.height = height;
        renderer.resize(width, height)
    }

    /// Switch to the other target kind.
    ///
    /// Issues exactly one detach and one attach: the engine never sees two
    /// live targets.
    pub fn toggle(&mut self, renderer: &mut dyn RendererBackend) -> RendererResult {
        let was_bound = self.bound;
        self.detach(renderer)?;
        std::mem::swap(&mut self.active, &mut self.parked);
        log::info!("render target switched to {:?}", self.kind());
        if was_bound {
            self.attach(renderer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::mock::{Call, ScriptedRenderer};

    fn test_binding() -> SurfaceBinding {
        use raw_window_handle::{AndroidNdkWindowHandle, RawWindowHandle};
        SurfaceBinding::new(
            SwapchainTarget::Window(RawWindowHandle::AndroidNdk(AndroidNdkWindowHandle::empty())),
            SwapchainTarget::Texture { texture: 7 },
            1920,
            1080,
        )
    }

    #[test]
    fn test_attach_binds_and_resizes() {
        let mut renderer = ScriptedRenderer::new();
        let mut binding = test_binding();
        binding.attach(&mut renderer).unwrap();
        assert!(binding.is_bound());
        assert_eq!(
            renderer.calls(),
            &[
                Call::BindSwapchain { bound: true },
                Call::Resize {
                    width: 1920,
                    height: 1080,
                },
            ]
        );
    }

    #[test]
    fn test_detach_when_unbound_is_noop() {
        let mut renderer = ScriptedRenderer::new();
        let mut binding = test_binding();
        binding.detach(&mut renderer).unwrap();
        assert!(renderer.calls().is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_kind_with_one_pair_each() {
        let mut renderer = ScriptedRenderer::new();
        let mut binding = test_binding();
        binding.attach(&mut renderer).unwrap();
        let original_kind = binding.kind();
        renderer.clear_calls();

        binding.toggle(&mut renderer).unwrap();
        assert_eq!(binding.kind(), TargetKind::Texture);
        assert_eq!(
            renderer.count(|c| matches!(c, Call::BindSwapchain { bound: false })),
            1
        );
        assert_eq!(
            renderer.count(|c| matches!(c, Call::BindSwapchain { bound: true })),
            1
        );

        renderer.clear_calls();
        binding.toggle(&mut renderer).unwrap();
        assert_eq!(binding.kind(), original_kind);
        assert_eq!(
            renderer.count(|c| matches!(c, Call::BindSwapchain { bound: false })),
            1
        );
        assert_eq!(
            renderer.count(|c| matches!(c, Call::BindSwapchain { bound: true })),
            1
        );
    }

    #[test]
    fn test_toggle_while_unbound_stays_unbound() {
        let mut renderer = ScriptedRenderer::new();
        let mut binding = test_binding();
        binding.toggle(&mut renderer).unwrap();
        assert_eq!(binding.kind(), TargetKind::Texture);
        assert!(!binding.is_bound());
        assert!(renderer.calls().is_empty());
    }
}
