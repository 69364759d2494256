//! # Render Host
//!
//! A host library for an external native PBR renderer. The engine itself is a
//! prebuilt third-party library reached through a foreign-function boundary;
//! this crate owns everything that sits in front of it:
//!
//! - **Material palette**: named presets parsed from a small XML document
//! - **Render session**: the owned, lifetime-scoped coordination object
//!   (current material, dirty flag, surface binding, camera bridge)
//! - **Frame driver**: the per-vsync callback state machine
//! - **Renderer boundary**: the fixed call surface as a trait, with every
//!   call wrapped in a `Result` so faults have a uniform seam
//! - **Asset store**: bundled asset enumeration, whole-buffer model loading,
//!   and a copy-once cache utility
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use render_host::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ViewerConfig::default();
//!     let store = AssetStore::new(&config.asset_root);
//!     let mut presets = std::collections::HashMap::new();
//!     let text = store.read_to_string(render_host::assets::PALETTE_FILE)?;
//!     if let Err(e) = PaletteParser::parse_into(&text, &mut presets) {
//!         log::warn!("palette parse failed: {e}");
//!     }
//!     let palette = MaterialPalette::from_presets(presets);
//!     println!("{} presets loaded", palette.len());
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod camera;
pub mod config;
pub mod events;
pub mod foundation;
pub mod frame;
pub mod palette;
pub mod renderer;
pub mod session;
pub mod surface;

/// Common imports for host users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetStore, Catalog, CatalogEntry},
        camera::{CameraBridge, CameraDevice, CameraError, CameraProvider, StreamMode},
        config::{Config, ConfigError, ViewerConfig},
        events::{EventQueue, Selection, Slider, Toggle, UiEvent},
        foundation::{math::Vec3, time::Timer},
        frame::{DriverState, FrameDriver, FrameScheduler},
        palette::{Material, MaterialPalette, PaletteError, PaletteParser},
        renderer::{
            RenderFlags, RendererBackend, RendererFault, RendererResult, StreamHandle,
            SwapchainTarget,
        },
        session::RenderSession,
        surface::{SurfaceBinding, TargetKind},
    };
}
