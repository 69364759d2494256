//! Asset management
//!
//! The bundled asset hierarchy: meshes, binary models, environment lighting
//! sets, and the material palette document. Assets are read whole — models
//! are forwarded to the engine as one buffer, with no streaming, chunking,
//! or partial-failure handling.

pub mod cache;

pub use cache::ensure_cached;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::renderer::{RendererBackend, RendererFault};

/// Subdirectory holding meshes the engine loads from its own asset source
pub const MESH_DIR: &str = "mesh";
/// Subdirectory holding binary 3-D models
pub const MODEL_DIR: &str = "models";
/// Subdirectory holding environment lighting sets
pub const ENV_DIR: &str = "env";
/// The material palette document
pub const PALETTE_FILE: &str = "materials.xml";

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine faulted while consuming the asset
    #[error(transparent)]
    Renderer(#[from] RendererFault),
}

/// Rooted store over the bundled asset hierarchy
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted file names in a subdirectory, as a selection UI would display
    /// them. An enumeration failure substitutes a single placeholder entry.
    pub fn list(&self, subdir: &str, placeholder: &str) -> Vec<String> {
        let dir = self.root.join(subdir);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("asset listing failed for {}: {e}", dir.display());
                return vec![placeholder.to_string()];
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        if names.is_empty() {
            return vec![placeholder.to_string()];
        }
        names.sort_unstable();
        names
    }

    /// Read a whole asset into memory
    pub fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.root.join(path);
        if !full.exists() {
            return Err(AssetError::NotFound(path.to_string()));
        }
        Ok(fs::read(full)?)
    }

    /// Read a whole text asset into a string
    pub fn read_to_string(&self, path: &str) -> Result<String, AssetError> {
        let full = self.root.join(path);
        if !full.exists() {
            return Err(AssetError::NotFound(path.to_string()));
        }
        Ok(fs::read_to_string(full)?)
    }
}

/// Read a named model whole and forward the buffer to the engine
pub fn load_model(
    store: &AssetStore,
    renderer: &mut dyn RendererBackend,
    name: &str,
) -> Result<(), AssetError> {
    let path = format!("{MODEL_DIR}/{name}");
    let bytes = store.read(&path)?;
    log::info!("loading model {name} ({} bytes)", bytes.len());
    renderer.load_model_from_buffer(&bytes)?;
    Ok(())
}

/// Ask the engine to load a named mesh from its own asset source
pub fn load_mesh(renderer: &mut dyn RendererBackend, name: &str) -> Result<(), AssetError> {
    log::info!("loading mesh {name}");
    renderer.load_mesh(&format!("{MODEL_DIR}/{name}"))?;
    Ok(())
}

/// Ask the engine to load its built-in environment lighting
pub fn load_environment(renderer: &mut dyn RendererBackend) -> Result<(), AssetError> {
    log::info!("loading environment lighting");
    renderer.load_environment()?;
    Ok(())
}

/// One selectable entry in the render catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    /// A mesh the engine loads from its own asset source
    Mesh(String),
    /// A binary model forwarded as a buffer
    Model(String),
}

impl CatalogEntry {
    /// The displayed name of the entry
    pub fn name(&self) -> &str {
        match self {
            Self::Mesh(name) | Self::Model(name) => name,
        }
    }
}

/// Merged, name-sorted list of mesh and model entries for selection UIs
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build the catalog from the store's mesh and model subdirectories
    pub fn from_store(store: &AssetStore) -> Self {
        let mut entries: Vec<CatalogEntry> = store
            .list(MESH_DIR, "No mesh found")
            .into_iter()
            .map(CatalogEntry::Mesh)
            .chain(
                store
                    .list(MODEL_DIR, "No model found")
                    .into_iter()
                    .map(CatalogEntry::Model),
            )
            .collect();
        // Sorted by displayed name across both kinds
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Self { entries }
    }

    /// All entries in display order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Position of the entry with the given name, for default selections
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|e| e.name().cmp(name))
            .ok()
    }
}
