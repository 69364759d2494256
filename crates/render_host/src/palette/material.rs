//! Material parameters and the preset store

use std::collections::HashMap;

use crate::foundation::math::Vec3;

/// PBR material parameters forwarded to the external renderer.
///
/// Values outside `[0, 1]` are accepted and passed through uninterpreted;
/// the engine is the arbiter of what they mean.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
    /// Clear coat layer strength
    pub clear_coat: f32,
    /// Base color (albedo) - RGB values
    pub albedo: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            metallic: 1.0,
            roughness: 0.7,
            clear_coat: 0.0,
            albedo: Vec3::zeros(),
        }
    }
}

/// Read-only store of named material presets
#[derive(Debug, Clone, Default)]
pub struct MaterialPalette {
    presets: HashMap<String, Material>,
}

impl MaterialPalette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a palette from an already-parsed preset map
    pub fn from_presets(presets: HashMap<String, Material>) -> Self {
        Self { presets }
    }

    /// Look up a preset by name
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.presets.get(name)
    }

    /// Preset names in sorted order, as a selection UI would display them
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of presets in the store
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the store holds no presets
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
