//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::camera::StreamMode;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load configuration from file, falling back to defaults when the file
    /// is absent or unreadable
    fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::info!("using default configuration ({path}: {e})");
                Self::default()
            }
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Desired drawing surface width in pixels
    pub surface_width: u32,

    /// Desired drawing surface height in pixels
    pub surface_height: u32,

    /// MSAA sample count forwarded to the engine
    pub msaa_samples: u32,

    /// How camera frames reach the engine; fixed for the process lifetime
    pub stream_mode: StreamMode,

    /// GPU texture handle used in texture-object streaming mode
    pub camera_texture: u64,

    /// Root directory of the bundled asset hierarchy
    pub asset_root: String,

    /// Environment selected at startup
    pub default_environment: String,

    /// Model loaded at startup
    pub default_model: String,

    /// Whether the displayed object spins by default
    pub object_rotation: bool,

    /// Whether the camera orbits by default
    pub camera_rotation: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            surface_width: 1920,
            surface_height: 1080,
            msaa_samples: 1,
            stream_mode: StreamMode::ExternalImage,
            camera_texture: 0,
            asset_root: "resources".to_string(),
            default_environment: "river".to_string(),
            default_model: "cube_1m_centered.glb".to_string(),
            object_rotation: true,
            camera_rotation: false,
        }
    }
}

impl Config for ViewerConfig {}
