//! Math utilities and types

pub use nalgebra::Vector3;

/// 3D vector type, used for RGB albedo values
pub type Vec3 = Vector3<f32>;
