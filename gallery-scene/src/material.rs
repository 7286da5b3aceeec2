//! Geometry and material descriptions attached to mesh nodes.
//!
//! These are plain data. The GPU crate decides how to draw each variant.

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Unit box with rounded edges.
    RoundedBox { radius: f32, smoothness: u32 },
    /// Unit box, `[-0.5, 0.5]` on every axis.
    Box,
    /// Unit plane in XY facing +Z, `[-0.5, 0.5]` on X and Y.
    Plane,
}

/// Physically based surface lit by the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
}

/// Unlit flat color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    pub tone_mapped: bool,
}

/// Blurred planar reflection mixed over a standard surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectorMaterial {
    /// Blur kernel size in pixels (x, y).
    pub blur: [f32; 2],
    /// Long side of the reflection target, in pixels.
    pub resolution: u32,
    /// How much the blurred reflection replaces the sharp one.
    pub mix_blur: f32,
    /// Reflection strength multiplier.
    pub mix_strength: f32,
    pub roughness: f32,
    pub depth_scale: f32,
    pub min_depth_threshold: f32,
    pub max_depth_threshold: f32,
    pub color: Color,
    pub metalness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Basic(BasicMaterial),
    /// Image texture of a frame slot, by slot index.
    Image { slot: usize },
    Reflector(ReflectorMaterial),
}
