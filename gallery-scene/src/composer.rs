//! Static scene declaration: background, fog, lighting, and the reflective
//! floor that the frames stand on.

use crate::color::Color;
use crate::graph::{Mesh, Node, NodeId, SceneGraph, Transform};
use crate::material::{Geometry, Material, ReflectorMaterial};
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Edge length of the square floor plane.
pub const FLOOR_SIZE: f32 = 100.0;

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fog amount at a view-space depth, `smoothstep(near, far, depth)`.
    pub fn factor(&self, depth: f32) -> f32 {
        if self.far <= self.near {
            return if depth >= self.far { 1.0 } else { 0.0 };
        }
        let t = ((depth - self.near) / (self.far - self.near)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }
}

/// Built-in image-based lighting presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentPreset {
    City,
}

/// Procedural environment: a sky/horizon/ground gradient used for ambient
/// light and reflections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentLighting {
    pub sky: Color,
    pub horizon: Color,
    pub ground: Color,
    pub intensity: f32,
}

impl EnvironmentPreset {
    pub fn lighting(&self) -> EnvironmentLighting {
        match self {
            EnvironmentPreset::City => EnvironmentLighting {
                sky: Color::from_srgb(0xb8, 0xc4, 0xd6),
                horizon: Color::from_srgb(0xe8, 0xd2, 0xb0),
                ground: Color::from_srgb(0x3a, 0x38, 0x36),
                intensity: 1.0,
            },
        }
    }
}

/// Scene-wide render settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub background: Color,
    pub fog: Fog,
    pub environment: EnvironmentPreset,
    /// Offset of the group holding frames and floor.
    pub stage_offset: Vec3,
}

impl Default for SceneSettings {
    fn default() -> Self {
        let background = Color::from_srgb(0x19, 0x19, 0x20);
        Self {
            background,
            fog: Fog {
                color: background,
                near: 0.0,
                far: 10.0,
            },
            environment: EnvironmentPreset::City,
            stage_offset: Vec3::new(0.0, -0.5, 0.0),
        }
    }
}

pub fn floor_material() -> ReflectorMaterial {
    ReflectorMaterial {
        blur: [300.0, 100.0],
        resolution: 2048,
        mix_blur: 1.0,
        mix_strength: 60.0,
        roughness: 1.0,
        depth_scale: 1.2,
        min_depth_threshold: 0.4,
        max_depth_threshold: 1.4,
        color: Color::from_srgb(0x15, 0x15, 0x15),
        metalness: 0.5,
    }
}

/// Nodes created by [`compose`].
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub stage: NodeId,
    /// Parent of every frame slot group.
    pub frames: NodeId,
    pub floor: NodeId,
}

/// Declare the stage, the (empty) frames group and the floor.
pub fn compose(graph: &mut SceneGraph, settings: &SceneSettings) -> Stage {
    let root = graph.root();
    let stage = graph.add(
        root,
        Node::group(Transform::from_translation(settings.stage_offset)),
    );
    let frames = graph.add(stage, Node::group(Transform::IDENTITY));
    let floor = graph.add(
        stage,
        Node::mesh(
            Transform::IDENTITY
                .with_rotation(Quat::from_rotation_x(-FRAC_PI_2))
                .with_scale(Vec3::new(FLOOR_SIZE, FLOOR_SIZE, 1.0)),
            Mesh {
                geometry: Geometry::Plane,
                material: Material::Reflector(floor_material()),
                pickable: false,
            },
        ),
    );
    Stage {
        stage,
        frames,
        floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_faces_up_at_stage_height() {
        let mut graph = SceneGraph::new();
        let stage = compose(&mut graph, &SceneSettings::default());

        let normal = graph.world_rotation(stage.floor) * Vec3::Z;
        assert!((normal - Vec3::Y).length() < 1e-5);

        let corner = graph.local_to_world(stage.floor, Vec3::new(0.5, 0.5, 0.0));
        assert!((corner.y + 0.5).abs() < 1e-5);
        assert!((corner.x - FLOOR_SIZE / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_fog_ramp() {
        let fog = SceneSettings::default().fog;
        assert_eq!(fog.factor(-1.0), 0.0);
        assert_eq!(fog.factor(0.0), 0.0);
        assert!((fog.factor(5.0) - 0.5).abs() < 1e-6);
        assert_eq!(fog.factor(10.0), 1.0);
        assert_eq!(fog.factor(50.0), 1.0);
    }

    #[test]
    fn test_fog_matches_background() {
        let settings = SceneSettings::default();
        assert_eq!(settings.fog.color, settings.background);
    }
}
