//! Pointer ray casting against pickable meshes.

use crate::graph::{NodeId, SceneGraph};
use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

/// Nearest pickable hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    /// World-space distance along the ray.
    pub distance: f32,
}

/// Distance along `ray` to the unit box `[-0.5, 0.5]^3` placed by `world`,
/// if it is hit in front of the origin.
pub fn intersect_box(ray: &Ray, world: &Mat4) -> Option<f32> {
    let inv = world.inverse();
    if !inv.is_finite() {
        return None;
    }
    // Affine transform keeps the ray parameter, so `t` stays world distance.
    let origin = inv.transform_point3(ray.origin);
    let dir = inv.transform_vector3(ray.direction);

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < f32::EPSILON {
            if !(-0.5..=0.5).contains(&o) {
                return None;
            }
            continue;
        }
        let a = (-0.5 - o) / d;
        let b = (0.5 - o) / d;
        t_min = t_min.max(a.min(b));
        t_max = t_max.min(a.max(b));
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        None
    } else if t_min >= 0.0 {
        Some(t_min)
    } else {
        Some(t_max)
    }
}

/// Cast `ray` against every pickable mesh and return the nearest hit.
pub fn pick(graph: &SceneGraph, ray: &Ray) -> Option<Hit> {
    let worlds = graph.world_matrices();
    graph
        .ids()
        .filter(|id| graph.node(*id).as_mesh().is_some_and(|m| m.pickable))
        .filter_map(|id| {
            intersect_box(ray, &worlds[id.index()]).map(|distance| Hit { node: id, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Mesh, Node, Transform};
    use crate::material::{Geometry, Material};
    use crate::layout::card_material;

    fn card(pickable: bool) -> Mesh {
        Mesh {
            geometry: Geometry::Box,
            material: Material::Standard(card_material()),
            pickable,
        }
    }

    #[test]
    fn test_ray_hits_scaled_box() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 2.0, 0.1),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 0.0, -3.0),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let t = intersect_box(&ray, &world).unwrap();
        assert!((t - 2.95).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(0.6, 0.0, 0.0), Vec3::NEG_Z);
        assert!(intersect_box(&miss, &world).is_none());

        let behind = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect_box(&behind, &world).is_none());
    }

    #[test]
    fn test_pick_returns_nearest_pickable() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let far = graph.add(
            root,
            Node::mesh(Transform::from_translation(Vec3::new(0.0, 0.0, -5.0)), card(true)),
        );
        let near = graph.add(
            root,
            Node::mesh(Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)), card(true)),
        );
        graph.add(
            root,
            Node::mesh(Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)), card(false)),
        );

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = pick(&graph, &ray).unwrap();
        assert_eq!(hit.node, near);
        assert!((hit.distance - 1.5).abs() < 1e-5);

        let side = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(pick(&graph, &side).is_none());
        assert_ne!(hit.node, far);
    }
}
