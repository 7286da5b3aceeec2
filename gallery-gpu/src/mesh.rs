//! Procedural unit meshes: plane, box and rounded box.
//!
//! Every mesh spans `[-0.5, 0.5]` on its axes and is scaled into place by
//! its node's world matrix. Triangles wind counter-clockwise seen from the
//! outside.

use crate::types::Vertex;
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Unit plane in XY facing +Z. UV (0,0) is the top-left corner.
pub fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    push_face(&mut mesh, Vec3::ZERO, Vec3::X, Vec3::Y, &[-0.5, 0.5], |p, _| (p, Vec3::Z));
    mesh
}

/// Unit box with flat faces.
pub fn unit_box() -> MeshData {
    let mut mesh = MeshData::default();
    for (normal, u, v) in FACES {
        push_face(&mut mesh, normal * 0.5, u, v, &[-0.5, 0.5], |p, _| (p, normal));
    }
    mesh
}

/// Unit box whose edges and corners are rounded with `radius`, using
/// `smoothness` segments per quarter of the rounding on each face.
pub fn rounded_box(radius: f32, smoothness: u32) -> MeshData {
    let radius = radius.clamp(0.0, 0.5);
    if radius == 0.0 || smoothness == 0 {
        return unit_box();
    }
    let inner = 0.5 - radius;

    // Grid coordinates along one face axis: denser toward the rounded rims.
    let mut coords = Vec::with_capacity(2 * (smoothness as usize + 1));
    for k in 0..=smoothness {
        let theta = k as f32 / smoothness as f32 * std::f32::consts::FRAC_PI_2;
        coords.push(-inner - radius * theta.cos());
    }
    for k in (0..=smoothness).rev() {
        let theta = k as f32 / smoothness as f32 * std::f32::consts::FRAC_PI_2;
        coords.push(inner + radius * theta.cos());
    }

    let mut mesh = MeshData::default();
    for (normal, u, v) in FACES {
        push_face(&mut mesh, normal * 0.5, u, v, &coords, |p, face_normal| {
            let core = p.clamp(Vec3::splat(-inner), Vec3::splat(inner));
            let dir = (p - core).normalize_or(face_normal);
            (core + dir * radius, dir)
        });
    }
    mesh
}

/// (normal, u, v) per face with `u × v = normal`.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

fn push_face(
    mesh: &mut MeshData,
    center: Vec3,
    u: Vec3,
    v: Vec3,
    coords: &[f32],
    shape: impl Fn(Vec3, Vec3) -> (Vec3, Vec3),
) {
    let n = coords.len();
    let base = mesh.vertices.len() as u32;
    let face_normal = u.cross(v);
    let span = coords[n - 1] - coords[0];

    for &b in coords {
        for &a in coords {
            let (position, normal) = shape(center + u * a + v * b, face_normal);
            let uv = Vec2::new((a - coords[0]) / span, 1.0 - (b - coords[0]) / span);
            mesh.vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: uv.to_array(),
            });
        }
    }

    let n = n as u32;
    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let a = base + j * n + i;
            let b = a + 1;
            let c = a + n + 1;
            let d = a + n;
            mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward_winding(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            let n = |i: u32| Vec3::from_array(mesh.vertices[i as usize].normal);
            let face = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            if face.length() < 1e-9 {
                continue;
            }
            let avg = n(tri[0]) + n(tri[1]) + n(tri[2]);
            assert!(face.dot(avg) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn test_plane() {
        let mesh = plane();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_outward_winding(&mesh);
        // top-left corner carries uv (0, 0)
        let top_left = mesh
            .vertices
            .iter()
            .find(|v| v.position == [-0.5, 0.5, 0.0])
            .unwrap();
        assert_eq!(top_left.uv, [0.0, 0.0]);
    }

    #[test]
    fn test_unit_box() {
        let mesh = unit_box();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn test_rounded_box_stays_in_unit_bounds() {
        let mesh = rounded_box(0.1, 4);
        assert_eq!(mesh.vertices.len(), 6 * 10 * 10);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.abs().max_element() <= 0.5 + 1e-5);
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-4);
        }
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert_outward_winding(&mesh);
    }

    #[test]
    fn test_rounded_box_corners_are_cut() {
        let mesh = rounded_box(0.1, 4);
        let corner = Vec3::splat(0.5);
        let nearest = mesh
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).distance(corner))
            .fold(f32::INFINITY, f32::min);
        // the corner sphere sits 0.1 * (sqrt(3) - 1) inside the sharp corner
        assert!(nearest > 0.05);
    }

    #[test]
    fn test_zero_radius_falls_back_to_box() {
        assert_eq!(rounded_box(0.0, 4).vertices.len(), 24);
    }
}
