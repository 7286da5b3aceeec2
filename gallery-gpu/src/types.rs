//! Host-side layouts shared with the WGSL shaders.

use glam::{Mat4, Vec3};

/// Mesh vertex: position, normal, uv.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-draw instance data.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// Linear rgb, alpha.
    pub color: [f32; 4],
    /// metalness, roughness, env intensity, unlit (0 or 1).
    pub material: [f32; 4],
    /// zoom, cover scale x, cover scale y, unused.
    pub image: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    pub fn new(model: Mat4, color: [f32; 4], material: [f32; 4], image: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            material,
            image,
        }
    }
}

/// Scene-wide uniforms: camera, fog, environment and pass flags.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub fog_color: [f32; 4],
    /// near, far, elapsed seconds, unused.
    pub fog: [f32; 4],
    /// Environment gradient; `env_sky.w` holds the intensity.
    pub env_sky: [f32; 4],
    pub env_horizon: [f32; 4],
    pub env_ground: [f32; 4],
    /// mirror plane height, reflection pass flag, viewport width, viewport height.
    pub mirror: [f32; 4],
}

impl SceneUniforms {
    pub fn from_matrices(view: Mat4, proj: Mat4, eye: Vec3) -> Self {
        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            camera_pos: eye.extend(1.0).to_array(),
            ..<Self as bytemuck::Zeroable>::zeroed()
        }
    }
}

/// Parameters of the reflective floor.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct ReflectorUniforms {
    /// Linear rgb, metalness.
    pub color: [f32; 4],
    /// blur x px, blur y px, mix blur, mix strength.
    pub blur: [f32; 4],
    /// roughness, depth scale, min depth threshold, max depth threshold.
    pub depth: [f32; 4],
    /// reflection target width, height, unused, unused.
    pub target: [f32; 4],
}
