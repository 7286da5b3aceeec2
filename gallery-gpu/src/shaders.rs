//! WGSL sources embedded at compile time.
//!
//! Every module exposes `vs_main` and `fs_main` and shares the scene uniform
//! block at group 0.

/// Lit and unlit meshes: frame cards and white mats.
pub const STANDARD: &str = include_str!("../shaders/standard.wgsl");

/// Textured image planes with cover fit and zoom.
pub const IMAGE: &str = include_str!("../shaders/image.wgsl");

/// Reflective floor sampling the mirrored scene.
pub const REFLECTOR: &str = include_str!("../shaders/reflector.wgsl");

/// Create a shader module from WGSL source.
pub fn create_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
