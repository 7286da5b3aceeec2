//! Gallery GPU Crate
//!
//! wgpu device setup, typed resource handles, pipeline and buffer builders,
//! procedural meshes, texture upload, and the WGSL shaders used to draw the
//! gallery.

pub mod builder;
pub mod mesh;
pub mod pipeline;
pub mod registry;
pub mod shaders;
pub mod surface;
pub mod texture;
pub mod types;

pub use builder::{BufferBuildError, BufferBuilder, BufferUsage};
pub use mesh::MeshData;
pub use pipeline::{PipelineBuildError, RenderPipelineBuilder};
pub use registry::{Handle, ResourceRegistry};
pub use surface::SurfaceWrapper;
pub use texture::{GpuTexture, TextureError};
pub use types::{InstanceRaw, ReflectorUniforms, SceneUniforms, Vertex};
pub use wgpu;

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Request Adapter Error: {0}")]
    RequestAdapterError(#[from] wgpu::RequestAdapterError),
    #[error("Request Device Error: {0}")]
    RequestDeviceError(#[from] wgpu::RequestDeviceError),
    #[error("Create surface error: {0}")]
    CreateSurfaceError(#[from] wgpu::CreateSurfaceError),
    #[error("Surface is not supported by the adapter")]
    UnsupportedSurface,
}

/// Owns the wgpu instance, adapter, device and queue.
pub struct Renderer {
    // Held for the lifetime of the surfaces created from it.
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Renderer {
    /// Create a wgpu instance configured from the environment.
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default())
    }

    /// Pick an adapter (compatible with `surface`, if given) and open a device.
    pub async fn new(
        instance: wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, RendererError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: surface,
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            "Using adapter {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Renderer"),
                ..Default::default()
            })
            .await?;

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Configure `surface` for presentation, preferring an sRGB format.
    pub fn configure_surface(
        &self,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<SurfaceWrapper, RendererError> {
        let caps = surface.get_capabilities(&self.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RendererError::UnsupportedSurface)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&self.device, &config);
        info!("Surface configured: {:?} {}x{}", format, config.width, config.height);
        Ok(SurfaceWrapper::new(surface, config))
    }

    /// Start building a buffer on this device.
    pub fn create_buffer(&self) -> BufferBuilder<'_> {
        BufferBuilder::new(&self.device)
    }
}
