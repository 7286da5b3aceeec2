//! Texture upload and render targets.

use image::imageops::FilterType;
use std::path::Path;
use tracing::debug;
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Colour target of the floor reflection; float so alpha can carry height.
pub const REFLECTION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("image {0} has zero size")]
    Empty(String),
}

/// A texture together with its default view and pixel size.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    /// Upload an RGBA8 sRGB image.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &image::RgbaImage,
    ) -> Self {
        let (width, height) = image.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        debug!("Uploaded texture {label} ({width}x{height})");
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// 1x1 texture of a single colour, shown until an image is available.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4]) -> Self {
        let image = image::RgbaImage::from_pixel(1, 1, image::Rgba(rgba));
        Self::from_rgba(device, queue, "placeholder", &image)
    }

    /// Render target texture usable as both attachment and shader input.
    pub fn render_target(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    pub fn depth(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        Self::render_target(device, label, width, height, DEPTH_FORMAT)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Decode an image file into RGBA8.
pub fn decode_file(path: &Path) -> Result<image::RgbaImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = image.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TextureError::Empty(path.display().to_string()));
    }
    Ok(rgba)
}

/// Scale `image` down, keeping its aspect ratio, so neither side exceeds
/// `max_dimension`. Images already within the limit are returned unchanged.
pub fn fit_to_limit(image: image::RgbaImage, max_dimension: u32) -> image::RgbaImage {
    let (width, height) = image.dimensions();
    let long = width.max(height);
    if long <= max_dimension || max_dimension == 0 {
        return image;
    }
    let scale = max_dimension as f64 / long as f64;
    let target_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
    let target_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);
    debug!("Downscaling {width}x{height} image to {target_width}x{target_height}");
    image::imageops::resize(&image, target_width, target_height, FilterType::Triangle)
}

/// Linear filtering, clamped at the edges.
pub fn linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Scale applied to centred uvs so an image of `image_aspect` covers a plane
/// of `plane_aspect` without stretching (the overflowing axis is cropped).
pub fn cover_scale(image_aspect: f32, plane_aspect: f32) -> [f32; 2] {
    if image_aspect <= 0.0 || plane_aspect <= 0.0 {
        return [1.0, 1.0];
    }
    if image_aspect > plane_aspect {
        [plane_aspect / image_aspect, 1.0]
    } else {
        [1.0, image_aspect / plane_aspect]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_scale_crops_wide_images_horizontally() {
        let [sx, sy] = cover_scale(2.0, 0.5);
        assert!((sx - 0.25).abs() < 1e-6);
        assert_eq!(sy, 1.0);
    }

    #[test]
    fn test_cover_scale_crops_tall_images_vertically() {
        let [sx, sy] = cover_scale(0.5, 1.0);
        assert_eq!(sx, 1.0);
        assert!((sy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cover_scale_identity_for_matching_aspect() {
        assert_eq!(cover_scale(1.5, 1.5), [1.0, 1.0]);
        assert_eq!(cover_scale(0.0, 1.5), [1.0, 1.0]);
    }

    #[test]
    fn test_fit_to_limit_shrinks_oversized_images() {
        let wide = image::RgbaImage::new(9000, 2);
        let fitted = fit_to_limit(wide, 8192);
        assert_eq!(fitted.dimensions(), (8192, 2));

        let tall = image::RgbaImage::new(300, 1000);
        let fitted = fit_to_limit(tall, 500);
        assert_eq!(fitted.dimensions(), (150, 500));
    }

    #[test]
    fn test_fit_to_limit_keeps_small_images() {
        let small = image::RgbaImage::from_pixel(4, 3, image::Rgba([9, 8, 7, 255]));
        let fitted = fit_to_limit(small.clone(), 8192);
        assert_eq!(fitted, small);
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let err = decode_file(Path::new("/no/such/image.png")).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }
}
