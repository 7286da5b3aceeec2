//! Render delegate drawing a [`Gallery`]: a mirrored pass into the floor's
//! reflection target, then the main pass to the surface.

use crate::app::{RenderContext, RenderDelegate};
use crate::input::InputEvent;
use crate::loader::ImageLoader;
use gallery_gpu::texture::{self, DEPTH_FORMAT, REFLECTION_FORMAT};
use gallery_gpu::wgpu;
use gallery_gpu::{
    BufferBuildError, BufferUsage, GpuTexture, Handle, InstanceRaw, MeshData, PipelineBuildError,
    ReflectorUniforms, RenderPipelineBuilder, Renderer, ResourceRegistry, SceneUniforms, Vertex,
    mesh, shaders,
};
use gallery_scene::composer::floor_material;
use gallery_scene::{
    CameraConfig, Cursor, DrawItem, Gallery, Geometry, Material, Projection, ReflectorMaterial,
    SceneSettings, ray_from_ndc,
};
use glam::{Mat4, Vec2, Vec3};
use std::error::Error;
use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::window::CursorIcon;

/// Everything needed to start drawing a gallery.
pub struct GalleryInit {
    pub gallery: Gallery,
    pub camera: CameraConfig,
}

/// Clear alpha of the reflection target, far above every fade threshold.
const EMPTY_HEIGHT: f64 = 1.0e4;

/// Fallback when the scene has no rounded box to take parameters from.
const DEFAULT_ROUNDING: (f32, u32) = (0.01, 4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeshKind {
    RoundedBox,
    Box,
    Plane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassKind {
    Standard,
    Image(usize),
    Reflector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Draw {
    pass: PassKind,
    mesh: MeshKind,
    instance: u32,
}

struct GpuMesh {
    vertices: Handle<wgpu::Buffer>,
    indices: Handle<wgpu::Buffer>,
    index_count: u32,
}

struct Meshes {
    rounded_box: GpuMesh,
    cube: GpuMesh,
    plane: GpuMesh,
}

impl Meshes {
    fn get(&self, kind: MeshKind) -> &GpuMesh {
        match kind {
            MeshKind::RoundedBox => &self.rounded_box,
            MeshKind::Box => &self.cube,
            MeshKind::Plane => &self.plane,
        }
    }
}

struct Pipelines {
    standard: Handle<wgpu::RenderPipeline>,
    image: Handle<wgpu::RenderPipeline>,
    reflector: Handle<wgpu::RenderPipeline>,
    standard_mirror: Handle<wgpu::RenderPipeline>,
    image_mirror: Handle<wgpu::RenderPipeline>,
}

struct ImageTexture {
    bind_group: wgpu::BindGroup,
    aspect: f32,
}

struct Reflection {
    color: GpuTexture,
    depth: GpuTexture,
    bind_group: wgpu::BindGroup,
}

pub struct GalleryDelegate {
    gallery: Gallery,
    projection: Projection,
    loader: ImageLoader,
    meshes: Meshes,
    pipelines: Pipelines,
    draws: Vec<Draw>,
    scene_buffer: Handle<wgpu::Buffer>,
    mirror_buffer: Handle<wgpu::Buffer>,
    reflector_buffer: Handle<wgpu::Buffer>,
    instance_buffer: Handle<wgpu::Buffer>,
    scene_bind_group: wgpu::BindGroup,
    mirror_bind_group: wgpu::BindGroup,
    image_layout: wgpu::BindGroupLayout,
    reflector_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    placeholder: wgpu::BindGroup,
    images: Vec<Option<ImageTexture>>,
    floor: ReflectorMaterial,
    reflection: Reflection,
    mirror_height: f32,
}

impl RenderDelegate for GalleryDelegate {
    type InitData = GalleryInit;

    fn create(
        renderer: &Renderer,
        registry: &mut ResourceRegistry,
        surface_format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        init_data: Self::InitData,
    ) -> Result<Self, Box<dyn Error>> {
        let device = renderer.device();
        let queue = renderer.queue();
        let GalleryInit { gallery, camera } = init_data;

        let projection = Projection::new(
            size.width.max(1),
            size.height.max(1),
            camera.fov_degrees.to_radians(),
            camera.near,
            camera.far,
        );

        let items = gallery.draw_list();
        let draws: Vec<Draw> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let (pass, mesh) = classify(item);
                Draw {
                    pass,
                    mesh,
                    instance: i as u32,
                }
            })
            .collect();
        let floor = items
            .iter()
            .find_map(|item| match item.material {
                Material::Reflector(m) => Some(m),
                _ => None,
            })
            .unwrap_or_else(floor_material);
        let (radius, smoothness) = items
            .iter()
            .find_map(|item| match item.geometry {
                Geometry::RoundedBox { radius, smoothness } => Some((radius, smoothness)),
                _ => None,
            })
            .unwrap_or(DEFAULT_ROUNDING);

        let meshes = Meshes {
            rounded_box: upload_mesh(
                renderer,
                registry,
                "Rounded Box",
                &mesh::rounded_box(radius, smoothness),
            )?,
            cube: upload_mesh(renderer, registry, "Box", &mesh::unit_box())?,
            plane: upload_mesh(renderer, registry, "Plane", &mesh::plane())?,
        };

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let image_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Image Layout"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let reflector_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Reflector Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let standard_shader = registry.insert(shaders::create_module(
            device,
            "Standard Shader",
            shaders::STANDARD,
        ));
        let image_shader =
            registry.insert(shaders::create_module(device, "Image Shader", shaders::IMAGE));
        let reflector_shader = registry.insert(shaders::create_module(
            device,
            "Reflector Shader",
            shaders::REFLECTOR,
        ));

        let back = Some(wgpu::Face::Back);
        let pipelines = Pipelines {
            standard: build_pipeline(
                device,
                registry,
                "Standard Pipeline",
                standard_shader,
                &[&scene_layout],
                surface_format,
                back,
            )?,
            image: build_pipeline(
                device,
                registry,
                "Image Pipeline",
                image_shader,
                &[&scene_layout, &image_layout],
                surface_format,
                back,
            )?,
            reflector: build_pipeline(
                device,
                registry,
                "Reflector Pipeline",
                reflector_shader,
                &[&scene_layout, &reflector_layout],
                surface_format,
                back,
            )?,
            // Mirroring flips winding, so the reflection pass draws both faces.
            standard_mirror: build_pipeline(
                device,
                registry,
                "Standard Mirror Pipeline",
                standard_shader,
                &[&scene_layout],
                REFLECTION_FORMAT,
                None,
            )?,
            image_mirror: build_pipeline(
                device,
                registry,
                "Image Mirror Pipeline",
                image_shader,
                &[&scene_layout, &image_layout],
                REFLECTION_FORMAT,
                None,
            )?,
        };

        let uniform_size = std::mem::size_of::<SceneUniforms>() as u64;
        let scene_buffer = renderer
            .create_buffer()
            .label("Scene Uniforms")
            .size(uniform_size)
            .usage(BufferUsage::Uniform)
            .build(registry)?;
        let mirror_buffer = renderer
            .create_buffer()
            .label("Mirror Scene Uniforms")
            .size(uniform_size)
            .usage(BufferUsage::Uniform)
            .build(registry)?;
        let reflector_buffer = renderer
            .create_buffer()
            .label("Reflector Uniforms")
            .size(std::mem::size_of::<ReflectorUniforms>() as u64)
            .usage(BufferUsage::Uniform)
            .build(registry)?;
        let instance_buffer = renderer
            .create_buffer()
            .label("Instances")
            .size((items.len().max(1) * std::mem::size_of::<InstanceRaw>()) as u64)
            .usage(BufferUsage::Instance)
            .build(registry)?;

        let scene_bind_group = uniform_bind_group(
            device,
            &scene_layout,
            registry.get(scene_buffer).ok_or("scene buffer missing")?,
        );
        let mirror_bind_group = uniform_bind_group(
            device,
            &scene_layout,
            registry.get(mirror_buffer).ok_or("mirror buffer missing")?,
        );

        let sampler = texture::linear_sampler(device, "Gallery Sampler");
        let placeholder_texture = GpuTexture::placeholder(device, queue, [0x26, 0x26, 0x2c, 0xff]);
        let placeholder =
            image_bind_group(device, &image_layout, &placeholder_texture.view, &sampler);

        let reflection = create_reflection(
            device,
            &reflector_layout,
            registry.get(reflector_buffer).ok_or("reflector buffer missing")?,
            &sampler,
            size,
            floor.resolution,
        );
        queue.write_buffer(
            registry.get(reflector_buffer).ok_or("reflector buffer missing")?,
            0,
            bytemuck::bytes_of(&reflector_uniforms(&floor, &reflection.color)),
        );

        let stage = gallery.stage();
        let mirror_height = gallery.graph().world_matrix(stage.floor).w_axis.y;

        let sources: Vec<(usize, String)> = gallery
            .frames()
            .iter()
            .filter_map(|f| f.source().map(|s| (f.slot(), s.to_string())))
            .collect();
        info!("Loading {} images", sources.len());
        let max_dimension = device.limits().max_texture_dimension_2d;
        let loader = ImageLoader::spawn(sources, max_dimension);
        let images = gallery.frames().iter().map(|_| None).collect();

        Ok(Self {
            gallery,
            projection,
            loader,
            meshes,
            pipelines,
            draws,
            scene_buffer,
            mirror_buffer,
            reflector_buffer,
            instance_buffer,
            scene_bind_group,
            mirror_bind_group,
            image_layout,
            reflector_layout,
            sampler,
            placeholder,
            images,
            floor,
            reflection,
            mirror_height,
        })
    }

    fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        Some(DEPTH_FORMAT)
    }

    fn resize(
        &mut self,
        renderer: &Renderer,
        registry: &mut ResourceRegistry,
        size: PhysicalSize<u32>,
    ) {
        self.projection.resize(size.width, size.height);
        let Some(buffer) = registry.get(self.reflector_buffer) else {
            return;
        };
        self.reflection = create_reflection(
            renderer.device(),
            &self.reflector_layout,
            buffer,
            &self.sampler,
            size,
            self.floor.resolution,
        );
        renderer.queue().write_buffer(
            buffer,
            0,
            bytemuck::bytes_of(&reflector_uniforms(&self.floor, &self.reflection.color)),
        );
    }

    fn input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMoved(ndc) => {
                let ray = self.ray(ndc);
                self.gallery.pointer_moved(Some(&ray));
            }
            InputEvent::PointerLeft => {
                self.gallery.pointer_moved(None);
            }
            InputEvent::Click(ndc) => {
                let ray = self.ray(ndc);
                let route = self.gallery.click(&ray);
                info!("Navigated to {route}");
            }
            InputEvent::Back => {
                if self.gallery.back() {
                    info!("Back to {}", self.gallery.route());
                }
            }
            InputEvent::Forward => {
                if self.gallery.forward() {
                    info!("Forward to {}", self.gallery.route());
                }
            }
            InputEvent::Exit => {}
        }
    }

    fn update(&mut self, renderer: &Renderer, registry: &mut ResourceRegistry, dt: f32) {
        let device = renderer.device();
        let queue = renderer.queue();

        let was_loading = self.loader.pending() > 0;
        for (slot, image) in self.loader.poll() {
            let texture = GpuTexture::from_rgba(device, queue, &format!("Frame {slot}"), &image);
            let bind_group =
                image_bind_group(device, &self.image_layout, &texture.view, &self.sampler);
            if let Some(entry) = self.images.get_mut(slot) {
                *entry = Some(ImageTexture {
                    bind_group,
                    aspect: texture.aspect(),
                });
                info!("Frame {slot} image ready ({}x{})", texture.width, texture.height);
            }
        }
        if was_loading && self.loader.pending() == 0 {
            let ready = self.images.iter().filter(|i| i.is_some()).count();
            info!("Image loading finished, {ready} of {} frames textured", self.images.len());
        }

        self.gallery.tick(dt);

        let view = self.gallery.view_matrix();
        let proj = self.projection.matrix();
        let eye = self.gallery.camera().position;
        let elapsed = self.gallery.elapsed();
        let settings = self.gallery.settings();
        let (width, height) = self.projection.size();

        let main = scene_uniforms(
            settings,
            view,
            proj,
            eye,
            elapsed,
            [self.mirror_height, 0.0, width as f32, height as f32],
        );
        let reflect = mirror_matrix(self.mirror_height);
        let mirrored = scene_uniforms(
            settings,
            view * reflect,
            proj,
            reflect.transform_point3(eye),
            elapsed,
            [
                self.mirror_height,
                1.0,
                self.reflection.color.width as f32,
                self.reflection.color.height as f32,
            ],
        );
        if let Some(buffer) = registry.get(self.scene_buffer) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&main));
        }
        if let Some(buffer) = registry.get(self.mirror_buffer) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&mirrored));
        }

        let instances = self.instances();
        if let Some(buffer) = registry.get(self.instance_buffer) {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&instances));
        }
    }

    fn cursor(&self) -> CursorIcon {
        cursor_icon(self.gallery.cursor())
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        ctx: RenderContext,
        registry: &ResourceRegistry,
    ) {
        {
            let _span = tracing::info_span!("reflection_pass").entered();
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Reflection Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.reflection.color.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.0,
                            a: EMPTY_HEIGHT,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.reflection.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.mirror_bind_group, &[]);
            self.draw(&mut pass, registry, true);
        }

        let _span = tracing::info_span!("main_pass").entered();
        let background = self.gallery.settings().background.linear();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: background.x as f64,
                        g: background.y as f64,
                        b: background.z as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: ctx.depth_view.map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        self.draw(&mut pass, registry, false);
    }
}

impl GalleryDelegate {
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    fn ray(&self, ndc: Vec2) -> gallery_scene::Ray {
        ray_from_ndc(self.gallery.view_matrix(), self.projection.matrix(), ndc)
    }

    fn instances(&self) -> Vec<InstanceRaw> {
        self.gallery
            .draw_list()
            .iter()
            .map(|item| {
                let image = match item.material {
                    Material::Image { slot } => {
                        let zoom = self.gallery.zoom(slot).unwrap_or(1.0);
                        let plane = plane_aspect(&item.world);
                        let aspect = self
                            .images
                            .get(slot)
                            .and_then(Option::as_ref)
                            .map_or(plane, |i| i.aspect);
                        let [cx, cy] = texture::cover_scale(aspect, plane);
                        [zoom, cx, cy, 0.0]
                    }
                    _ => [1.0, 1.0, 1.0, 0.0],
                };
                instance_raw(item, image)
            })
            .collect()
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, registry: &ResourceRegistry, mirrored: bool) {
        let Some(instances) = registry.get(self.instance_buffer) else {
            return;
        };
        pass.set_vertex_buffer(1, instances.slice(..));

        for draw in &self.draws {
            let (pipeline, group) = match draw.pass {
                PassKind::Reflector if mirrored => continue,
                PassKind::Reflector => {
                    (self.pipelines.reflector, Some(&self.reflection.bind_group))
                }
                PassKind::Standard if mirrored => (self.pipelines.standard_mirror, None),
                PassKind::Standard => (self.pipelines.standard, None),
                PassKind::Image(slot) => {
                    let group = self
                        .images
                        .get(slot)
                        .and_then(Option::as_ref)
                        .map_or(&self.placeholder, |i| &i.bind_group);
                    let pipeline = if mirrored {
                        self.pipelines.image_mirror
                    } else {
                        self.pipelines.image
                    };
                    (pipeline, Some(group))
                }
            };
            let mesh = self.meshes.get(draw.mesh);
            let (Some(pipeline), Some(vertices), Some(indices)) = (
                registry.get(pipeline),
                registry.get(mesh.vertices),
                registry.get(mesh.indices),
            ) else {
                debug!("Skipping draw with missing resources: {:?}", draw);
                continue;
            };

            pass.set_pipeline(pipeline);
            if let Some(group) = group {
                pass.set_bind_group(1, group, &[]);
            }
            pass.set_vertex_buffer(0, vertices.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, draw.instance..draw.instance + 1);
        }
    }
}

fn classify(item: &DrawItem) -> (PassKind, MeshKind) {
    let mesh = match item.geometry {
        Geometry::RoundedBox { .. } => MeshKind::RoundedBox,
        Geometry::Box => MeshKind::Box,
        Geometry::Plane => MeshKind::Plane,
    };
    let pass = match item.material {
        Material::Standard(_) | Material::Basic(_) => PassKind::Standard,
        Material::Image { slot } => PassKind::Image(slot),
        Material::Reflector(_) => PassKind::Reflector,
    };
    (pass, mesh)
}

fn instance_raw(item: &DrawItem, image: [f32; 4]) -> InstanceRaw {
    const UNLIT: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    let (color, material) = match item.material {
        Material::Standard(m) => (
            m.color.to_array(1.0),
            [m.metalness, m.roughness, m.env_map_intensity, 0.0],
        ),
        Material::Basic(m) => (m.color.to_array(1.0), UNLIT),
        Material::Image { .. } => ([1.0; 4], UNLIT),
        Material::Reflector(m) => (
            m.color.to_array(m.metalness),
            [m.metalness, m.roughness, 1.0, 0.0],
        ),
    };
    InstanceRaw::new(item.world, color, material, image)
}

fn cursor_icon(cursor: Cursor) -> CursorIcon {
    match cursor {
        Cursor::Default => CursorIcon::Default,
        Cursor::Pointer => CursorIcon::Pointer,
    }
}

/// Reflection about the horizontal plane `y = height`.
fn mirror_matrix(height: f32) -> Mat4 {
    Mat4::from_translation(Vec3::Y * height)
        * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
        * Mat4::from_translation(Vec3::NEG_Y * height)
}

/// Surface size scaled down so the long side fits `limit`.
fn reflection_size(width: u32, height: u32, limit: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= limit || long == 0 {
        return (width.max(1), height.max(1));
    }
    let scale = limit as f32 / long as f32;
    (
        ((width as f32 * scale).round() as u32).max(1),
        ((height as f32 * scale).round() as u32).max(1),
    )
}

/// Width over height of a unit plane placed by `world`.
fn plane_aspect(world: &Mat4) -> f32 {
    let height = world.y_axis.truncate().length();
    if height <= f32::EPSILON {
        return 1.0;
    }
    world.x_axis.truncate().length() / height
}

fn scene_uniforms(
    settings: &SceneSettings,
    view: Mat4,
    proj: Mat4,
    eye: Vec3,
    elapsed: f32,
    mirror: [f32; 4],
) -> SceneUniforms {
    let env = settings.environment.lighting();
    SceneUniforms {
        fog_color: settings.fog.color.to_array(1.0),
        fog: [settings.fog.near, settings.fog.far, elapsed, 0.0],
        env_sky: env.sky.to_array(env.intensity),
        env_horizon: env.horizon.to_array(1.0),
        env_ground: env.ground.to_array(1.0),
        mirror,
        ..SceneUniforms::from_matrices(view, proj, eye)
    }
}

fn reflector_uniforms(floor: &ReflectorMaterial, target: &GpuTexture) -> ReflectorUniforms {
    ReflectorUniforms {
        color: floor.color.to_array(floor.metalness),
        blur: [floor.blur[0], floor.blur[1], floor.mix_blur, floor.mix_strength],
        depth: [
            floor.roughness,
            floor.depth_scale,
            floor.min_depth_threshold,
            floor.max_depth_threshold,
        ],
        target: [target.width as f32, target.height as f32, 0.0, 0.0],
    }
}

fn upload_mesh(
    renderer: &Renderer,
    registry: &mut ResourceRegistry,
    label: &str,
    data: &MeshData,
) -> Result<GpuMesh, BufferBuildError> {
    let vertices = renderer
        .create_buffer()
        .label(format!("{label} Vertices"))
        .with_pod_data(&data.vertices)
        .usage(BufferUsage::Vertex)
        .build(registry)?;
    let indices = renderer
        .create_buffer()
        .label(format!("{label} Indices"))
        .with_pod_data(&data.indices)
        .usage(BufferUsage::Index)
        .build(registry)?;
    Ok(GpuMesh {
        vertices,
        indices,
        index_count: data.index_count(),
    })
}

fn build_pipeline(
    device: &wgpu::Device,
    registry: &mut ResourceRegistry,
    label: &str,
    shader: Handle<wgpu::ShaderModule>,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    format: wgpu::TextureFormat,
    cull_mode: Option<wgpu::Face>,
) -> Result<Handle<wgpu::RenderPipeline>, PipelineBuildError> {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });
    RenderPipelineBuilder::new(device)
        .with_label(label)
        .with_shader(shader)
        .with_layout(layout)
        .with_vertex_buffer(Vertex::layout())
        .with_vertex_buffer(InstanceRaw::layout())
        .with_cull_mode(cull_mode)
        .with_depth(DEPTH_FORMAT, true)
        .with_fragment_target(Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        }))
        .build(registry)
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

fn image_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Image Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_reflection(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniforms: &wgpu::Buffer,
    sampler: &wgpu::Sampler,
    size: PhysicalSize<u32>,
    limit: u32,
) -> Reflection {
    let (width, height) = reflection_size(size.width, size.height, limit);
    let color = GpuTexture::render_target(device, "Reflection", width, height, REFLECTION_FORMAT);
    let depth = GpuTexture::depth(device, "Reflection Depth", width, height);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Reflector Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&color.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    debug!("Reflection target {width}x{height}");
    Reflection {
        color,
        depth,
        bind_group,
    }
}
