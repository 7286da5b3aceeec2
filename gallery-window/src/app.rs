use crate::input::{InputEvent, InputState};
use gallery_gpu::wgpu;
use gallery_gpu::{Renderer, ResourceRegistry, SurfaceWrapper};
use std::error::Error;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{CursorIcon, Window, WindowId};

/// Window creation options.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    pub size: [u32; 2],
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            size: [1280, 720],
            log_level: "info".to_string(),
        }
    }
}

/// Targets for one frame's passes.
pub struct RenderContext<'a> {
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

/// Scene-specific rendering plugged into the window loop.
pub trait RenderDelegate: Sized {
    /// Data needed to construct the delegate.
    type InitData;

    /// Create GPU resources for rendering.
    fn create(
        renderer: &Renderer,
        registry: &mut ResourceRegistry,
        surface_format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        init_data: Self::InitData,
    ) -> Result<Self, Box<dyn Error>>;

    /// Return depth format if depth testing is needed. Default is None (no depth).
    fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        None
    }

    /// The drawable size changed.
    fn resize(
        &mut self,
        _renderer: &Renderer,
        _registry: &mut ResourceRegistry,
        _size: PhysicalSize<u32>,
    ) {
    }

    /// Pointer and navigation input, already translated from window events.
    fn input(&mut self, _event: &InputEvent) {}

    /// Advance by `dt` seconds and upload per-frame data.
    fn update(&mut self, renderer: &Renderer, registry: &mut ResourceRegistry, dt: f32);

    /// Cursor to show over the window.
    fn cursor(&self) -> CursorIcon {
        CursorIcon::Default
    }

    /// Record render commands.
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        ctx: RenderContext,
        registry: &ResourceRegistry,
    );
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    #[cfg(feature = "tracy")]
    {
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;
        let _ = tracing_subscriber::registry()
            .with(tracing_tracy::TracyLayer::default())
            .with(tracing_subscriber::fmt::layer().with_filter(filter))
            .try_init();
    }

    #[cfg(not(feature = "tracy"))]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}

/// Run the viewer with a custom render delegate.
pub fn run_with_delegate<D: RenderDelegate + 'static>(
    options: WindowOptions,
    init_data: D::InitData,
) -> Result<(), Box<dyn Error>>
where
    D::InitData: 'static,
{
    init_tracing(&options.log_level);

    let event_loop = EventLoop::new().map_err(|e| format!("Failed to create event loop: {e}"))?;
    let mut app = App::<D>::new(options, init_data);
    let run_result = event_loop.run_app(&mut app);
    let app_result = app.finish();
    run_result?;
    app_result
}

struct App<D: RenderDelegate> {
    options: WindowOptions,
    init_data: Option<D::InitData>,
    state: Option<ViewerState<D>>,
    error: Option<String>,
}

impl<D: RenderDelegate> App<D> {
    fn new(options: WindowOptions, init_data: D::InitData) -> Self {
        Self {
            options,
            init_data: Some(init_data),
            state: None,
            error: None,
        }
    }

    fn finish(self) -> Result<(), Box<dyn Error>> {
        if let Some(err) = self.error {
            Err(err.into())
        } else {
            Ok(())
        }
    }
}

impl<D: RenderDelegate + 'static> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.error.is_some() {
            return;
        }
        let Some(init_data) = self.init_data.take() else {
            return;
        };

        match ViewerState::<D>::new(event_loop, &self.options, init_data) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                error!("Failed to initialize viewer: {err}");
                self.error = Some(err.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.window.id() != window_id {
            return;
        }

        if let Some(input) = state.input.process(&event) {
            if input == InputEvent::Exit {
                event_loop.exit();
                return;
            }
            state.delegate.input(&input);
            state.sync_cursor();
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::RedrawRequested => {
                let _frame_span = tracing::info_span!("frame").entered();
                state.update(Instant::now());
                match state.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.window.inner_size();
                        state.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU Out of Memory - exiting");
                        event_loop.exit();
                    }
                    Err(e) => error!("Render error: {:?}", e),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }
}

struct ViewerState<D: RenderDelegate> {
    window: Arc<Window>,
    renderer: Renderer,
    surface: SurfaceWrapper,
    registry: ResourceRegistry,
    delegate: D,
    input: InputState,
    cursor: CursorIcon,
    last_frame: Instant,
    depth_view: Option<wgpu::TextureView>,
}

impl<D: RenderDelegate> ViewerState<D> {
    fn new(
        event_loop: &ActiveEventLoop,
        options: &WindowOptions,
        init_data: D::InitData,
    ) -> Result<Self, Box<dyn Error>> {
        let window_attributes = Window::default_attributes()
            .with_title(options.title.as_str())
            .with_inner_size(PhysicalSize::new(options.size[0], options.size[1]));
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();

        let instance = Renderer::create_instance();
        let surface = instance.create_surface(window.clone())?;
        let renderer = pollster::block_on(Renderer::new(instance, Some(&surface)))?;
        let surface = renderer.configure_surface(surface, size.width, size.height)?;

        let mut registry = ResourceRegistry::new();
        let delegate = D::create(&renderer, &mut registry, surface.format(), size, init_data)?;
        let depth_view = delegate
            .depth_format()
            .map(|format| create_depth_view(renderer.device(), size, format));

        info!("Viewer ready: {}x{}", size.width, size.height);

        Ok(Self {
            window,
            renderer,
            surface,
            registry,
            delegate,
            input: InputState::new(size),
            cursor: CursorIcon::Default,
            last_frame: Instant::now(),
            depth_view,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.surface
            .resize(self.renderer.device(), new_size.width, new_size.height);
        self.input.resize(new_size);
        self.delegate
            .resize(&self.renderer, &mut self.registry, new_size);

        if let Some(format) = self.delegate.depth_format() {
            self.depth_view = Some(create_depth_view(self.renderer.device(), new_size, format));
        }
    }

    fn sync_cursor(&mut self) {
        let cursor = self.delegate.cursor();
        if cursor != self.cursor {
            self.window.set_cursor(cursor);
            self.cursor = cursor;
        }
    }

    fn update(&mut self, now: Instant) {
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delegate.update(&self.renderer, &mut self.registry, dt);
        self.sync_cursor();
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .renderer
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let ctx = RenderContext {
            color_view: &surface_view,
            depth_view: self.depth_view.as_ref(),
        };
        self.delegate.render(&mut encoder, ctx, &self.registry);

        self.renderer.queue().submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();
        Ok(())
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    size: PhysicalSize<u32>,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    gallery_gpu::GpuTexture::render_target(
        device,
        "Depth Texture",
        size.width,
        size.height,
        format,
    )
    .view
}
