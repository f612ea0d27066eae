use crate::camera::ScreenProjection;
use crate::gpu::{QuadBatch, QuadRenderer};
use simplegame_input::{InputSink, InputSlot};
use simplegame_render::{Color, NativeWindow, ScreenResolution, Surface, SurfaceConfig, SurfaceError};
use std::cell::RefCell;
use std::rc::Weak;

/// The accelerated draw context: one acquired swap chain texture plus the
/// rectangles recorded against it.
///
/// When the swap chain had no texture to hand out the frame is skipped:
/// drawing still records but nothing is presented.
pub struct GpuFrame {
    target: Option<(wgpu::SurfaceTexture, wgpu::TextureView)>,
    clear: Color,
    batch: QuadBatch,
    width: u32,
    height: u32,
}

impl GpuFrame {
    fn new(target: Option<(wgpu::SurfaceTexture, wgpu::TextureView)>, width: u32, height: u32) -> Self {
        Self {
            target,
            clear: Color::BLACK,
            batch: QuadBatch::new(),
            width,
            height,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.target.is_none()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the color the frame is cleared to and drop everything recorded
    /// so far.
    pub fn clear(&mut self, color: Color) {
        self.clear = color;
        self.batch.clear();
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.batch.fill_rect(x, y, width, height, color);
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.batch.stroke_rect(x, y, width, height, color);
    }

    pub fn quad_count(&self) -> usize {
        self.batch.len()
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: QuadRenderer,
}

/// What to do when the swap chain refuses a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcquireFailure {
    Reconfigure,
    Skip,
    Fatal,
}

fn classify(err: &wgpu::SurfaceError) -> AcquireFailure {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => AcquireFailure::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => AcquireFailure::Fatal,
        _ => AcquireFailure::Skip,
    }
}

impl Gpu {
    /// Next swap chain texture, or `None` when this frame should be skipped.
    /// Only running out of memory ends the loop.
    fn acquire(&self) -> Result<Option<wgpu::SurfaceTexture>, SurfaceError> {
        let mut reconfigured = false;
        loop {
            let err = match self.surface.get_current_texture() {
                Ok(texture) => return Ok(Some(texture)),
                Err(e) => e,
            };
            match classify(&err) {
                AcquireFailure::Reconfigure if !reconfigured => {
                    tracing::debug!(error = %err, "swap chain out of date; reconfiguring");
                    self.surface.configure(&self.device, &self.config);
                    reconfigured = true;
                }
                AcquireFailure::Fatal => return Err(SurfaceError::SurfaceTexture(Box::new(err))),
                AcquireFailure::Reconfigure | AcquireFailure::Skip => {
                    tracing::warn!(error = %err, "no swap chain texture; skipping frame");
                    return Ok(None);
                }
            }
        }
    }

    fn resize(&mut self, size: ScreenResolution) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }
}

/// Present mode for a swap interval: 0 presents immediately, anything else
/// waits for vertical sync.
pub(crate) fn present_mode(swap_interval: u32) -> wgpu::PresentMode {
    if swap_interval == 0 {
        wgpu::PresentMode::AutoNoVsync
    } else {
        wgpu::PresentMode::AutoVsync
    }
}

/// GPU backend: a native window with a wgpu swap chain.
pub struct GpuSurface {
    config: SurfaceConfig,
    // Declared before `native` so the swap chain drops before its window.
    gpu: Option<Gpu>,
    native: Option<NativeWindow>,
    slot: InputSlot,
    close_requested: bool,
}

impl GpuSurface {
    pub fn open(config: SurfaceConfig) -> Result<Self, SurfaceError> {
        let native = NativeWindow::open(&config)?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(native.window().clone())
            .map_err(|e| SurfaceError::CreateSurface(Box::new(e)))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(SurfaceError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("simplegame_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| SurfaceError::RequestDevice(Box::new(e)))?;

        let size = native.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| SurfaceError::CreateSurface("surface reports no texture formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present_mode(config.swap_interval),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let renderer = QuadRenderer::new(&device, format);
        tracing::info!(
            adapter = %adapter.get_info().name,
            ?format,
            swap_interval = config.swap_interval,
            "gpu surface created"
        );

        Ok(Self {
            config,
            gpu: Some(Gpu {
                surface,
                device,
                queue,
                config: surface_config,
                renderer,
            }),
            native: Some(native),
            slot: InputSlot::new(),
            close_requested: false,
        })
    }
}

impl Surface for GpuSurface {
    type DrawContext = GpuFrame;

    fn screen_width(&self) -> u32 {
        self.config.width
    }

    fn screen_height(&self) -> u32 {
        self.config.height
    }

    fn is_requesting_to_close(&self) -> bool {
        self.close_requested || self.native.as_ref().is_some_and(NativeWindow::close_requested)
    }

    fn request_to_close(&mut self) {
        self.close_requested = true;
        if let Some(native) = self.native.as_mut() {
            native.request_close();
        }
    }

    fn flush_input(&mut self) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        native.pump(&self.slot);
        if let (Some(size), Some(gpu)) = (native.take_resize(), self.gpu.as_mut()) {
            if !size.is_empty() {
                gpu.resize(size);
            }
        }
    }

    fn begin_draw(&mut self) -> Result<GpuFrame, SurfaceError> {
        let gpu = self.gpu.as_ref().ok_or(SurfaceError::Destroyed)?;
        let target = gpu.acquire()?.map(|texture| {
            let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        });
        Ok(GpuFrame::new(target, self.config.width, self.config.height))
    }

    fn end_draw(&mut self, ctx: GpuFrame) -> Result<(), SurfaceError> {
        let gpu = self.gpu.as_mut().ok_or(SurfaceError::Destroyed)?;
        let Some((texture, view)) = ctx.target else {
            return Ok(());
        };
        // Drawing happens in logical screen pixels; the swap chain scales.
        let projection = ScreenProjection::new(ctx.width, ctx.height);
        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &projection,
            ctx.clear,
            ctx.batch.as_slice(),
        );
        texture.present();
        Ok(())
    }

    fn destroy(&mut self) {
        if self.native.is_none() {
            return;
        }
        self.gpu = None;
        if let Some(native) = self.native.take() {
            native.hide();
        }
        tracing::info!("gpu surface destroyed");
    }

    fn register_input_sink(&mut self, sink: Weak<RefCell<dyn InputSink>>) {
        self.slot.register(sink);
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.native.as_ref().map_or((0, 0), NativeWindow::cursor)
    }

    fn is_fullscreen(&self) -> bool {
        self.native.as_ref().is_some_and(NativeWindow::is_fullscreen)
    }

    fn supports_resolution(&self, resolution: ScreenResolution) -> bool {
        self.native
            .as_ref()
            .is_some_and(|native| native.supports_resolution(resolution))
    }

    fn set_screen_resolution(&mut self, resolution: ScreenResolution) -> bool {
        let Some(native) = self.native.as_mut() else {
            return false;
        };
        if !native.set_resolution(resolution) {
            return false;
        }
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(resolution);
        }
        self.config.width = resolution.width;
        self.config.height = resolution.height;
        true
    }
}

impl Drop for GpuSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}
