use crate::canvas::{Canvas, RasterFrame};
use crate::native::NativeWindow;
use crate::surface::{ScreenResolution, Surface, SurfaceConfig, SurfaceError};
use pixels::{Pixels, SurfaceTexture};
use simplegame_input::{InputSink, InputSlot};
use std::cell::RefCell;
use std::rc::Weak;

/// Software-raster backend: a native window, a CPU double buffer and a
/// `pixels` presentation target scaled to the window.
pub struct RasterSurface {
    config: SurfaceConfig,
    // Declared before `native` so the presenter drops before its window.
    pixels: Option<Pixels<'static>>,
    native: Option<NativeWindow>,
    front: Canvas,
    back: Option<Canvas>,
    slot: InputSlot,
    close_requested: bool,
}

impl RasterSurface {
    pub fn open(config: SurfaceConfig) -> Result<Self, SurfaceError> {
        let native = NativeWindow::open(&config)?;
        let size = native.inner_size();
        let texture = SurfaceTexture::new(size.width.max(1), size.height.max(1), native.window().clone());
        let pixels = Pixels::new(config.width, config.height, texture)?;
        tracing::info!(width = config.width, height = config.height, "raster surface created");

        Ok(Self {
            front: Canvas::new(config.width, config.height),
            back: Some(Canvas::new(config.width, config.height)),
            config,
            pixels: Some(pixels),
            native: Some(native),
            slot: InputSlot::new(),
            close_requested: false,
        })
    }

    /// The most recently presented frame.
    pub fn front(&self) -> &Canvas {
        &self.front
    }

    fn apply_resize(&mut self) {
        let (Some(native), Some(pixels)) = (self.native.as_mut(), self.pixels.as_mut()) else {
            return;
        };
        if let Some(size) = native.take_resize() {
            if size.is_empty() {
                return;
            }
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                tracing::warn!(error = %e, %size, "failed to resize presentation surface");
            }
        }
    }
}

impl Surface for RasterSurface {
    type DrawContext = RasterFrame;

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
        if let Some(native) = self.native.as_mut() {
            native.pump(&self.slot);
        }
        self.apply_resize();
    }

    fn begin_draw(&mut self) -> Result<RasterFrame, SurfaceError> {
        if self.pixels.is_none() {
            return Err(SurfaceError::Destroyed);
        }
        let canvas = self
            .back
            .take()
            .unwrap_or_else(|| Canvas::new(self.config.width, self.config.height));
        Ok(RasterFrame::new(canvas))
    }

    fn end_draw(&mut self, ctx: RasterFrame) -> Result<(), SurfaceError> {
        let pixels = self.pixels.as_mut().ok_or(SurfaceError::Destroyed)?;
        let canvas = ctx.into_canvas();
        if canvas.width() != self.config.width || canvas.height() != self.config.height {
            tracing::debug!("discarding frame drawn at a stale resolution");
            self.back = Some(Canvas::new(self.config.width, self.config.height));
            return Ok(());
        }
        if !canvas.write_to(pixels.frame_mut()) {
            tracing::warn!(
                resolution = %ScreenResolution::new(self.config.width, self.config.height),
                "raster buffer does not match the screen; discarding frame"
            );
            self.back = Some(canvas);
            return Ok(());
        }
        let presented = pixels.render();
        self.back = Some(std::mem::replace(&mut self.front, canvas));
        presented.map_err(SurfaceError::from)
    }

    fn destroy(&mut self) {
        if self.native.is_none() {
            return;
        }
        self.pixels = None;
        if let Some(native) = self.native.take() {
            native.hide();
        }
        self.back = None;
        tracing::info!("raster surface destroyed");
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
        let (Some(native), Some(pixels)) = (self.native.as_mut(), self.pixels.as_mut()) else {
            return false;
        };
        if !native.supports_resolution(resolution) {
            return false;
        }
        if !native.set_resolution(resolution) {
            return false;
        }
        if let Err(e) = pixels.resize_buffer(resolution.width, resolution.height) {
            tracing::warn!(error = %e, %resolution, "failed to resize raster buffer");
            let previous = ScreenResolution::new(self.config.width, self.config.height);
            if !native.set_resolution(previous) {
                tracing::warn!(%previous, "failed to restore the window resolution");
            }
            return false;
        }
        self.config.width = resolution.width;
        self.config.height = resolution.height;
        self.front = Canvas::new(resolution.width, resolution.height);
        self.back = Some(Canvas::new(resolution.width, resolution.height));
        true
    }
}

impl Drop for RasterSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}
