use crate::canvas::{Canvas, RasterFrame};
use crate::surface::{ScreenResolution, Surface, SurfaceConfig, SurfaceError};
use simplegame_input::{InputEvent, InputSink, InputSlot};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Weak;

/// An in-memory double-buffered surface with scripted input.
///
/// Queued events are delivered on the next `flush_input`. With
/// [`close_after`](HeadlessSurface::close_after) the surface raises its
/// close flag once that many frames have been presented, which ends a
/// runner loop deterministically.
pub struct HeadlessSurface {
    config: SurfaceConfig,
    front: Canvas,
    back: Option<Canvas>,
    pending: VecDeque<InputEvent>,
    slot: InputSlot,
    mouse: (i32, i32),
    close_requested: bool,
    close_after: Option<u64>,
    frames_presented: u64,
    fullscreen_modes: Vec<ScreenResolution>,
    destroyed: bool,
    destroy_calls: u32,
}

impl HeadlessSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let resolution = config.resolution();
        tracing::info!(title = %config.title, %resolution, "headless surface created");
        Self {
            front: Canvas::new(config.width, config.height),
            back: Some(Canvas::new(config.width, config.height)),
            fullscreen_modes: vec![resolution],
            config,
            pending: VecDeque::new(),
            slot: InputSlot::new(),
            mouse: (0, 0),
            close_requested: false,
            close_after: None,
            frames_presented: 0,
            destroyed: false,
            destroy_calls: 0,
        }
    }

    /// Request close once `frames` frames have been presented.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self.close_requested |= frames == 0;
        self
    }

    /// Resolutions accepted while fullscreen; windowed accepts any
    /// non-empty size.
    pub fn with_fullscreen_modes(mut self, modes: Vec<ScreenResolution>) -> Self {
        self.fullscreen_modes = modes;
        self
    }

    /// Queue an event for the next `flush_input`.
    pub fn push_event(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The most recently presented frame.
    pub fn front(&self) -> &Canvas {
        &self.front
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Number of times `destroy` was called, including no-op repeats.
    pub fn destroy_calls(&self) -> u32 {
        self.destroy_calls
    }

    fn resize_buffers(&mut self, resolution: ScreenResolution) {
        self.config.width = resolution.width;
        self.config.height = resolution.height;
        self.front = Canvas::new(resolution.width, resolution.height);
        self.back = Some(Canvas::new(resolution.width, resolution.height));
    }
}

impl Surface for HeadlessSurface {
    type DrawContext = RasterFrame;

    fn screen_width(&self) -> u32 {
        self.config.width
    }

    fn screen_height(&self) -> u32 {
        self.config.height
    }

    fn is_requesting_to_close(&self) -> bool {
        self.close_requested
    }

    fn request_to_close(&mut self) {
        self.close_requested = true;
    }

    fn flush_input(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            if let InputEvent::Mouse { x, y, .. } = event {
                self.mouse = (x, y);
            }
            self.slot.deliver(event);
        }
    }

    fn begin_draw(&mut self) -> Result<RasterFrame, SurfaceError> {
        if self.destroyed {
            return Err(SurfaceError::Destroyed);
        }
        let canvas = self
            .back
            .take()
            .unwrap_or_else(|| Canvas::new(self.config.width, self.config.height));
        Ok(RasterFrame::new(canvas))
    }

    fn end_draw(&mut self, ctx: RasterFrame) -> Result<(), SurfaceError> {
        if self.destroyed {
            return Err(SurfaceError::Destroyed);
        }
        let canvas = ctx.into_canvas();
        if canvas.width() != self.config.width || canvas.height() != self.config.height {
            tracing::debug!("discarding frame drawn at a stale resolution");
            self.back = Some(Canvas::new(self.config.width, self.config.height));
            return Ok(());
        }
        self.back = Some(std::mem::replace(&mut self.front, canvas));
        self.frames_presented += 1;
        if self.close_after.is_some_and(|n| self.frames_presented >= n) {
            self.close_requested = true;
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroy_calls += 1;
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.back = None;
        tracing::info!(frames = self.frames_presented, "headless surface destroyed");
    }

    fn register_input_sink(&mut self, sink: Weak<RefCell<dyn InputSink>>) {
        self.slot.register(sink);
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    fn is_fullscreen(&self) -> bool {
        self.config.fullscreen
    }

    fn supports_resolution(&self, resolution: ScreenResolution) -> bool {
        if resolution.is_empty() {
            return false;
        }
        !self.config.fullscreen || self.fullscreen_modes.contains(&resolution)
    }

    fn set_screen_resolution(&mut self, resolution: ScreenResolution) -> bool {
        if !self.supports_resolution(resolution) {
            return false;
        }
        self.resize_buffers(resolution);
        true
    }
}
