use simplegame_input::InputSink;
use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

/// A width/height pair in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenResolution {
    pub width: u32,
    pub height: u32,
}

impl ScreenResolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for ScreenResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Construction parameters shared by all backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// Vertical sync interval for accelerated backends; 0 disables vsync.
    pub swap_interval: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "simplegame".to_string(),
            width: 640,
            height: 480,
            fullscreen: false,
            swap_interval: 1,
        }
    }
}

impl SurfaceConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_swap_interval(mut self, swap_interval: u32) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    pub fn resolution(&self) -> ScreenResolution {
        ScreenResolution::new(self.width, self.height)
    }
}

/// Errors raised by surface construction and the draw cycle.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    #[error("platform did not create a window")]
    WindowUnavailable,
    #[error("unsupported resolution {width}x{height}")]
    UnsupportedResolution { width: u32, height: u32 },
    #[error("raster presentation failed: {0}")]
    Pixels(#[from] pixels::Error),
    #[error("no compatible GPU adapter")]
    NoAdapter,
    #[error("failed to request GPU device")]
    RequestDevice(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to create GPU surface")]
    CreateSurface(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to acquire swap chain texture")]
    SurfaceTexture(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("surface has been destroyed")]
    Destroyed,
}

/// A renderable, input-capable window.
///
/// The runner owns the surface and drives it once per frame:
/// `flush_input`, then `begin_draw`/`end_draw`. The surface only observes
/// the runner through the weak sink registered with
/// [`register_input_sink`](Surface::register_input_sink).
pub trait Surface {
    /// Backend-specific drawing handle for one frame.
    type DrawContext;

    fn screen_width(&self) -> u32;

    fn screen_height(&self) -> u32;

    fn is_requesting_to_close(&self) -> bool;

    /// Raise the close flag; the runner stops before its next frame.
    fn request_to_close(&mut self);

    /// Pump pending platform events and deliver each one to the registered
    /// sink before returning.
    fn flush_input(&mut self);

    /// Acquire the back buffer.
    fn begin_draw(&mut self) -> Result<Self::DrawContext, SurfaceError>;

    /// Release the back buffer and present it.
    fn end_draw(&mut self, ctx: Self::DrawContext) -> Result<(), SurfaceError>;

    /// Release native resources. Calling it again does nothing.
    fn destroy(&mut self);

    /// Store the one input sink, replacing any previous one.
    fn register_input_sink(&mut self, sink: Weak<RefCell<dyn InputSink>>);

    /// Last known cursor position in client-area pixels.
    fn mouse_position(&self) -> (i32, i32);

    fn is_fullscreen(&self) -> bool;

    fn screen_resolution(&self) -> ScreenResolution {
        ScreenResolution::new(self.screen_width(), self.screen_height())
    }

    fn supports_resolution(&self, resolution: ScreenResolution) -> bool;

    /// Switch to `resolution`. Returns `false` and leaves the surface
    /// unchanged when the resolution is not supported.
    fn set_screen_resolution(&mut self, resolution: ScreenResolution) -> bool;
}
