use crate::surface::{ScreenResolution, SurfaceConfig, SurfaceError};
use simplegame_input::{InputEvent, InputSlot, translate};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::error::OsError;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::monitor::{MonitorHandle, VideoModeHandle};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

/// Pumps allowed while waiting for the platform to create the window.
const OPEN_PUMP_LIMIT: usize = 16;

/// A native window driven in pump mode.
///
/// The platform event loop only runs inside [`pump`](NativeWindow::pump),
/// so input is translated and delivered synchronously from the caller's
/// `flush_input`. Only one can exist per process.
pub struct NativeWindow {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
    window: Arc<Window>,
}

struct WindowHandler {
    attributes: WindowAttributes,
    fullscreen: Option<PhysicalSize<u32>>,
    window: Option<Arc<Window>>,
    create_error: Option<OsError>,
    created: bool,
    close_requested: bool,
    cursor: (i32, i32),
    events: VecDeque<InputEvent>,
    resized: Option<PhysicalSize<u32>>,
}

fn find_mode(monitor: Option<MonitorHandle>, size: PhysicalSize<u32>) -> Option<VideoModeHandle> {
    monitor?.video_modes().find(|mode| mode.size() == size)
}

impl ApplicationHandler for WindowHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.created {
            return;
        }
        self.created = true;

        let mut attributes = self.attributes.clone();
        if let Some(size) = self.fullscreen {
            let fullscreen = match find_mode(event_loop.primary_monitor(), size) {
                Some(mode) => Fullscreen::Exclusive(mode),
                None => {
                    tracing::warn!(width = size.width, height = size.height, "no exact video mode; using borderless fullscreen");
                    Fullscreen::Borderless(None)
                }
            };
            attributes = attributes.with_fullscreen(Some(fullscreen));
        }

        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(e),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                self.resized = Some(size);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                match translate::key_code(event.physical_key) {
                    Some(code) => self.events.push_back(InputEvent::Key {
                        code,
                        pressed: event.state == ElementState::Pressed,
                    }),
                    None => tracing::trace!(key = ?event.physical_key, "unmapped key dropped"),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as i32, position.y as i32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.cursor;
                self.events.push_back(InputEvent::Mouse {
                    button: translate::mouse_button(button),
                    x,
                    y,
                    pressed: state == ElementState::Pressed,
                });
            }
            _ => {}
        }
    }
}

impl NativeWindow {
    /// Create the event loop and window, pumping until the window exists.
    pub fn open(config: &SurfaceConfig) -> Result<Self, SurfaceError> {
        let mut event_loop = EventLoop::new()?;
        let size = PhysicalSize::new(config.width, config.height);
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(size)
            .with_resizable(false);

        let mut handler = WindowHandler {
            attributes,
            fullscreen: config.fullscreen.then_some(size),
            window: None,
            create_error: None,
            created: false,
            close_requested: false,
            cursor: (0, 0),
            events: VecDeque::new(),
            resized: None,
        };

        for _ in 0..OPEN_PUMP_LIMIT {
            if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler) {
                tracing::warn!(code, "event loop exited while opening window");
                break;
            }
            if handler.created {
                break;
            }
        }

        if let Some(e) = handler.create_error.take() {
            return Err(SurfaceError::CreateWindow(e));
        }
        let window = handler.window.take().ok_or(SurfaceError::WindowUnavailable)?;
        tracing::info!(title = %config.title, width = config.width, height = config.height, fullscreen = config.fullscreen, "window opened");

        Ok(Self {
            event_loop,
            handler,
            window,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Run the platform loop once without blocking and deliver every
    /// translated event to `slot`.
    pub fn pump(&mut self, slot: &InputSlot) {
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler) {
            tracing::debug!(code, "event loop exited");
            self.handler.close_requested = true;
        }
        while let Some(event) = self.handler.events.pop_front() {
            slot.deliver(event);
        }
    }

    /// The latest window size reported since the last call.
    pub fn take_resize(&mut self) -> Option<ScreenResolution> {
        self.handler
            .resized
            .take()
            .map(|size| ScreenResolution::new(size.width, size.height))
    }

    pub fn close_requested(&self) -> bool {
        self.handler.close_requested
    }

    pub fn request_close(&mut self) {
        self.handler.close_requested = true;
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.handler.cursor
    }

    pub fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    pub fn inner_size(&self) -> ScreenResolution {
        let size = self.window.inner_size();
        ScreenResolution::new(size.width, size.height)
    }

    /// Fullscreen windows accept only exact video modes of their monitor.
    pub fn supports_resolution(&self, resolution: ScreenResolution) -> bool {
        if resolution.is_empty() {
            return false;
        }
        if !self.is_fullscreen() {
            return true;
        }
        let size = PhysicalSize::new(resolution.width, resolution.height);
        find_mode(self.window.current_monitor(), size).is_some()
    }

    pub fn set_resolution(&mut self, resolution: ScreenResolution) -> bool {
        if !self.supports_resolution(resolution) {
            return false;
        }
        let size = PhysicalSize::new(resolution.width, resolution.height);
        if self.is_fullscreen() {
            match find_mode(self.window.current_monitor(), size) {
                Some(mode) => self.window.set_fullscreen(Some(Fullscreen::Exclusive(mode))),
                None => return false,
            }
        } else {
            // The platform may apply the size asynchronously; it then
            // arrives as a resize event.
            let _ = self.window.request_inner_size(size);
        }
        tracing::info!(%resolution, "screen resolution changed");
        true
    }

    pub fn hide(&self) {
        self.window.set_visible(false);
    }
}
