use crate::error::RunnerError;
use crate::pacer::FramePacer;
use simplegame_assets::AssetRegistry;
use simplegame_input::{KeyCode, MouseButton};
use simplegame_render::Surface;
use std::time::Duration;

/// One discrete mode of a game: title screen, level, pause menu.
///
/// The runner calls `on_enter` when the state becomes current and
/// `on_exit` when it is replaced. Between the two it calls `update` once
/// per frame, then `render`, and forwards input as it arrives.
pub trait GameState<S: Surface> {
    fn on_enter(&mut self, _ctx: &mut StateContext<'_, S>) {}

    /// Release state-specific resources.
    fn on_exit(&mut self, _ctx: &mut StateContext<'_, S>) {}

    /// Advance the simulation by one fixed step. Must not draw.
    fn update(&mut self, ctx: &mut StateContext<'_, S>) -> anyhow::Result<()>;

    /// Draw the current simulation state.
    fn render(&self, draw: &mut S::DrawContext, assets: &AssetRegistry) -> anyhow::Result<()>;

    fn key(&mut self, _code: KeyCode, _pressed: bool, _ctx: &mut StateContext<'_, S>) {}

    /// `x` and `y` are client-area pixels.
    fn mouse(&mut self, _button: MouseButton, _x: i32, _y: i32, _pressed: bool, _ctx: &mut StateContext<'_, S>) {}
}

/// Requests a state made during a callback, applied by the runner once the
/// callback returns.
pub(crate) struct Commands<S: Surface> {
    pub(crate) next_state: Option<Box<dyn GameState<S>>>,
    pub(crate) period: Option<Duration>,
    pub(crate) close: bool,
}

impl<S: Surface> Default for Commands<S> {
    fn default() -> Self {
        Self {
            next_state: None,
            period: None,
            close: false,
        }
    }
}

/// What a state can see and ask for during one callback.
pub struct StateContext<'a, S: Surface> {
    screen: (u32, u32),
    mouse: (i32, i32),
    assets: &'a AssetRegistry,
    commands: &'a mut Commands<S>,
}

impl<'a, S: Surface> StateContext<'a, S> {
    pub(crate) fn new(
        screen: (u32, u32),
        mouse: (i32, i32),
        assets: &'a AssetRegistry,
        commands: &'a mut Commands<S>,
    ) -> Self {
        Self {
            screen,
            mouse,
            assets,
            commands,
        }
    }

    pub fn screen_width(&self) -> u32 {
        self.screen.0
    }

    pub fn screen_height(&self) -> u32 {
        self.screen.1
    }

    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    pub fn assets(&self) -> &AssetRegistry {
        self.assets
    }

    /// Replace the current state once this callback returns. A later
    /// request in the same callback wins.
    pub fn set_state(&mut self, next: impl GameState<S> + 'static) {
        if self.commands.next_state.is_some() {
            tracing::debug!("pending state transition replaced");
        }
        self.commands.next_state = Some(Box::new(next));
    }

    /// Change the target frame rate from the next frame on.
    pub fn set_fps(&mut self, fps: u32) -> Result<(), RunnerError> {
        self.commands.period = Some(FramePacer::period_for_fps(fps)?);
        Ok(())
    }

    /// Stop the runner before its next frame.
    pub fn request_close(&mut self) {
        self.commands.close = true;
    }
}
