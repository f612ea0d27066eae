use crate::error::RunnerError;
use crate::log::Logger;
use crate::pacer::FramePacer;
use crate::state::{Commands, GameState, StateContext};
use simplegame_assets::AssetRegistry;
use simplegame_input::{InputSink, KeyCode, MouseButton};
use simplegame_render::Surface;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

type StateRef<S> = Rc<RefCell<Box<dyn GameState<S>>>>;

/// The current state plus what a callback context is built from.
///
/// The surface's input slot holds a weak reference to this, never to the
/// runner, so the runner can own the surface without a cycle.
struct StateSlot<S: Surface> {
    current: Option<StateRef<S>>,
    assets: Rc<AssetRegistry>,
    screen: (u32, u32),
    mouse: (i32, i32),
    commands: Commands<S>,
}

impl<S: Surface> StateSlot<S> {
    fn context(&mut self) -> StateContext<'_, S> {
        StateContext::new(self.screen, self.mouse, &self.assets, &mut self.commands)
    }

    /// Swap in any pending state: old `on_exit`, then new `on_enter`.
    /// Transitions requested from either hook are applied in turn.
    fn apply_transitions(&mut self) {
        while let Some(next) = self.commands.next_state.take() {
            if let Some(old) = self.current.take() {
                let mut ctx = StateContext::new(self.screen, self.mouse, &self.assets, &mut self.commands);
                match old.try_borrow_mut() {
                    Ok(mut old) => old.on_exit(&mut ctx),
                    Err(_) => tracing::warn!("outgoing state is busy; on_exit skipped"),
                }
            }
            let next: StateRef<S> = Rc::new(RefCell::new(next));
            self.current = Some(next.clone());
            let mut ctx = StateContext::new(self.screen, self.mouse, &self.assets, &mut self.commands);
            next.borrow_mut().on_enter(&mut ctx);
            tracing::debug!("state entered");
        }
    }

    /// Hand one input callback to the current state, then apply any
    /// transition it requested so later events reach the new state.
    fn forward(&mut self, event: impl FnOnce(&mut dyn GameState<S>, &mut StateContext<'_, S>)) {
        let Some(state) = self.current.clone() else {
            tracing::trace!("no current state; input dropped");
            return;
        };
        {
            let mut ctx = self.context();
            match state.try_borrow_mut() {
                Ok(mut state) => event(&mut **state, &mut ctx),
                Err(_) => tracing::warn!("current state is busy; input dropped"),
            };
        }
        self.apply_transitions();
    }
}

impl<S: Surface> InputSink for StateSlot<S> {
    fn key_pressed(&mut self, code: KeyCode) {
        self.forward(|state, ctx| state.key(code, true, ctx));
    }

    fn key_released(&mut self, code: KeyCode) {
        self.forward(|state, ctx| state.key(code, false, ctx));
    }

    fn mouse_pressed(&mut self, button: MouseButton, x: i32, y: i32) {
        self.forward(|state, ctx| state.mouse(button, x, y, true, ctx));
    }

    fn mouse_released(&mut self, button: MouseButton, x: i32, y: i32) {
        self.forward(|state, ctx| state.mouse(button, x, y, false, ctx));
    }
}

/// Owns a surface and the current game state and drives them at a fixed
/// frame period.
///
/// Each frame: stop check, input flush, update, render, pacing sleep. The
/// state current at the start of a frame is used for the whole frame even
/// if it requests a transition part way through.
pub struct GameStateRunner<S: Surface + 'static> {
    surface: S,
    slot: Rc<RefCell<StateSlot<S>>>,
    assets: Rc<AssetRegistry>,
    pacer: FramePacer,
    logger: Option<Logger>,
    destroyed: bool,
}

impl<S: Surface + 'static> GameStateRunner<S> {
    /// Take ownership of `surface` and register as its input sink.
    pub fn new(mut surface: S, assets: impl Into<Rc<AssetRegistry>>) -> Self {
        let assets = assets.into();
        let slot = Rc::new(RefCell::new(StateSlot {
            current: None,
            assets: assets.clone(),
            screen: (surface.screen_width(), surface.screen_height()),
            mouse: surface.mouse_position(),
            commands: Commands::default(),
        }));
        let sink: Rc<RefCell<dyn InputSink>> = slot.clone();
        surface.register_input_sink(Rc::downgrade(&sink));

        Self {
            surface,
            slot,
            assets,
            pacer: FramePacer::default(),
            logger: None,
            destroyed: false,
        }
    }

    pub fn with_initial_state(mut self, state: impl GameState<S> + 'static) -> Self {
        self.set_state(state);
        self
    }

    /// Run the loop under `logger` instead of the ambient subscriber.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Make `state` current: the old state exits before the new one enters.
    pub fn set_state(&mut self, state: impl GameState<S> + 'static) {
        self.sync_slot();
        let mut slot = self.slot.borrow_mut();
        slot.commands.next_state = Some(Box::new(state));
        slot.apply_transitions();
    }

    /// Target frame rate; the period is `round(1000 / fps)` milliseconds.
    pub fn set_fps(&mut self, fps: u32) -> Result<(), RunnerError> {
        self.pacer = FramePacer::from_fps(fps)?;
        Ok(())
    }

    pub fn frame_period(&self) -> Duration {
        self.pacer.period()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn has_state(&self) -> bool {
        self.slot.borrow().current.is_some()
    }

    /// Run until there is no state or the surface asks to close, then
    /// destroy the surface.
    ///
    /// An error from a state or the surface stops the loop, destroys the
    /// surface and is returned.
    pub fn run(&mut self) -> Result<(), RunnerError> {
        match self.logger.as_ref().map(|logger| logger.dispatch().clone()) {
            Some(dispatch) => tracing::dispatcher::with_default(&dispatch, || self.run_loop()),
            None => self.run_loop(),
        }
    }

    fn run_loop(&mut self) -> Result<(), RunnerError> {
        tracing::info!(period_ms = self.pacer.period().as_millis() as u64, "runner started");
        self.apply_commands();
        let mut frames: u64 = 0;
        let result = loop {
            if self.should_stop() {
                break Ok(());
            }
            let frame_start = Instant::now();

            let Some(run_state) = self.slot.borrow().current.clone() else {
                break Ok(());
            };

            if let Err(e) = self.frame(&run_state) {
                break Err(e);
            }
            frames += 1;
            self.pacer.finish_frame(frame_start);
        };

        match &result {
            Ok(()) => tracing::info!(frames, "runner stopped"),
            Err(e) => tracing::error!(frames, error = %e, "runner failed"),
        }
        self.teardown();
        result
    }

    fn frame(&mut self, run_state: &StateRef<S>) -> Result<(), RunnerError> {
        self.sync_slot();
        self.surface.flush_input();
        self.sync_slot();
        self.apply_commands();

        {
            let mut slot = self.slot.borrow_mut();
            let mut ctx = slot.context();
            let mut state = run_state.borrow_mut();
            state.update(&mut ctx).map_err(RunnerError::State)?;
        }
        self.apply_commands();

        let mut draw = self.surface.begin_draw()?;
        run_state
            .borrow()
            .render(&mut draw, &self.assets)
            .map_err(RunnerError::State)?;
        self.surface.end_draw(draw)?;
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.destroyed || !self.has_state() || self.surface.is_requesting_to_close()
    }

    fn sync_slot(&mut self) {
        let mut slot = self.slot.borrow_mut();
        slot.screen = (self.surface.screen_width(), self.surface.screen_height());
        slot.mouse = self.surface.mouse_position();
    }

    /// Apply transitions and requests queued by the last callback.
    fn apply_commands(&mut self) {
        let (period, close) = {
            let mut slot = self.slot.borrow_mut();
            slot.apply_transitions();
            (slot.commands.period.take(), std::mem::take(&mut slot.commands.close))
        };
        if let Some(period) = period {
            tracing::debug!(period_ms = period.as_millis() as u64, "frame period changed");
            self.pacer.set_period(period);
        }
        if close {
            tracing::debug!("state requested close");
            self.surface.request_to_close();
        }
    }

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.surface.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplegame_input::InputEvent;
    use simplegame_render::{Color, HeadlessSurface, RasterFrame, SurfaceConfig};

    type Log = Rc<RefCell<Vec<String>>>;
    type Ctx<'a> = StateContext<'a, HeadlessSurface>;

    /// Records every callback as `"<name>.<event>"`.
    struct Recorder {
        name: &'static str,
        log: Log,
        updates: u32,
        on_update: Option<Box<dyn FnMut(u32, &mut Ctx<'_>)>>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
                updates: 0,
                on_update: None,
            }
        }

        fn on_update(mut self, f: impl FnMut(u32, &mut Ctx<'_>) + 'static) -> Self {
            self.on_update = Some(Box::new(f));
            self
        }

        fn record(&self, event: &str) {
            self.log.borrow_mut().push(format!("{}.{event}", self.name));
        }
    }

    impl GameState<HeadlessSurface> for Recorder {
        fn on_enter(&mut self, _ctx: &mut Ctx<'_>) {
            self.record("enter");
        }

        fn on_exit(&mut self, _ctx: &mut Ctx<'_>) {
            self.record("exit");
        }

        fn update(&mut self, ctx: &mut Ctx<'_>) -> anyhow::Result<()> {
            self.updates += 1;
            self.record("update");
            if let Some(f) = self.on_update.as_mut() {
                f(self.updates, ctx);
            }
            Ok(())
        }

        fn render(&self, draw: &mut RasterFrame, _assets: &AssetRegistry) -> anyhow::Result<()> {
            self.record("render");
            draw.clear(Color::WHITE);
            Ok(())
        }

        fn key(&mut self, code: KeyCode, pressed: bool, _ctx: &mut Ctx<'_>) {
            self.record(&format!("key {code:?} {pressed}"));
        }

        fn mouse(&mut self, button: MouseButton, x: i32, y: i32, pressed: bool, _ctx: &mut Ctx<'_>) {
            self.record(&format!("mouse {button:?} {x},{y} {pressed}"));
        }
    }

    fn headless(frames: u64) -> HeadlessSurface {
        HeadlessSurface::new(SurfaceConfig::new("test", 16, 12)).close_after(frames)
    }

    fn runner(frames: u64) -> GameStateRunner<HeadlessSurface> {
        let mut runner = GameStateRunner::new(headless(frames), AssetRegistry::new());
        runner.set_fps(1000).unwrap();
        runner
    }

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn set_state_exits_old_before_entering_new() {
        let log = new_log();
        let mut r = runner(1);
        r.set_state(Recorder::new("A", &log));
        r.set_state(Recorder::new("B", &log));
        assert_eq!(*log.borrow(), ["A.enter", "A.exit", "B.enter"]);
    }

    #[test]
    fn runs_until_surface_closes_then_destroys_once() {
        let log = new_log();
        let mut r = runner(3).with_initial_state(Recorder::new("A", &log));
        r.run().unwrap();

        let updates = log.borrow().iter().filter(|e| *e == "A.update").count();
        assert_eq!(updates, 3);
        assert_eq!(r.surface().frames_presented(), 3);
        assert_eq!(r.surface().destroy_calls(), 1);
        assert_eq!(r.surface().front().pixel(0, 0), Some(Color::WHITE));

        // A second run finds the surface gone and does nothing.
        r.run().unwrap();
        assert_eq!(r.surface().destroy_calls(), 1);
    }

    #[test]
    fn no_state_stops_immediately() {
        let mut r = runner(5);
        assert!(!r.has_state());
        r.run().unwrap();
        assert_eq!(r.surface().frames_presented(), 0);
        assert_eq!(r.surface().destroy_calls(), 1);
    }

    #[test]
    fn frame_keeps_the_state_it_started_with() {
        let log = new_log();
        let b_log = log.clone();
        let a = Recorder::new("A", &log).on_update(move |n, ctx| {
            if n == 1 {
                ctx.set_state(Recorder::new("B", &b_log));
            }
        });
        let mut r = runner(2).with_initial_state(a);
        r.run().unwrap();

        assert_eq!(
            *log.borrow(),
            [
                "A.enter", "A.update", "A.exit", "B.enter", "A.render", "B.update", "B.render",
            ]
        );
    }

    #[test]
    fn input_is_delivered_before_update() {
        let log = new_log();
        let mut r = runner(1).with_initial_state(Recorder::new("A", &log));
        r.surface_mut().push_event(InputEvent::Key {
            code: KeyCode::Space,
            pressed: true,
        });
        r.surface_mut().push_event(InputEvent::Mouse {
            button: MouseButton::Right,
            x: 4,
            y: 7,
            pressed: false,
        });
        r.run().unwrap();

        assert_eq!(
            *log.borrow(),
            ["A.enter", "A.key Space true", "A.mouse Right 4,7 false", "A.update", "A.render"]
        );
    }

    #[test]
    fn input_without_state_is_dropped() {
        let mut r = runner(1);
        r.surface_mut().push_event(InputEvent::Key {
            code: KeyCode::A,
            pressed: true,
        });
        r.surface_mut().flush_input();
        assert_eq!(r.surface().pending_events(), 0);
    }

    #[test]
    fn state_can_request_close() {
        let log = new_log();
        let a = Recorder::new("A", &log).on_update(|_, ctx| ctx.request_close());
        let mut r = runner(100).with_initial_state(a);
        r.run().unwrap();
        // The requesting frame still renders.
        assert_eq!(r.surface().frames_presented(), 1);
        assert!(r.surface().is_destroyed());
    }

    #[test]
    fn state_can_change_frame_rate() {
        let log = new_log();
        let a = Recorder::new("A", &log).on_update(|_, ctx| {
            assert!(ctx.set_fps(0).is_err());
            ctx.set_fps(500).unwrap();
        });
        let mut r = runner(1).with_initial_state(a);
        r.run().unwrap();
        assert_eq!(r.frame_period(), Duration::from_millis(2));
    }

    #[test]
    fn context_reports_screen_and_assets() {
        let mut assets = AssetRegistry::new();
        assets.insert_image("tile", simplegame_assets::Image::solid(1, 1, [0, 0, 0, 255]));
        let seen = Rc::new(RefCell::new(None));
        let out = seen.clone();
        let log = new_log();
        let a = Recorder::new("A", &log).on_update(move |_, ctx| {
            *out.borrow_mut() = Some((ctx.screen_width(), ctx.screen_height(), ctx.assets().image_count()));
        });
        let mut r = GameStateRunner::new(headless(1), assets).with_initial_state(a);
        r.run().unwrap();
        assert_eq!(*seen.borrow(), Some((16, 12, 1)));
    }

    #[test]
    fn update_error_stops_loop_and_destroys_surface() {
        struct Failing;

        impl GameState<HeadlessSurface> for Failing {
            fn update(&mut self, _ctx: &mut Ctx<'_>) -> anyhow::Result<()> {
                anyhow::bail!("boom")
            }

            fn render(&self, _draw: &mut RasterFrame, _assets: &AssetRegistry) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let mut r = runner(10).with_initial_state(Failing);
        let err = r.run().unwrap_err();
        assert!(matches!(err, RunnerError::State(_)));
        assert_eq!(err.to_string(), "game state failed: boom");
        assert_eq!(r.surface().frames_presented(), 0);
        assert_eq!(r.surface().destroy_calls(), 1);
    }

    #[test]
    fn default_period_and_fps_validation() {
        let mut r = GameStateRunner::new(headless(1), AssetRegistry::new());
        assert_eq!(r.frame_period(), Duration::from_millis(40));
        assert!(matches!(r.set_fps(0), Err(RunnerError::InvalidFps(0))));
        r.set_fps(30).unwrap();
        assert_eq!(r.frame_period(), Duration::from_millis(33));
    }

    #[test]
    fn frames_are_paced_to_the_period() {
        let stamps = Rc::new(RefCell::new(Vec::new()));
        let out = stamps.clone();
        let log = new_log();
        let a = Recorder::new("A", &log).on_update(move |_, _| out.borrow_mut().push(Instant::now()));
        let mut r = GameStateRunner::new(headless(3), AssetRegistry::new()).with_initial_state(a);
        r.set_fps(25).unwrap();
        r.run().unwrap();

        let stamps = stamps.borrow();
        assert_eq!(stamps.len(), 3);
        // Stamps are taken slightly after each frame start; allow for that.
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(39));
        }
    }

    #[test]
    fn loop_logs_through_injected_logger() {
        use crate::log::{LogConfig, LogSink};

        let path = std::env::temp_dir().join(format!("simplegame-runner-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let logger = Logger::new(&LogConfig::default().with_info_sink(LogSink::File(path.clone())));

        let log = new_log();
        let mut r = runner(1).with_initial_state(Recorder::new("A", &log)).with_logger(logger);
        r.run().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("runner started"));
        assert!(text.contains("runner stopped"));
    }

    #[test]
    fn input_transition_redirects_later_events() {
        struct Menu(Log);

        impl GameState<HeadlessSurface> for Menu {
            fn update(&mut self, _ctx: &mut Ctx<'_>) -> anyhow::Result<()> {
                Ok(())
            }

            fn render(&self, _draw: &mut RasterFrame, _assets: &AssetRegistry) -> anyhow::Result<()> {
                Ok(())
            }

            fn key(&mut self, code: KeyCode, pressed: bool, ctx: &mut Ctx<'_>) {
                self.0.borrow_mut().push(format!("Menu.key {code:?} {pressed}"));
                if code == KeyCode::Enter && pressed {
                    ctx.set_state(Recorder::new("Game", &self.0));
                }
            }
        }

        let log = new_log();
        let mut r = runner(1).with_initial_state(Menu(log.clone()));
        for (code, pressed) in [(KeyCode::Enter, true), (KeyCode::Right, true)] {
            r.surface_mut().push_event(InputEvent::Key { code, pressed });
        }
        r.run().unwrap();

        assert_eq!(
            *log.borrow(),
            ["Menu.key Enter true", "Game.enter", "Game.key Right true"]
        );
    }
}
