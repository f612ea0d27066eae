//! Title and play states, generic over any surface whose frame supports
//! [`Draw2d`].

use crate::draw::{Draw2d, DrawTarget};
use crate::game::{Player, Solid};
use simplegame_assets::{AssetRegistry, Image};
use simplegame_common::Counter;
use simplegame_input::KeyCode;
use simplegame_kernel::{Entity, Track, World};
use simplegame_render::{Color, Surface};
use simplegame_runner::{GameState, StateContext};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

pub const CRATE_SPRITE: &str = "crate";

const SKY: Color = Color::rgb(24, 28, 48);
const GROUND: Color = Color::rgb(70, 90, 60);
const WALL: Color = Color::rgb(90, 90, 110);
const MAX_CRATES: usize = 12;
const CRATE_SIZE: f32 = 20.0;

/// Title screen: Enter starts the game, Escape quits.
pub struct TitleState {
    pulse: Track<Color>,
    screen: (u32, u32),
}

impl TitleState {
    pub fn new() -> Self {
        Self {
            pulse: Track::new(vec![
                Color::rgb(200, 200, 220),
                Color::rgb(160, 160, 190),
                Color::rgb(120, 120, 160),
                Color::rgb(160, 160, 190),
            ])
            .with_frames_between(6),
            screen: (0, 0),
        }
    }
}

impl Default for TitleState {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> GameState<S> for TitleState
where
    S: Surface + 'static,
    S::DrawContext: Draw2d + 'static,
{
    fn on_enter(&mut self, ctx: &mut StateContext<'_, S>) {
        self.screen = (ctx.screen_width(), ctx.screen_height());
        tracing::info!("title screen");
    }

    fn update(&mut self, ctx: &mut StateContext<'_, S>) -> anyhow::Result<()> {
        self.screen = (ctx.screen_width(), ctx.screen_height());
        self.pulse.update();
        Ok(())
    }

    fn render(&self, draw: &mut S::DrawContext, _assets: &AssetRegistry) -> anyhow::Result<()> {
        let draw: &mut DrawTarget = draw;
        let (w, h) = (self.screen.0 as f32, self.screen.1 as f32);
        draw.clear(SKY);
        let color = self.pulse.current().copied().unwrap_or(Color::WHITE);
        draw.fill_rect(w * 0.2, h * 0.35, w * 0.6, h * 0.1, color);
        draw.stroke_rect(w * 0.2 - 4.0, h * 0.35 - 4.0, w * 0.6 + 8.0, h * 0.1 + 8.0, Color::WHITE);
        draw.fill_rect(w * 0.4, h * 0.6, w * 0.2, h * 0.04, GROUND);
        Ok(())
    }

    fn key(&mut self, code: KeyCode, pressed: bool, ctx: &mut StateContext<'_, S>) {
        if !pressed {
            return;
        }
        match code {
            KeyCode::Enter | KeyCode::Space => ctx.set_state(PlayState::new()),
            KeyCode::Escape => ctx.request_close(),
            _ => {}
        }
    }
}

/// The platformer: a walled room, a player and a steady rain of crates.
pub struct PlayState {
    world: World<DrawTarget>,
    player: Option<Rc<RefCell<Player>>>,
    crates: VecDeque<Rc<RefCell<Solid>>>,
    spawn_timer: Counter,
    spawned: u32,
    screen: (u32, u32),
    crate_sprite: Option<Arc<Image>>,
}

impl PlayState {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            player: None,
            crates: VecDeque::new(),
            spawn_timer: Counter::new(40, true),
            spawned: 0,
            screen: (0, 0),
            crate_sprite: None,
        }
    }

    pub fn crate_count(&self) -> usize {
        self.crates.len()
    }

    pub fn player(&self) -> Option<&Rc<RefCell<Player>>> {
        self.player.as_ref()
    }

    fn build_level(&mut self) {
        let (w, h) = (self.screen.0 as f32, self.screen.1 as f32);
        self.world.spawn(Solid::wall(0.0, h - 20.0, w, 20.0, GROUND));
        self.world.spawn(Solid::wall(0.0, 0.0, 10.0, h - 20.0, WALL));
        self.world.spawn(Solid::wall(w - 10.0, 0.0, 10.0, h - 20.0, WALL));
        self.world.spawn(Solid::wall(w * 0.55, h * 0.65, w * 0.25, 12.0, WALL));
        self.player = Some(self.world.spawn(Player::new(w * 0.25, h * 0.5)));
    }

    fn drop_crate(&mut self) {
        let lane = (self.screen.0 as f32 - 20.0 - CRATE_SIZE).max(1.0);
        let x = 10.0 + (self.spawned as f32 * 137.0) % lane;
        self.spawned += 1;
        let shade = 120 + (self.spawned * 23 % 100) as u8;
        let handle = self.world.spawn(Solid::falling(
            x,
            0.0,
            CRATE_SIZE,
            Color::rgb(shade, shade / 2 + 40, 30),
            self.crate_sprite.clone(),
        ));
        self.crates.push_back(handle);

        if self.crates.len() > MAX_CRATES {
            if let Some(oldest) = self.crates.pop_front() {
                // Detached entities are pruned on the world's next update.
                oldest.borrow_mut().remove_parent();
            }
        }
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> GameState<S> for PlayState
where
    S: Surface + 'static,
    S::DrawContext: Draw2d + 'static,
{
    fn on_enter(&mut self, ctx: &mut StateContext<'_, S>) {
        self.screen = (ctx.screen_width(), ctx.screen_height());
        self.crate_sprite = ctx.assets().get_image(CRATE_SPRITE);
        if self.crate_sprite.is_none() {
            tracing::debug!(key = CRATE_SPRITE, "sprite missing; crates drawn as rectangles");
        }
        self.build_level();
        tracing::info!(entities = self.world.entity_count(), "level started");
    }

    fn on_exit(&mut self, _ctx: &mut StateContext<'_, S>) {
        let landings = self.player.as_ref().map_or(0, |p| p.borrow().landings());
        tracing::info!(crates = self.spawned, landings, "level finished");
        self.world = World::new();
        self.player = None;
        self.crates.clear();
    }

    fn update(&mut self, _ctx: &mut StateContext<'_, S>) -> anyhow::Result<()> {
        if self.spawn_timer.update() {
            self.drop_crate();
        }
        self.world.update_entities();
        Ok(())
    }

    fn render(&self, draw: &mut S::DrawContext, _assets: &AssetRegistry) -> anyhow::Result<()> {
        let draw: &mut DrawTarget = draw;
        draw.clear(SKY);
        self.world.render_entities(draw);
        Ok(())
    }

    fn key(&mut self, code: KeyCode, pressed: bool, ctx: &mut StateContext<'_, S>) {
        if let Some(player) = &self.player {
            let mut player = player.borrow_mut();
            match code {
                KeyCode::Left | KeyCode::A => player.controls.left = pressed,
                KeyCode::Right | KeyCode::D => player.controls.right = pressed,
                KeyCode::Up | KeyCode::W | KeyCode::Space => player.controls.jump = pressed,
                _ => {}
            }
        }
        if !pressed {
            return;
        }
        match code {
            KeyCode::Enter => ctx.set_state(TitleState::new()),
            KeyCode::Escape => ctx.request_close(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplegame_input::InputEvent;
    use simplegame_render::{HeadlessSurface, SurfaceConfig};
    use simplegame_runner::GameStateRunner;

    fn key(code: KeyCode, pressed: bool) -> InputEvent {
        InputEvent::Key { code, pressed }
    }

    #[test]
    fn crates_are_capped_by_detaching_the_oldest() {
        let mut play = PlayState::new();
        play.screen = (320, 240);
        play.build_level();
        for _ in 0..MAX_CRATES + 3 {
            play.drop_crate();
        }
        assert_eq!(play.crate_count(), MAX_CRATES);

        play.world.update_entities();
        // Five level entities plus the live crates.
        assert_eq!(play.world.entity_count(), 5 + MAX_CRATES);
    }

    #[test]
    fn headless_session_reaches_play_and_moves_player() {
        let mut surface = HeadlessSurface::new(SurfaceConfig::new("demo", 320, 240)).close_after(20);
        surface.push_event(key(KeyCode::Enter, true));
        surface.push_event(key(KeyCode::Enter, false));

        let mut runner = GameStateRunner::new(surface, AssetRegistry::new()).with_initial_state(TitleState::new());
        runner.set_fps(1000).unwrap();
        runner.run().unwrap();

        assert_eq!(runner.surface().frames_presented(), 20);
        assert_eq!(runner.surface().destroy_calls(), 1);
        // The last frame shows the play state's background.
        assert_eq!(runner.surface().front().pixel(160, 5), Some(SKY));
        assert_eq!(runner.surface().front().pixel(160, 235), Some(GROUND));
    }
}
