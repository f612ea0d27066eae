//! Entities of the sample platformer.

use crate::draw::DrawTarget;
use simplegame_assets::Image;
use simplegame_common::Vector2D;
use simplegame_kernel::{Animation, BlockEntity, Entity, Track, UpdateContext, WorldId};
use simplegame_render::Color;
use std::sync::Arc;

pub const GRAVITY: f32 = 0.6;
const MOVE_SPEED: f32 = 4.0;
const JUMP_SPEED: f32 = 11.0;

/// A drawn block: anchored level geometry or a falling crate.
pub struct Solid {
    body: BlockEntity,
    color: Color,
    sprite: Option<Arc<Image>>,
}

impl Solid {
    pub fn wall(x: f32, y: f32, width: f32, height: f32, color: Color) -> Self {
        Self {
            body: BlockEntity::new(x, y, width, height, true),
            color,
            sprite: None,
        }
    }

    /// A falling box; drawn with `sprite` when one is available.
    pub fn falling(x: f32, y: f32, size: f32, color: Color, sprite: Option<Arc<Image>>) -> Self {
        let mut body = BlockEntity::new(x, y, size, size, false);
        body.set_acceleration(Vector2D::new(0.0, GRAVITY));
        Self { body, color, sprite }
    }

    pub fn body(&self) -> &BlockEntity {
        &self.body
    }
}

impl Entity<DrawTarget> for Solid {
    fn parent(&self) -> Option<WorldId> {
        Entity::<DrawTarget>::parent(&self.body)
    }

    fn set_parent(&mut self, parent: Option<WorldId>) {
        Entity::<DrawTarget>::set_parent(&mut self.body, parent);
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_, DrawTarget>) {
        self.body.step(ctx, |_, _| {});
    }

    fn render(&self, draw: &mut DrawTarget) {
        let (x, y, w, h) = self.body.bounds();
        match &self.sprite {
            Some(image) => draw.draw_image(image, x, y),
            None => draw.fill_rect(x, y, w, h, self.color),
        }
    }

    fn as_block(&self) -> Option<&BlockEntity> {
        Some(&self.body)
    }
}

/// Held direction and jump keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The player: runs, jumps and lands on anything solid.
pub struct Player {
    body: BlockEntity,
    pub controls: Controls,
    grounded: bool,
    landings: u32,
    animation: Animation<Color>,
    idle: usize,
    running: usize,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        let mut body = BlockEntity::new(x, y, 24.0, 32.0, false);
        body.set_acceleration(Vector2D::new(0.0, GRAVITY));

        let mut animation = Animation::new();
        let idle = animation.add_track(
            Track::new(vec![Color::rgb(80, 160, 255), Color::rgb(100, 175, 255)]).with_frames_between(12),
        );
        let running = animation.add_track(Track::new(vec![
            Color::rgb(255, 200, 60),
            Color::rgb(255, 170, 40),
            Color::rgb(255, 140, 20),
        ]));
        animation.set_track(idle);

        Self {
            body,
            controls: Controls::default(),
            grounded: false,
            landings: 0,
            animation,
            idle,
            running,
        }
    }

    pub fn body(&self) -> &BlockEntity {
        &self.body
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn landings(&self) -> u32 {
        self.landings
    }
}

impl Entity<DrawTarget> for Player {
    fn parent(&self) -> Option<WorldId> {
        Entity::<DrawTarget>::parent(&self.body)
    }

    fn set_parent(&mut self, parent: Option<WorldId>) {
        Entity::<DrawTarget>::set_parent(&mut self.body, parent);
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_, DrawTarget>) {
        let dir = self.controls.right as i8 - self.controls.left as i8;
        self.body.velocity_mut().x = dir as f32 * MOVE_SPEED;
        if self.controls.jump && self.grounded {
            self.body.velocity_mut().y = -JUMP_SPEED;
        }
        self.animation.set_track(if dir == 0 { self.idle } else { self.running });
        self.animation.update();

        // The hook runs before the velocity is zeroed, so a positive y
        // velocity here means the player was falling onto `other`.
        let mut landed = false;
        self.body.step(ctx, |me, other| {
            if me.velocity().y > 0.0 && me.y() + me.height() <= other.y() + 0.01 {
                landed = true;
            }
        });
        if landed && !self.grounded {
            self.landings += 1;
        }
        self.grounded = landed;
    }

    fn render(&self, draw: &mut DrawTarget) {
        let (x, y, w, h) = self.body.bounds();
        let color = self.animation.current().copied().unwrap_or(Color::WHITE);
        draw.fill_rect(x, y, w, h, color);
        draw.stroke_rect(x, y, w, h, Color::WHITE);
    }

    fn as_block(&self) -> Option<&BlockEntity> {
        Some(&self.body)
    }
}
