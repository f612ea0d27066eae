use crate::entity::{Entity, UpdateContext};
use crate::world::WorldId;
use simplegame_common::Vector2D;

/// An axis-aligned rectangular body.
///
/// Non-anchored blocks integrate acceleration into velocity and velocity
/// into position once per update, then resolve overlap against every other
/// collidable block in their world (one pass, collection order). Anchored
/// blocks behave as static, infinite-mass bodies.
///
/// Resolution pushes this block out along the axis of smaller penetration
/// and zeroes its velocity on that axis. Equal penetration on both axes
/// resolves along X. Deep overlaps inside stacks of several bodies may take
/// more than one update to separate.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntity {
    parent: Option<WorldId>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    velocity: Vector2D,
    acceleration: Vector2D,
    anchored: bool,
    collidable: bool,
}

impl BlockEntity {
    /// A collidable block at rest. Negative sizes are clamped to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32, anchored: bool) -> Self {
        Self {
            parent: None,
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
            velocity: Vector2D::ZERO,
            acceleration: Vector2D::ZERO,
            anchored,
            collidable: true,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn velocity_mut(&mut self) -> &mut Vector2D {
        &mut self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector2D) {
        self.velocity = velocity;
    }

    pub fn acceleration(&self) -> Vector2D {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: Vector2D) {
        self.acceleration = acceleration;
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn set_anchored(&mut self, anchored: bool) {
        self.anchored = anchored;
    }

    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    pub fn set_collidable(&mut self, collidable: bool) {
        self.collidable = collidable;
    }

    /// `(x, y, width, height)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.width, self.height)
    }

    /// Signed gaps between the two boxes on X and Y; both negative means the
    /// boxes overlap.
    pub fn penetration(&self, other: &BlockEntity) -> (f32, f32) {
        let pen_x = self.x.max(other.x) - (self.x + self.width).min(other.x + other.width);
        let pen_y = self.y.max(other.y) - (self.y + self.height).min(other.y + other.height);
        (pen_x, pen_y)
    }

    pub fn overlaps(&self, other: &BlockEntity) -> bool {
        let (pen_x, pen_y) = self.penetration(other);
        pen_x < 0.0 && pen_y < 0.0
    }

    /// One Euler step: velocity += acceleration, position += velocity.
    /// Anchored blocks do not move.
    pub fn integrate(&mut self) {
        if self.anchored {
            return;
        }
        self.velocity.add_local(self.acceleration);
        self.x += self.velocity.x;
        self.y += self.velocity.y;
    }

    /// Integrate, then resolve against the world if collidable.
    ///
    /// `on_collide` runs after each repositioning and before the velocity
    /// component is zeroed. Returns the number of collisions resolved.
    pub fn step<D: ?Sized>(
        &mut self,
        ctx: &UpdateContext<'_, D>,
        mut on_collide: impl FnMut(&mut BlockEntity, &BlockEntity),
    ) -> usize {
        if self.anchored {
            return 0;
        }
        self.integrate();
        if !self.collidable {
            return 0;
        }
        self.check_collisions(ctx, &mut on_collide)
    }

    /// Resolve overlap against every other block in the world, in
    /// collection order. Returns the number of collisions resolved.
    pub fn check_collisions<D: ?Sized>(
        &mut self,
        ctx: &UpdateContext<'_, D>,
        on_collide: &mut impl FnMut(&mut BlockEntity, &BlockEntity),
    ) -> usize {
        let mut hits = 0;
        ctx.for_each_block(|other| {
            if self.handle_collide(other, &mut *on_collide) {
                hits += 1;
            }
        });
        hits
    }

    /// Detect and resolve overlap with `other`; returns whether they collided.
    ///
    /// Either side being non-collidable means no collision. An anchored
    /// block is never repositioned and keeps its velocity, but the hook
    /// still runs.
    pub fn handle_collide(
        &mut self,
        other: &BlockEntity,
        on_collide: &mut impl FnMut(&mut BlockEntity, &BlockEntity),
    ) -> bool {
        if !self.collidable || !other.collidable {
            return false;
        }
        let (pen_x, pen_y) = self.penetration(other);
        if !(pen_x < 0.0 && pen_y < 0.0) {
            return false;
        }

        if self.anchored {
            on_collide(self, other);
            return true;
        }

        // The less negative penetration is the axis closer to separating.
        if pen_y > pen_x {
            if self.y < other.y {
                self.y = other.y - self.height;
            } else {
                self.y = other.y + other.height;
            }
            on_collide(self, other);
            self.velocity.y = 0.0;
        } else {
            if self.x < other.x {
                self.x = other.x - self.width;
            } else {
                self.x = other.x + other.width;
            }
            on_collide(self, other);
            self.velocity.x = 0.0;
        }
        true
    }
}

impl<D: ?Sized> Entity<D> for BlockEntity {
    fn parent(&self) -> Option<WorldId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<WorldId>) {
        self.parent = parent;
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_, D>) {
        self.step(ctx, |_, _| {});
    }

    fn render(&self, _draw: &mut D) {}

    fn as_block(&self) -> Option<&BlockEntity> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn no_hook() -> impl FnMut(&mut BlockEntity, &BlockEntity) {
        |_, _| {}
    }

    #[test]
    fn resolves_along_x_against_anchored_block() {
        let mut a = BlockEntity::new(0.0, 0.0, 10.0, 10.0, false);
        a.set_velocity(Vector2D::new(3.0, 1.0));
        let b = BlockEntity::new(5.0, 0.0, 10.0, 10.0, true);
        let before = b.clone();

        assert!(a.handle_collide(&b, &mut no_hook()));

        // Pushed flush against B's left edge.
        assert_eq!(a.x(), -5.0);
        assert_eq!(a.x() + a.width(), b.x());
        assert_eq!(a.velocity().x, 0.0);
        assert_eq!(a.velocity().y, 1.0);
        assert_eq!(b, before);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn resolves_along_y_when_y_is_shallower() {
        let mut a = BlockEntity::new(0.0, 8.0, 10.0, 10.0, false);
        a.set_velocity(Vector2D::new(2.0, 5.0));
        let floor = BlockEntity::new(-20.0, 15.0, 100.0, 10.0, true);

        assert!(a.handle_collide(&floor, &mut no_hook()));

        assert_eq!(a.y(), 5.0);
        assert_eq!(a.velocity(), Vector2D::new(2.0, 0.0));
        assert!(!a.overlaps(&floor));
    }

    #[test]
    fn pushes_to_far_side_when_starting_past_the_other() {
        let mut a = BlockEntity::new(8.0, 0.0, 10.0, 10.0, false);
        let b = BlockEntity::new(0.0, -50.0, 10.0, 100.0, true);
        assert!(a.handle_collide(&b, &mut no_hook()));
        assert_eq!(a.x(), 10.0);
    }

    #[test]
    fn equal_penetration_resolves_along_x() {
        let mut a = BlockEntity::new(0.0, 0.0, 10.0, 10.0, false);
        a.set_velocity(Vector2D::new(1.0, 1.0));
        let b = BlockEntity::new(5.0, 5.0, 10.0, 10.0, true);
        assert_eq!(a.penetration(&b), (-5.0, -5.0));

        assert!(a.handle_collide(&b, &mut no_hook()));

        assert_eq!(a.x(), -5.0);
        assert_eq!(a.y(), 0.0);
        assert_eq!(a.velocity(), Vector2D::new(0.0, 1.0));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let mut a = BlockEntity::new(0.0, 0.0, 10.0, 10.0, false);
        let b = BlockEntity::new(10.0, 0.0, 10.0, 10.0, true);
        assert!(!a.handle_collide(&b, &mut no_hook()));
        assert_eq!(a.x(), 0.0);
    }

    #[test]
    fn zero_size_blocks_never_overlap() {
        let mut dot = BlockEntity::new(5.0, 5.0, 0.0, 0.0, false);
        let b = BlockEntity::new(0.0, 0.0, 10.0, 10.0, true);
        assert!(!dot.handle_collide(&b, &mut no_hook()));
        assert!(!b.overlaps(&dot));
    }

    #[test]
    fn non_collidable_sides_are_skipped() {
        let mut a = BlockEntity::new(0.0, 0.0, 10.0, 10.0, false);
        let mut b = BlockEntity::new(5.0, 0.0, 10.0, 10.0, true);
        b.set_collidable(false);
        assert!(!a.handle_collide(&b, &mut no_hook()));

        b.set_collidable(true);
        a.set_collidable(false);
        assert!(!a.handle_collide(&b, &mut no_hook()));
        assert_eq!(a.x(), 0.0);
    }

    #[test]
    fn hook_sees_repositioned_block_with_velocity_intact() {
        let mut a = BlockEntity::new(0.0, 0.0, 10.0, 10.0, false);
        a.set_velocity(Vector2D::new(4.0, 0.0));
        let b = BlockEntity::new(5.0, 0.0, 10.0, 10.0, true);

        let mut seen = None;
        a.handle_collide(&b, &mut |me: &mut BlockEntity, other: &BlockEntity| {
            seen = Some((me.x(), me.velocity().x, other.x()));
        });

        assert_eq!(seen, Some((-5.0, 4.0, 5.0)));
        assert_eq!(a.velocity().x, 0.0);
    }

    #[test]
    fn anchored_block_is_never_repositioned_but_hook_runs() {
        let mut a = BlockEntity::new(0.0, 0.0, 10.0, 10.0, true);
        a.set_velocity(Vector2D::new(2.0, 2.0));
        let b = BlockEntity::new(5.0, 0.0, 10.0, 10.0, true);
        let mut calls = 0;
        assert!(a.handle_collide(&b, &mut |_: &mut BlockEntity, _: &BlockEntity| calls += 1));
        assert_eq!(calls, 1);
        assert_eq!(a.bounds(), (0.0, 0.0, 10.0, 10.0));
        assert_eq!(a.velocity(), Vector2D::new(2.0, 2.0));
    }

    #[test]
    fn anchored_update_ignores_acceleration() {
        let mut w: World<()> = World::new();
        let mut block = BlockEntity::new(1.0, 2.0, 3.0, 4.0, true);
        block.set_velocity(Vector2D::new(1.0, 1.0));
        block.set_acceleration(Vector2D::new(0.0, 9.8));
        let block = w.spawn(block);

        for _ in 0..5 {
            w.update_entities();
        }

        let b = block.borrow();
        assert_eq!((b.x(), b.y()), (1.0, 2.0));
        assert_eq!(b.velocity(), Vector2D::new(1.0, 1.0));
    }

    #[test]
    fn free_block_integrates_acceleration_then_velocity() {
        let mut w: World<()> = World::new();
        let mut block = BlockEntity::new(0.0, 0.0, 1.0, 1.0, false);
        block.set_acceleration(Vector2D::new(0.0, 1.0));
        let block = w.spawn(block);

        w.update_entities();
        w.update_entities();

        let b = block.borrow();
        assert_eq!(b.velocity(), Vector2D::new(0.0, 2.0));
        assert_eq!(b.y(), 3.0);
    }

    #[test]
    fn world_update_resolves_the_moving_block_only() {
        let mut w: World<()> = World::new();
        let a = w.spawn(BlockEntity::new(0.0, 0.0, 10.0, 10.0, false));
        let b = w.spawn(BlockEntity::new(5.0, 0.0, 10.0, 10.0, true));

        w.update_entities();

        assert_eq!(a.borrow().x(), -5.0);
        assert_eq!(a.borrow().velocity().x, 0.0);
        assert_eq!(b.borrow().bounds(), (5.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn two_free_blocks_separate_on_chosen_axis() {
        let mut w: World<()> = World::new();
        let mut left = BlockEntity::new(0.0, 0.0, 10.0, 10.0, false);
        left.set_velocity(Vector2D::new(2.0, 0.0));
        let left = w.spawn(left);
        let right = w.spawn(BlockEntity::new(5.0, 8.0, 10.0, 10.0, false));

        w.update_entities();

        // left moved to x=2 and overlapped right by 7 on X and 2 on Y:
        // Y is closer to separating, so left is pushed above right.
        let l = left.borrow();
        let r = right.borrow();
        assert_eq!(l.y() + l.height(), r.y());
        assert_eq!(l.velocity().y, 0.0);
        assert!(!l.overlaps(&r));
    }

    #[test]
    fn step_counts_collisions_and_calls_hook() {
        struct Crate {
            body: BlockEntity,
            hits: Rc<RefCell<Vec<f32>>>,
        }

        impl Entity<()> for Crate {
            fn parent(&self) -> Option<WorldId> {
                self.body.parent
            }
            fn set_parent(&mut self, parent: Option<WorldId>) {
                self.body.parent = parent;
            }
            fn update(&mut self, ctx: &mut UpdateContext<'_, ()>) {
                let hits = self.hits.clone();
                self.body.step(ctx, |me, _| hits.borrow_mut().push(me.velocity().y));
            }
            fn render(&self, _draw: &mut ()) {}
            fn as_block(&self) -> Option<&BlockEntity> {
                Some(&self.body)
            }
        }

        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut w: World<()> = World::new();
        let mut body = BlockEntity::new(0.0, 0.0, 10.0, 10.0, false);
        body.set_acceleration(Vector2D::new(0.0, 2.0));
        let falling = w.spawn(Crate {
            body,
            hits: hits.clone(),
        });
        w.spawn(BlockEntity::new(-50.0, 11.0, 200.0, 10.0, true));

        w.update_entities();

        assert_eq!(*hits.borrow(), vec![2.0]);
        let c = falling.borrow();
        assert_eq!(c.body.y(), 1.0);
        assert_eq!(c.body.velocity(), Vector2D::ZERO);
    }
}
