use crate::block::BlockEntity;
use crate::world::WorldId;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Shared handle to an entity drawing into `D`.
pub type EntityRef<D> = Rc<RefCell<dyn Entity<D>>>;

/// Something that lives in a [`World`](crate::World), updates once per step
/// and draws into a render context `D`.
///
/// The parent is a plain [`WorldId`]: it identifies membership and never
/// keeps a world alive.
pub trait Entity<D: ?Sized> {
    fn parent(&self) -> Option<WorldId>;

    fn set_parent(&mut self, parent: Option<WorldId>);

    /// Detach from the current world. The world drops the entity on its
    /// next update pass.
    fn remove_parent(&mut self) {
        self.set_parent(None);
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_, D>);

    fn render(&self, draw: &mut D);

    /// The collision body, if this entity has one.
    fn as_block(&self) -> Option<&BlockEntity> {
        None
    }
}

/// View of the world handed to an entity while it updates.
pub struct UpdateContext<'a, D: ?Sized> {
    world: WorldId,
    entities: &'a [EntityRef<D>],
    index: usize,
    spawned: Vec<EntityRef<D>>,
}

impl<'a, D: ?Sized> UpdateContext<'a, D> {
    pub(crate) fn new(world: WorldId, entities: &'a [EntityRef<D>], index: usize) -> Self {
        Self {
            world,
            entities,
            index,
            spawned: Vec::new(),
        }
    }

    /// The world running this update.
    pub fn world(&self) -> WorldId {
        self.world
    }

    /// Every other entity in collection order.
    pub fn others(&self) -> impl Iterator<Item = Ref<'a, dyn Entity<D>>> {
        let entities = self.entities;
        let index = self.index;
        entities
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != index)
            .filter_map(|(_, e)| e.try_borrow().ok())
    }

    /// Call `f` with the collision body of every other entity that has one.
    pub fn for_each_block(&self, mut f: impl FnMut(&BlockEntity)) {
        for other in self.others() {
            if let Some(block) = other.as_block() {
                f(block);
            }
        }
    }

    /// Queue `entity` for insertion directly after the current entity, behind
    /// any earlier spawns. It is updated later in the same pass.
    pub fn spawn(&mut self, entity: EntityRef<D>) {
        self.spawned.push(entity);
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<EntityRef<D>> {
        std::mem::take(&mut self.spawned)
    }
}
