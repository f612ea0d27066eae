use crate::entity::{Entity, EntityRef, UpdateContext};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a world, used as the entity back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(u64);

impl WorldId {
    fn next() -> Self {
        Self(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Insertion-ordered owner of entities drawing into `D`.
///
/// Membership is decided by each entity's parent: an entity that points
/// anywhere else (or nowhere) is dropped on the next
/// [`update_entities`](Self::update_entities) without being updated.
pub struct World<D: ?Sized> {
    id: WorldId,
    entities: Vec<EntityRef<D>>,
}

impl<D: ?Sized + 'static> Default for World<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized + 'static> World<D> {
    /// Create an empty world with a fresh id.
    pub fn new() -> Self {
        Self {
            id: WorldId::next(),
            entities: Vec::new(),
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to the collection, in insertion order.
    pub fn entities(&self) -> &[EntityRef<D>] {
        &self.entities
    }

    pub fn contains(&self, entity: &EntityRef<D>) -> bool {
        self.entities.iter().any(|e| Rc::ptr_eq(e, entity))
    }

    /// Take ownership of `entity`, register it and return a typed handle.
    pub fn spawn<E: Entity<D> + 'static>(&mut self, entity: E) -> Rc<RefCell<E>> {
        let handle = Rc::new(RefCell::new(entity));
        let erased: EntityRef<D> = handle.clone();
        self.add_entity(erased);
        handle
    }

    /// Register an existing entity and point its parent here.
    ///
    /// Adding an entity that is already in the collection leaves the
    /// collection unchanged (it is re-attached if it had been detached).
    /// Returns `true` if the entity was newly inserted.
    pub fn add_entity(&mut self, entity: EntityRef<D>) -> bool {
        let end = self.entities.len();
        self.insert_entity(end, entity)
    }

    /// [`add_entity`](Self::add_entity) at position `at` instead of the end.
    fn insert_entity(&mut self, at: usize, entity: EntityRef<D>) -> bool {
        entity.borrow_mut().set_parent(Some(self.id));
        if self.contains(&entity) {
            return false;
        }
        self.entities.insert(at.min(self.entities.len()), entity);
        true
    }

    /// Update every member once, in insertion order.
    ///
    /// Entities whose parent is not this world are removed instead of
    /// updated. Entities spawned during an update are inserted right after
    /// the spawner and updated later in the same pass.
    pub fn update_entities(&mut self) {
        let mut i = 0;
        while i < self.entities.len() {
            let entity = Rc::clone(&self.entities[i]);
            if entity.borrow().parent() != Some(self.id) {
                self.entities.remove(i);
                tracing::debug!(world = ?self.id, index = i, "pruned detached entity");
                continue;
            }

            let spawned = {
                let mut ctx = UpdateContext::new(self.id, &self.entities, i);
                entity.borrow_mut().update(&mut ctx);
                ctx.take_spawned()
            };
            let mut at = i + 1;
            for new in spawned {
                if self.insert_entity(at, new) {
                    at += 1;
                }
            }
            i += 1;
        }
    }

    /// Draw every attached member in insertion order.
    pub fn render_entities(&self, draw: &mut D) {
        for entity in &self.entities {
            let entity = entity.borrow();
            if entity.parent() == Some(self.id) {
                entity.render(draw);
            }
        }
    }
}
