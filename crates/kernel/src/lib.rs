//! World Kernel: entity ownership, per-step updates and block collision.
//!
//! # Invariants
//! - A world iterates its entities in insertion order.
//! - An entity whose parent is no longer the world is pruned, not updated.
//! - Anchored blocks never move.

pub mod animation;
pub mod block;
pub mod entity;
pub mod world;

pub use animation::{Animation, Track};
pub use block::BlockEntity;
pub use entity::{Entity, EntityRef, UpdateContext};
pub use world::{World, WorldId};
