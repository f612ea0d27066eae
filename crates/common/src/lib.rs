//! Shared value types for the simplegame runtime.
//!
//! # Invariants
//! - Everything here is a plain value: no identity, no shared state.

mod counter;
mod vector;

pub use counter::Counter;
pub use vector::Vector2D;
