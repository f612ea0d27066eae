//! Input: backend-neutral key codes, mouse buttons and the input sink contract.
//!
//! # Invariants
//! - Delivery is synchronous: a backend calls the sink while it pumps its
//!   platform events, never later.
//! - A backend holds at most one sink, and never owns it.

pub mod key;
pub mod sink;
#[cfg(feature = "winit")]
pub mod translate;

pub use key::{KeyCode, MouseButton};
pub use sink::{InputEvent, InputSink, InputSlot};
