//! Game State Runner: state lifecycle and frame pacing.
//!
//! # Invariants
//! - At most one state is entered at a time; `on_exit` of the old state
//!   completes before `on_enter` of the new one.
//! - Update and render run against the state that was current when the
//!   frame began. Input events go to whichever state is current when they
//!   are delivered, so a transition requested from input applies before the
//!   next event.
//! - The surface is destroyed exactly once, when the loop ends.
//! - A failing `update` or `render` stops the loop and is returned.

mod error;
mod log;
mod pacer;
mod runner;
mod state;

pub use error::RunnerError;
pub use log::{LogConfig, LogSink, Logger};
pub use pacer::FramePacer;
pub use runner::GameStateRunner;
pub use state::{GameState, StateContext};
