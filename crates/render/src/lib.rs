//! Rendering Surface: the window contract shared by every backend.
//!
//! # Invariants
//! - Input reaches the registered sink only from inside `flush_input`.
//! - `end_draw` presents; nothing drawn is visible before it.
//! - Native resources are released exactly once, by `destroy` or on drop.
//!
//! There is no backend-neutral draw API: each backend hands out its own
//! draw context from `begin_draw`. The raster and headless backends share
//! [`RasterFrame`], so code written for one runs on the other.

mod canvas;
mod headless;
mod native;
mod raster;
mod surface;

pub use canvas::{Canvas, Color, RasterFrame};
pub use headless::HeadlessSurface;
pub use native::NativeWindow;
pub use raster::RasterSurface;
pub use surface::{ScreenResolution, Surface, SurfaceConfig, SurfaceError};
