//! wgpu surface backend.
//!
//! Draws batched solid-color rectangles in screen space through one
//! instanced pipeline. Coordinates are pixels with a top-left origin, the
//! same convention as the raster canvas.
//!
//! # Invariants
//! - A frame's draw calls are recorded on the CPU and submitted once, in
//!   `end_draw`.
//! - Swap chain loss is recovered by one reconfigure-and-retry; a second
//!   failure is returned to the caller.

mod camera;
mod gpu;
mod shaders;
mod surface;

pub use camera::ScreenProjection;
pub use gpu::{QuadBatch, QuadInstance, QuadRenderer};
pub use surface::{GpuFrame, GpuSurface};
