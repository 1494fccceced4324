//! Utility helpers including vector extensions, the body arena, logging and profiling.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, BodyId, GenerationalId};
pub use math::*;
