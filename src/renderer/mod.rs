//! Software rendering
//!
//! Everything is drawn into RGBA layers on the CPU at display resolution and
//! composited into a single frame per tick.

pub mod compositor;
pub mod layer;
pub mod shapes;

pub use compositor::{Anchor, Compositor, Frame, TextItem, TextSize, shake_offset, wipe_radius};
pub use layer::{Layer, Rgba};
