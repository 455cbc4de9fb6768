//! Platform layer
//!
//! Handles the desktop window side of the loop:
//! - Keyboard polling and key mapping
//! - Frame pacing

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{KeyboardInput, map_key};
