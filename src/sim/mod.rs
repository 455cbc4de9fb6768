//! Game orchestration
//!
//! Everything that decides what happens on a tick lives here:
//! - Seeded RNG only, injected into every random effect
//! - One owned [`Game`] aggregate, no global state
//! - No window or audio dependencies; the binary feeds input in and pulls
//!   frames and feedback events out

pub mod collision;
pub mod effects;
pub mod level;
pub mod menu;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use collision::Rect;
pub use level::load_level;
pub use menu::{LevelEntry, cursor_down, cursor_up, level_entries};
pub use state::{Control, Game, GameEvent, GameState, Movement, Projectile, Stage, Trigger};
pub use tick::{InputEvent, Key, play_tick, tick};
