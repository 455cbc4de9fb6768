//! Ninja Game - a small 2D action platformer
//!
//! Core modules:
//! - `sim`: Game orchestration (state machine, level lifecycle, per-tick pipeline)
//! - `world`: Terrain, actors and visual effects driven by the pipeline
//! - `renderer`: Software RGBA layers and the frame compositor
//! - `persistence`: Level-completion progress on disk
//! - `platform`: Keyboard mapping and frame pacing
//! - `audio`: Sound effect playback for gameplay feedback

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod world;

pub use error::{GameError, GameResult};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed tick rate of the main loop
    pub const TICK_RATE: u32 = 60;

    /// Internal render resolution
    pub const DISPLAY_WIDTH: usize = 320;
    pub const DISPLAY_HEIGHT: usize = 240;
    /// Window resolution (display is scaled up to this)
    pub const WINDOW_WIDTH: i32 = 640;
    pub const WINDOW_HEIGHT: i32 = 480;

    /// Level grid
    pub const TILE_SIZE: i32 = 16;

    /// Iris wipe runs from -TRANSITION_TICKS (opening) to +TRANSITION_TICKS (closed)
    pub const TRANSITION_TICKS: i32 = 30;
    /// Iris radius in pixels per transition step
    pub const WIPE_RADIUS_STEP: i32 = 8;

    /// Death counter value at which the iris starts closing
    pub const DEATH_FADE_TICKS: u32 = 10;
    /// Death counter value past which the level reloads
    pub const DEATH_RELOAD_TICKS: u32 = 40;

    /// Projectiles older than this many ticks expire
    pub const PROJECTILE_LIFETIME: u32 = 360;
    /// Pixels per tick along the projectile's direction
    pub const PROJECTILE_SPEED: f32 = 1.5;

    /// Dash counter magnitude at or above which the player ignores projectiles
    pub const DASH_INVULNERABILITY: i32 = 50;
    /// Minimum screenshake after any damage
    pub const DAMAGE_SCREENSHAKE: u32 = 16;

    /// Camera follows the player by 1/CAMERA_SMOOTHING of the gap per tick
    pub const CAMERA_SMOOTHING: f32 = 30.0;

    /// Leaf spawn probability is area / LEAF_SPAWN_AREA per tick
    pub const LEAF_SPAWN_AREA: f32 = 49999.0;

    /// Sparks/particles in a damage burst
    pub const BURST_COUNT: usize = 30;
    /// Sparks thrown by a projectile hitting a wall
    pub const IMPACT_SPARKS: usize = 4;

    /// Silhouette alpha threshold and shade
    pub const SILHOUETTE_ALPHA_THRESHOLD: u8 = 127;
    pub const SILHOUETTE_SHADE: [u8; 4] = [0, 0, 0, 180];
}

/// Center of the internal display, in display pixels
#[inline]
pub fn display_center() -> Vec2 {
    Vec2::new(
        consts::DISPLAY_WIDTH as f32 / 2.0,
        consts::DISPLAY_HEIGHT as f32 / 2.0,
    )
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
