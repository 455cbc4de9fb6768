//! Game settings and preferences
//!
//! Read from `settings.json` in the working directory. Anything missing or
//! unreadable falls back to the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on damage
    pub screen_shake: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,

    // === Data locations ===
    /// Directory holding `0.json`, `1.json`, ...
    pub maps_dir: PathBuf,
    /// Progress record
    pub save_path: PathBuf,
    /// Directory holding the sound effect files
    pub sfx_dir: PathBuf,
    /// Looping background track
    pub music_path: PathBuf,

    /// Fixed RNG seed (clock-derived when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            reduced_motion: false,

            maps_dir: PathBuf::from("data/maps"),
            save_path: PathBuf::from("data/save.json"),
            sfx_dir: PathBuf::from("data/sfx"),
            music_path: PathBuf::from("data/music.wav"),

            seed: None,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "settings.json";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Load settings from `settings.json` in the working directory
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
