//! Audio playback using macroquad
//!
//! Sound effects are plain WAV files. Any file that fails to load is logged
//! once and that effect stays silent.

use std::path::Path;

use macroquad::audio::{PlaySoundParams, Sound, load_sound, play_sound};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    Dash,
    /// Player hurt or enemy defeated
    Hit,
    Shoot,
    /// Looping wind bed
    Ambience,
    /// Looping background track
    Music,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::Jump,
        SoundEffect::Dash,
        SoundEffect::Hit,
        SoundEffect::Shoot,
        SoundEffect::Ambience,
        SoundEffect::Music,
    ];

    /// Mix level before settings are applied
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Jump => 0.7,
            SoundEffect::Dash => 0.3,
            SoundEffect::Hit => 0.8,
            SoundEffect::Shoot => 0.4,
            SoundEffect::Ambience => 0.2,
            SoundEffect::Music => 0.5,
        }
    }

    pub fn looped(self) -> bool {
        matches!(self, SoundEffect::Ambience | SoundEffect::Music)
    }

    /// File name inside the sfx directory; music has its own path
    fn file_name(self) -> Option<&'static str> {
        match self {
            SoundEffect::Jump => Some("jump.wav"),
            SoundEffect::Dash => Some("dash.wav"),
            SoundEffect::Hit => Some("hit.wav"),
            SoundEffect::Shoot => Some("shoot.wav"),
            SoundEffect::Ambience => Some("ambience.wav"),
            SoundEffect::Music => None,
        }
    }

    /// Which sound, if any, a feedback event should trigger
    pub fn for_event(event: GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::Dash => Some(SoundEffect::Dash),
            GameEvent::Shoot => Some(SoundEffect::Shoot),
            GameEvent::Hit => Some(SoundEffect::Hit),
            GameEvent::PlayerDied | GameEvent::LevelStarted(_) | GameEvent::LevelCleared(_) => None,
        }
    }
}

/// Final playback volume after settings
pub fn effective_volume(settings: &Settings, effect: SoundEffect) -> f32 {
    if settings.muted {
        return 0.0;
    }
    let bus = if effect == SoundEffect::Music {
        settings.music_volume
    } else {
        settings.sfx_volume
    };
    (effect.base_volume() * settings.master_volume.clamp(0.0, 1.0) * bus.clamp(0.0, 1.0))
        .clamp(0.0, 1.0)
}

/// Audio manager for the game
pub struct AudioManager {
    sounds: Vec<(SoundEffect, Sound)>,
    settings: Settings,
}

impl AudioManager {
    /// Load every sound the game uses
    pub async fn load(settings: &Settings) -> Self {
        let mut sounds = Vec::new();
        for effect in SoundEffect::ALL {
            let path = match effect.file_name() {
                Some(name) => settings.sfx_dir.join(name),
                None => settings.music_path.clone(),
            };
            if let Some(sound) = load_one(&path).await {
                sounds.push((effect, sound));
            }
        }
        log::info!("Loaded {}/{} sounds", sounds.len(), SoundEffect::ALL.len());
        Self {
            sounds,
            settings: settings.clone(),
        }
    }

    fn sound(&self, effect: SoundEffect) -> Option<&Sound> {
        self.sounds.iter().find(|(e, _)| *e == effect).map(|(_, s)| s)
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let volume = effective_volume(&self.settings, effect);
        if volume <= 0.0 {
            return;
        }
        let Some(sound) = self.sound(effect) else { return };
        play_sound(
            sound,
            PlaySoundParams {
                looped: effect.looped(),
                volume,
            },
        );
    }

    /// Ambience and music, started once at boot
    pub fn start_loops(&self) {
        self.play(SoundEffect::Ambience);
        self.play(SoundEffect::Music);
    }

    pub fn handle(&self, event: GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}

async fn load_one(path: &Path) -> Option<Sound> {
    let Some(path_str) = path.to_str() else {
        log::warn!("Skipping sound with non UTF-8 path {}", path.display());
        return None;
    };
    match load_sound(path_str).await {
        Ok(sound) => Some(sound),
        Err(e) => {
            log::warn!("Failed to load sound {}: {:?} - it will stay silent", path.display(), e);
            None
        }
    }
}
