//! Game state and core orchestration types
//!
//! [`Game`] is the single owned aggregate every tick runs against. Per-level
//! data lives in [`Stage`], which is rebuilt from scratch on every level load.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::Rect;
use crate::consts::*;
use crate::persistence::{ClearedSet, LevelIndex, ProgressStore};
use crate::renderer::{Compositor, Frame, Layer, Rgba};
use crate::settings::Settings;
use crate::world::{Clouds, Enemy, LevelLibrary, Particle, Player, Spark, Tilemap};

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    LevelSelect,
    Playing,
}

/// Something that moves the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Enter pressed
    Confirm,
    /// Escape pressed
    Back,
    /// The current level was finished
    LevelCleared { all_cleared: bool },
}

impl GameState {
    /// Transition table. `None` means the trigger does nothing here.
    pub fn next(self, trigger: Trigger) -> Option<GameState> {
        use GameState::*;
        match (self, trigger) {
            (Menu, Trigger::Confirm) => Some(LevelSelect),
            (LevelSelect, Trigger::Confirm) => Some(Playing),
            (LevelSelect, Trigger::Back) => Some(Menu),
            (Playing, Trigger::Back) => Some(LevelSelect),
            (Playing, Trigger::LevelCleared { all_cleared: true }) => Some(Menu),
            (Playing, Trigger::LevelCleared { all_cleared: false }) => Some(LevelSelect),
            _ => None,
        }
    }
}

/// What the main loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Feedback for audio, drained by the main loop once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    Dash,
    Shoot,
    Hit,
    PlayerDied,
    LevelStarted(LevelIndex),
    LevelCleared(LevelIndex),
}

/// Enemy bullet travelling horizontally
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// +1 right, -1 left
    pub direction: f32,
    /// Ticks alive
    pub age: u32,
}

impl Projectile {
    pub fn new(pos: Vec2, direction: f32) -> Self {
        Self {
            pos,
            direction: direction.signum(),
            age: 0,
        }
    }

    /// One tick of travel. `direction` only carries the sign; the distance
    /// covered is always `PROJECTILE_SPEED` pixels.
    pub fn advance(&mut self) {
        self.pos.x += self.direction * PROJECTILE_SPEED;
        self.age += 1;
    }

    pub fn expired(&self) -> bool {
        self.age > PROJECTILE_LIFETIME
    }

    pub fn render(&self, layer: &mut Layer, offset: IVec2) {
        let at = (self.pos - offset.as_vec2()).as_ivec2();
        layer.fill_rect(Rect::new(at.x - 2, at.y - 1, 5, 2), Rgba::rgb(255, 236, 200));
    }
}

/// Held horizontal movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub left: bool,
    pub right: bool,
}

impl Movement {
    /// right - left
    pub fn axis(self) -> f32 {
        self.right as i32 as f32 - self.left as i32 as f32
    }
}

/// Everything owned by the level being played
#[derive(Debug, Clone)]
pub struct Stage {
    pub index: LevelIndex,
    pub tilemap: Tilemap,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub sparks: Vec<Spark>,
    pub leaf_spawners: Vec<Rect>,
    /// Smoothed camera position
    pub scroll: Vec2,
    /// Death counter; 0 while alive
    pub dead: u32,
    /// Iris wipe counter in [-30, 30]
    pub transition: i32,
}

impl Stage {
    /// Fresh stage with nothing spawned yet
    pub fn new(index: LevelIndex, tilemap: Tilemap) -> Self {
        Self {
            index,
            tilemap,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            sparks: Vec::new(),
            leaf_spawners: Vec::new(),
            scroll: Vec2::ZERO,
            dead: 0,
            transition: -TRANSITION_TICKS,
        }
    }

    /// Integer camera offset for drawing
    pub fn render_scroll(&self) -> IVec2 {
        self.scroll.as_ivec2()
    }
}

/// Complete game: state machine, progress, current level
pub struct Game {
    pub state: GameState,
    pub player: Player,
    /// Present while a level is loaded
    pub stage: Option<Stage>,
    pub movement: Movement,
    pub screenshake: u32,
    pub cleared: ClearedSet,
    /// Level select cursor
    pub selected_level: LevelIndex,
    /// Ticks spent on the title screen
    pub menu_timer: u32,
    pub clouds: Clouds,
    pub compositor: Compositor,
    pub rng: Pcg32,
    pub settings: Settings,
    pub levels: LevelLibrary,
    pub progress: ProgressStore,
    pub(crate) events: Vec<GameEvent>,
}

impl Game {
    pub fn new(levels: LevelLibrary, progress: ProgressStore, settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut cleared = progress.load();
        let dropped = cleared.restrict_to(levels.count());
        if dropped > 0 {
            log::warn!(
                "Ignoring {} cleared entries beyond the {} available levels",
                dropped,
                levels.count()
            );
        }

        Self {
            state: GameState::Menu,
            player: Player::new(Vec2::new(50.0, 50.0)),
            stage: None,
            movement: Movement::default(),
            screenshake: 0,
            cleared,
            selected_level: 0,
            menu_timer: 0,
            clouds: Clouds::new(&mut rng),
            compositor: Compositor::new(),
            rng,
            settings,
            levels,
            progress,
            events: Vec::new(),
        }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.count()
    }

    /// Move the state machine; ignored (and logged) if the table says no
    pub fn apply(&mut self, trigger: Trigger) -> bool {
        match self.state.next(trigger) {
            Some(next) => {
                log::debug!("State {:?} -> {:?} on {:?}", self.state, next, trigger);
                self.state = next;
                true
            }
            None => {
                log::debug!("Ignoring {:?} in {:?}", trigger, self.state);
                false
            }
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Feedback queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Last fully rendered frame
    pub fn frame(&self) -> &Frame {
        self.compositor.frame()
    }

    /// Raise screenshake to at least the damage level
    pub(crate) fn shake(&mut self) {
        self.screenshake = self.screenshake.max(DAMAGE_SCREENSHAKE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use GameState::*;
        assert_eq!(Menu.next(Trigger::Confirm), Some(LevelSelect));
        assert_eq!(Menu.next(Trigger::Back), None);
        assert_eq!(LevelSelect.next(Trigger::Confirm), Some(Playing));
        assert_eq!(LevelSelect.next(Trigger::Back), Some(Menu));
        assert_eq!(Playing.next(Trigger::Back), Some(LevelSelect));
        assert_eq!(Playing.next(Trigger::Confirm), None);
        assert_eq!(
            Playing.next(Trigger::LevelCleared { all_cleared: true }),
            Some(Menu)
        );
        assert_eq!(
            Playing.next(Trigger::LevelCleared { all_cleared: false }),
            Some(LevelSelect)
        );
        assert_eq!(Menu.next(Trigger::LevelCleared { all_cleared: true }), None);
    }

    #[test]
    fn test_projectile_direction_and_lifetime() {
        let mut p = Projectile::new(Vec2::new(10.0, 5.0), -3.0);
        assert_eq!(p.direction, -1.0);
        p.advance();
        assert_eq!(p.pos, Vec2::new(8.5, 5.0));
        assert_eq!(p.age, 1);

        p.age = PROJECTILE_LIFETIME;
        assert!(!p.expired());
        p.advance();
        assert!(p.expired());
    }

    #[test]
    fn test_movement_axis() {
        let mut m = Movement::default();
        assert_eq!(m.axis(), 0.0);
        m.right = true;
        assert_eq!(m.axis(), 1.0);
        m.left = true;
        assert_eq!(m.axis(), 0.0);
        m.right = false;
        assert_eq!(m.axis(), -1.0);
    }

    #[test]
    fn test_new_stage_starts_fading_in() {
        let stage = Stage::new(2, Tilemap::new(16));
        assert_eq!(stage.transition, -30);
        assert_eq!(stage.dead, 0);
        assert_eq!(stage.render_scroll(), IVec2::ZERO);
    }
}
