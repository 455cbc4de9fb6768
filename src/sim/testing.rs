//! Shared fixtures for simulation tests

use std::ops::{Deref, DerefMut};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tempfile::TempDir;

use super::state::{Game, GameEvent, Projectile};
use crate::persistence::ProgressStore;
use crate::settings::Settings;
use crate::world::{ActorContext, LevelLibrary, Particle, Spark, Target, Tile, TileKind, Tilemap};

/// Ground row (tile y) of the fixture levels; its top edge is y = 160
pub const FLOOR_ROW: i32 = 10;

/// Forty tiles of grass along row 10
pub fn flat_floor() -> Tilemap {
    let mut map = Tilemap::new(16);
    for x in 0..40 {
        map.insert(Tile::new(TileKind::Grass, 1, Vec2::new(x as f32, FLOOR_ROW as f32)));
    }
    map
}

/// Flat level with a player start at (32, 128), one leaf tree at (160, 64)
/// and `enemies` enemy spawners standing on the floor.
pub fn demo_level(enemies: usize) -> Tilemap {
    let mut map = flat_floor();
    map.insert(Tile::new(TileKind::Spawners, 0, Vec2::new(2.0, 8.0)));
    map.insert(Tile::new(TileKind::LargeDecor, 2, Vec2::new(10.0, 4.0)));
    for i in 0..enemies {
        map.insert(Tile::new(
            TileKind::Spawners,
            1,
            Vec2::new(12.0 + 3.0 * i as f32, 9.0),
        ));
    }
    map
}

/// A game plus the temporary directory holding its progress record
pub struct Harness {
    pub game: Game,
    pub dir: TempDir,
}

impl Deref for Harness {
    type Target = Game;

    fn deref(&self) -> &Game {
        &self.game
    }
}

impl DerefMut for Harness {
    fn deref_mut(&mut self) -> &mut Game {
        &mut self.game
    }
}

pub fn game_with_levels(maps: Vec<Tilemap>) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = ProgressStore::new(dir.path().join("save.json"));
    let game = Game::new(LevelLibrary::from_maps(maps), store, Settings::default(), 42);
    Harness { game, dir }
}

/// Owned sinks an actor context can borrow from
pub struct Sinks {
    pub rng: Pcg32,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub sparks: Vec<Spark>,
    pub events: Vec<GameEvent>,
}

impl Sinks {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            projectiles: Vec::new(),
            particles: Vec::new(),
            sparks: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn ctx(&mut self, target: Target) -> ActorContext<'_> {
        ActorContext {
            rng: &mut self.rng,
            target,
            projectiles: &mut self.projectiles,
            particles: &mut self.particles,
            sparks: &mut self.sparks,
            events: &mut self.events,
        }
    }
}
