//! World collaborators
//!
//! Terrain, actors and short-lived effects. The orchestrator in `sim` decides
//! when these run and what happens with their results; they only know how to
//! move and draw themselves.

pub mod clouds;
pub mod entity;
pub mod particle;
pub mod spark;
pub mod tilemap;

pub use clouds::{Cloud, Clouds};
pub use entity::{Enemy, PhysicsBody, Player};
pub use particle::{Animation, Particle, ParticleKind};
pub use spark::Spark;
pub use tilemap::{LevelLibrary, Tile, TileKind, Tilemap};

use glam::{IVec2, Vec2};
use rand_pcg::Pcg32;

use crate::renderer::Layer;
use crate::sim::{GameEvent, Projectile, Rect};

/// Static level geometry as seen by physics and the pipeline
pub trait Terrain {
    /// True if `pos` lies in a solid tile
    fn solid_check(&self, pos: Vec2) -> bool;
    /// Solid tile rects in the 3x3 neighbourhood of `pos`
    fn physics_rects_around(&self, pos: Vec2) -> Vec<Rect>;
    fn render(&self, layer: &mut Layer, offset: IVec2);
}

/// What an enemy may know about the player this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub pos: Vec2,
    pub rect: Rect,
    /// Player dash counter (signed)
    pub dash: i32,
}

/// Everything an actor may touch during its update.
///
/// Borrowed from the orchestrator for a single call; nothing in here outlives
/// the tick.
pub struct ActorContext<'a> {
    pub rng: &'a mut Pcg32,
    pub target: Target,
    pub projectiles: &'a mut Vec<Projectile>,
    pub particles: &'a mut Vec<Particle>,
    pub sparks: &'a mut Vec<Spark>,
    pub events: &'a mut Vec<GameEvent>,
}

/// Shared capability of the player and enemies
pub trait Actor {
    /// Advance one tick. Returns true when the actor is out of play
    /// (an enemy was defeated, the player fell out of the world).
    fn update(&mut self, terrain: &dyn Terrain, movement: f32, ctx: &mut ActorContext<'_>) -> bool;
    fn render(&self, layer: &mut Layer, offset: IVec2);
    fn rect(&self) -> Rect;
}
