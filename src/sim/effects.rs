//! Effect spawners
//!
//! Every randomized effect is a pure function of the RNG it is handed, so a
//! seeded generator reproduces the exact same sparks and particles.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::Rect;
use crate::angle_to_vec;
use crate::consts::*;
use crate::world::{Particle, ParticleKind, Spark};

/// Particles in the ring thrown at the start and end of a dash
pub const DASH_RING_COUNT: usize = 20;
/// Drift of a freshly spawned leaf
pub const LEAF_VELOCITY: Vec2 = Vec2::new(-0.1, 0.3);

/// Sparks and dust thrown out together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Burst {
    pub sparks: Vec<Spark>,
    pub particles: Vec<Particle>,
}

impl Burst {
    pub fn drain_into(self, sparks: &mut Vec<Spark>, particles: &mut Vec<Particle>) {
        sparks.extend(self.sparks);
        particles.extend(self.particles);
    }
}

/// Projectile hitting a wall: sparks fly back the way it came
pub fn impact_sparks<R: Rng>(pos: Vec2, direction: f32, rng: &mut R) -> Vec<Spark> {
    let back = if direction > 0.0 { PI } else { 0.0 };
    (0..IMPACT_SPARKS)
        .map(|_| Spark::new(pos, rng.random::<f32>() - 0.5 + back, 2.0 + rng.random::<f32>()))
        .collect()
}

/// Muzzle flash of a freshly fired projectile: sparks along the shot
pub fn muzzle_sparks<R: Rng>(pos: Vec2, direction: f32, rng: &mut R) -> Vec<Spark> {
    let ahead = if direction < 0.0 { PI } else { 0.0 };
    (0..IMPACT_SPARKS)
        .map(|_| Spark::new(pos, rng.random::<f32>() - 0.5 + ahead, 2.0 + rng.random::<f32>()))
        .collect()
}

/// Damage burst around `center`: sparks outward, dust the opposite way
pub fn burst<R: Rng>(center: Vec2, rng: &mut R) -> Burst {
    let mut out = Burst {
        sparks: Vec::with_capacity(BURST_COUNT),
        particles: Vec::with_capacity(BURST_COUNT),
    };
    for _ in 0..BURST_COUNT {
        let angle = rng.random::<f32>() * TAU;
        let speed = rng.random::<f32>() * 5.0;
        out.sparks
            .push(Spark::new(center, angle, 2.0 + rng.random::<f32>()));
        out.particles.push(Particle::new(
            ParticleKind::Dust,
            center,
            angle_to_vec(angle + PI) * speed * 0.5,
            rng.random_range(0..=7),
        ));
    }
    out
}

/// Burst plus two fast horizontal sparks, for a defeated enemy
pub fn defeat_burst<R: Rng>(center: Vec2, rng: &mut R) -> Burst {
    let mut out = burst(center, rng);
    out.sparks
        .push(Spark::new(center, 0.0, 5.0 + rng.random::<f32>()));
    out.sparks
        .push(Spark::new(center, PI, 5.0 + rng.random::<f32>()));
    out
}

/// Maybe drop a leaf from a tree canopy. Larger canopies shed more often.
pub fn leaf_from<R: Rng>(spawner: &Rect, rng: &mut R) -> Option<Particle> {
    if rng.random::<f32>() * LEAF_SPAWN_AREA >= spawner.area() as f32 {
        return None;
    }
    let pos = Vec2::new(
        spawner.x as f32 + rng.random::<f32>() * spawner.w as f32,
        spawner.y as f32 + rng.random::<f32>() * spawner.h as f32,
    );
    Some(Particle::new(
        ParticleKind::Leaf,
        pos,
        LEAF_VELOCITY,
        rng.random_range(0..=20),
    ))
}

/// Ring of dust around the player when a dash starts or ends
pub fn dash_ring<R: Rng>(center: Vec2, rng: &mut R) -> Vec<Particle> {
    (0..DASH_RING_COUNT)
        .map(|_| {
            let angle = rng.random::<f32>() * TAU;
            let speed = rng.random::<f32>() * 0.5 + 0.5;
            Particle::new(
                ParticleKind::Dust,
                center,
                angle_to_vec(angle) * speed,
                rng.random_range(0..=7),
            )
        })
        .collect()
}

/// Single dust puff trailing a dash moving in `sign` direction
pub fn dash_trail<R: Rng>(center: Vec2, sign: f32, rng: &mut R) -> Particle {
    Particle::new(
        ParticleKind::Dust,
        center,
        Vec2::new(sign * rng.random::<f32>() * 3.0, 0.0),
        rng.random_range(0..=7),
    )
}
