//! Player and enemies
//!
//! Both share [`PhysicsBody`]: velocity plus external movement, resolved one
//! axis at a time against the solid tiles around the body.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::{Actor, ActorContext, Target, Terrain};
use crate::renderer::{Layer, Rgba};
use crate::sim::effects::{dash_ring, dash_trail, defeat_burst, muzzle_sparks};
use crate::sim::{GameEvent, Projectile, Rect};

/// Hitbox of both the player and enemies
pub const ACTOR_SIZE: IVec2 = IVec2::new(8, 15);

const GRAVITY: f32 = 0.1;
const MAX_FALL_SPEED: f32 = 5.0;

/// Airborne ticks after which the player has fallen out of the world
pub const FALL_DEATH_TICKS: u32 = 120;
const JUMP_VELOCITY: f32 = -3.0;
const WALL_SLIDE_DELAY: u32 = 4;
const WALL_SLIDE_SPEED: f32 = 0.5;
const WALL_JUMP_VELOCITY: Vec2 = Vec2::new(3.5, -2.5);
const FRICTION: f32 = 0.1;

/// Dash counter at the start of a dash
pub const DASH_TICKS: i32 = 60;
/// Above this magnitude the dash is in its fast phase
const DASH_FAST_PHASE: i32 = 50;
const DASH_SPEED: f32 = 8.0;

const ENEMY_WALK_CHANCE: f32 = 0.01;
const ENEMY_WALK_SPEED: f32 = 0.5;
/// Horizontal reach of an enemy's ledge probe and gun
const ENEMY_REACH: i32 = 7;
/// Vertical window in which an enemy will shoot at the player
const ENEMY_SIGHT: f32 = 16.0;

/// Which sides touched terrain during the last update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub size: IVec2,
    pub velocity: Vec2,
    pub contacts: Contacts,
    /// Facing left
    pub flip: bool,
    pub last_movement: f32,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: IVec2) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            contacts: Contacts::default(),
            flip: false,
            last_movement: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x as i32, self.pos.y as i32, self.size.x, self.size.y)
    }

    /// Move by `movement + velocity`, stopping at solid tiles
    pub fn step(&mut self, terrain: &dyn Terrain, movement: f32) {
        self.contacts = Contacts::default();
        let frame_movement = Vec2::new(movement + self.velocity.x, self.velocity.y);

        self.pos.x += frame_movement.x;
        let mut rect = self.rect();
        for tile in terrain.physics_rects_around(self.pos) {
            if rect.collides(&tile) {
                if frame_movement.x > 0.0 {
                    rect.x = tile.x - rect.w;
                    self.contacts.right = true;
                }
                if frame_movement.x < 0.0 {
                    rect.x = tile.right();
                    self.contacts.left = true;
                }
                self.pos.x = rect.x as f32;
            }
        }

        self.pos.y += frame_movement.y;
        let mut rect = self.rect();
        for tile in terrain.physics_rects_around(self.pos) {
            if rect.collides(&tile) {
                if frame_movement.y > 0.0 {
                    rect.y = tile.y - rect.h;
                    self.contacts.down = true;
                }
                if frame_movement.y < 0.0 {
                    rect.y = tile.bottom();
                    self.contacts.up = true;
                }
                self.pos.y = rect.y as f32;
            }
        }

        if movement > 0.0 {
            self.flip = false;
        }
        if movement < 0.0 {
            self.flip = true;
        }
        self.last_movement = movement;

        self.velocity.y = (self.velocity.y + GRAVITY).min(MAX_FALL_SPEED);
        if self.contacts.down || self.contacts.up {
            self.velocity.y = 0.0;
        }
    }

    fn center(&self) -> Vec2 {
        self.rect().center().as_vec2()
    }
}

/// The ninja
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: PhysicsBody,
    pub air_time: u32,
    jumps: u32,
    wall_slide: bool,
    dashing: i32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: PhysicsBody::new(pos, ACTOR_SIZE),
            air_time: 0,
            jumps: 1,
            wall_slide: false,
            dashing: 0,
        }
    }

    /// Move to a level's start marker
    pub fn respawn(&mut self, pos: Vec2) {
        self.body.pos = pos;
        self.air_time = 0;
    }

    /// Stop all motion and cancel any dash
    pub fn reset_motion(&mut self) {
        self.body.velocity = Vec2::ZERO;
        self.dashing = 0;
    }

    /// Signed dash counter
    pub fn dashing(&self) -> i32 {
        self.dashing
    }

    /// |dash counter|; projectiles pass through at 50 and above
    pub fn dash_magnitude(&self) -> i32 {
        self.dashing.abs()
    }

    pub fn is_wall_sliding(&self) -> bool {
        self.wall_slide
    }

    pub fn target(&self) -> Target {
        Target {
            pos: self.body.pos,
            rect: self.body.rect(),
            dash: self.dashing,
        }
    }

    /// Jump, or kick off the wall being slid on. Returns true if it worked.
    pub fn jump(&mut self) -> bool {
        if self.wall_slide {
            let away = if self.body.flip && self.body.last_movement < 0.0 {
                1.0
            } else if !self.body.flip && self.body.last_movement > 0.0 {
                -1.0
            } else {
                return false;
            };
            self.body.velocity = Vec2::new(WALL_JUMP_VELOCITY.x * away, WALL_JUMP_VELOCITY.y);
            self.air_time = WALL_SLIDE_DELAY + 1;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }
        if self.jumps > 0 {
            self.body.velocity.y = JUMP_VELOCITY;
            self.jumps -= 1;
            self.air_time = WALL_SLIDE_DELAY + 1;
            return true;
        }
        false
    }

    /// Start a dash in the facing direction. Returns false mid-dash.
    pub fn dash(&mut self) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flip { -DASH_TICKS } else { DASH_TICKS };
        true
    }
}

impl Actor for Player {
    fn update(&mut self, terrain: &dyn Terrain, movement: f32, ctx: &mut ActorContext<'_>) -> bool {
        self.body.step(terrain, movement);

        self.air_time += 1;
        let fell = self.air_time > FALL_DEATH_TICKS;

        if self.body.contacts.down {
            self.air_time = 0;
            self.jumps = 1;
        }

        self.wall_slide = false;
        if (self.body.contacts.right || self.body.contacts.left) && self.air_time > WALL_SLIDE_DELAY {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(WALL_SLIDE_SPEED);
            self.body.flip = !self.body.contacts.right;
        }

        let center = self.body.center();
        if self.dash_magnitude() == DASH_TICKS || self.dash_magnitude() == DASH_FAST_PHASE {
            ctx.particles.extend(dash_ring(center, ctx.rng));
        }
        self.dashing -= self.dashing.signum();

        if self.dash_magnitude() > DASH_FAST_PHASE {
            let sign = self.dashing.signum() as f32;
            self.body.velocity.x = sign * DASH_SPEED;
            if self.dash_magnitude() == DASH_FAST_PHASE + 1 {
                self.body.velocity.x *= 0.1;
            }
            ctx.particles.push(dash_trail(center, sign, ctx.rng));
        }

        self.body.velocity.x = if self.body.velocity.x > 0.0 {
            (self.body.velocity.x - FRICTION).max(0.0)
        } else {
            (self.body.velocity.x + FRICTION).min(0.0)
        };

        fell
    }

    fn render(&self, layer: &mut Layer, offset: IVec2) {
        if self.dash_magnitude() > DASH_FAST_PHASE {
            return;
        }
        let rect = self.body.rect().offset(-offset);
        layer.fill_rect(rect, Rgba::rgb(28, 30, 44));
        // Headband on the facing side
        let band_x = if self.body.flip { rect.x } else { rect.x + 2 };
        layer.fill_rect(Rect::new(band_x, rect.y + 3, rect.w - 2, 2), Rgba::rgb(210, 48, 48));
    }

    fn rect(&self) -> Rect {
        self.body.rect()
    }
}

/// Patrolling gunner
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub body: PhysicsBody,
    /// Ticks left in the current walk; 0 when idle
    pub walking: u32,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: PhysicsBody::new(pos, ACTOR_SIZE),
            walking: 0,
        }
    }

    fn facing(&self) -> f32 {
        if self.body.flip { -1.0 } else { 1.0 }
    }

    /// Point just ahead of the feet, used to spot ledges
    fn ledge_probe(&self) -> Vec2 {
        let ahead = self.body.rect().center().x + ENEMY_REACH * self.facing() as i32;
        Vec2::new(ahead as f32, self.body.pos.y + 23.0)
    }

    fn try_shoot(&self, ctx: &mut ActorContext<'_>) {
        let dis = ctx.target.pos - self.body.pos;
        if dis.y.abs() >= ENEMY_SIGHT {
            return;
        }
        let direction = self.facing();
        if (direction < 0.0 && dis.x < 0.0) || (direction > 0.0 && dis.x > 0.0) {
            let center = self.body.rect().center();
            let muzzle = Vec2::new((center.x + ENEMY_REACH * direction as i32) as f32, center.y as f32);
            ctx.projectiles.push(Projectile::new(muzzle, direction));
            ctx.sparks.extend(muzzle_sparks(muzzle, direction, ctx.rng));
            ctx.events.push(GameEvent::Shoot);
        }
    }
}

impl Actor for Enemy {
    fn update(&mut self, terrain: &dyn Terrain, movement: f32, ctx: &mut ActorContext<'_>) -> bool {
        let mut movement = movement;
        if self.walking > 0 {
            if terrain.solid_check(self.ledge_probe()) {
                if self.body.contacts.right || self.body.contacts.left {
                    self.body.flip = !self.body.flip;
                } else {
                    movement = ENEMY_WALK_SPEED * self.facing();
                }
            } else {
                self.body.flip = !self.body.flip;
            }
            self.walking -= 1;
            if self.walking == 0 {
                self.try_shoot(ctx);
            }
        } else if ctx.rng.random::<f32>() < ENEMY_WALK_CHANCE {
            self.walking = ctx.rng.random_range(30..=120);
        }

        self.body.step(terrain, movement);

        if ctx.target.dash.abs() >= DASH_FAST_PHASE && self.body.rect().collides(&ctx.target.rect) {
            ctx.events.push(GameEvent::Hit);
            defeat_burst(self.body.center(), ctx.rng).drain_into(ctx.sparks, ctx.particles);
            return true;
        }
        false
    }

    fn render(&self, layer: &mut Layer, offset: IVec2) {
        let rect = self.body.rect().offset(-offset);
        layer.fill_rect(rect, Rgba::rgb(150, 52, 60));
        let eye_x = if self.body.flip { rect.x + 1 } else { rect.right() - 3 };
        layer.fill_rect(Rect::new(eye_x, rect.y + 3, 2, 2), Rgba::rgb(250, 236, 120));
    }

    fn rect(&self) -> Rect {
        self.body.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::{Sinks, flat_floor};

    /// Run updates until the player touches the floor
    fn settle(player: &mut Player, map: &dyn Terrain, sinks: &mut Sinks) {
        for _ in 0..2 * FALL_DEATH_TICKS {
            let target = player.target();
            player.update(map, 0.0, &mut sinks.ctx(target));
            if player.body.contacts.down {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn test_player_lands_on_floor() {
        let map = flat_floor();
        let mut sinks = Sinks::new(1);
        let mut player = Player::new(Vec2::new(40.0, 100.0));
        settle(&mut player, &map, &mut sinks);
        // Floor row is at y = 160; resting bodies re-touch it every few ticks
        assert_eq!(player.body.rect().bottom(), 160);
        assert!(player.air_time <= WALL_SLIDE_DELAY + 1);
        assert!(player.body.velocity.y < 1.0);
    }

    #[test]
    fn test_single_jump_until_landing() {
        let map = flat_floor();
        let mut sinks = Sinks::new(1);
        let mut player = Player::new(Vec2::new(40.0, 100.0));
        settle(&mut player, &map, &mut sinks);

        assert!(player.jump());
        assert_eq!(player.body.velocity.y, JUMP_VELOCITY);
        assert!(!player.jump());

        settle(&mut player, &map, &mut sinks);
        assert!(player.jump());
    }

    #[test]
    fn test_fall_reports_after_air_limit() {
        let map = super::super::Tilemap::new(16);
        let mut sinks = Sinks::new(1);
        let mut player = Player::new(Vec2::ZERO);
        for tick in 1..=FALL_DEATH_TICKS {
            let target = player.target();
            assert!(!player.update(&map, 0.0, &mut sinks.ctx(target)), "tick {tick}");
        }
        let target = player.target();
        assert!(player.update(&map, 0.0, &mut sinks.ctx(target)));
        assert!(player.body.velocity.y <= MAX_FALL_SPEED);
    }

    #[test]
    fn test_dash_phases() {
        let map = flat_floor();
        let mut sinks = Sinks::new(2);
        let mut player = Player::new(Vec2::new(40.0, 100.0));
        settle(&mut player, &map, &mut sinks);
        sinks.particles.clear();

        assert!(player.dash());
        assert!(!player.dash());
        assert_eq!(player.dash_magnitude(), DASH_TICKS);

        let target = player.target();
        player.update(&map, 0.0, &mut sinks.ctx(target));
        // Ring on the first tick plus a trail puff
        assert_eq!(sinks.particles.len(), 20 + 1);
        assert_eq!(player.dashing(), DASH_TICKS - 1);
        assert!(player.body.velocity.x > 7.0);

        let mut layer = Layer::new(320, 240);
        player.render(&mut layer, IVec2::ZERO);
        assert_eq!(layer.count_opaque(0), 0, "hidden while dashing fast");

        for _ in 0..DASH_TICKS {
            let target = player.target();
            player.update(&map, 0.0, &mut sinks.ctx(target));
        }
        assert_eq!(player.dashing(), 0);
        assert_eq!(player.body.velocity.x, 0.0);
        assert!(player.dash());
    }

    #[test]
    fn test_dash_left_when_facing_left() {
        let map = flat_floor();
        let mut sinks = Sinks::new(2);
        let mut player = Player::new(Vec2::new(80.0, 100.0));
        let target = player.target();
        player.update(&map, -1.0, &mut sinks.ctx(target));
        assert!(player.body.flip);
        assert!(player.dash());
        assert_eq!(player.dashing(), -DASH_TICKS);
    }

    #[test]
    fn test_reset_motion_cancels_dash() {
        let mut player = Player::new(Vec2::ZERO);
        player.body.velocity = Vec2::new(3.0, -2.0);
        player.dash();
        player.reset_motion();
        assert_eq!(player.dash_magnitude(), 0);
        assert_eq!(player.body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_wall_slide_and_wall_jump() {
        let mut map = flat_floor();
        // Wall column at tile x = 6 (pixels 96..112)
        for y in 0..10 {
            map.insert(super::super::Tile::new(
                super::super::TileKind::Stone,
                0,
                Vec2::new(6.0, y as f32),
            ));
        }
        let mut sinks = Sinks::new(3);
        let mut player = Player::new(Vec2::new(86.0, 20.0));
        for _ in 0..10 {
            let target = player.target();
            player.update(&map, 1.0, &mut sinks.ctx(target));
        }
        assert!(player.body.contacts.right);
        assert!(player.is_wall_sliding());
        assert!(player.body.velocity.y <= WALL_SLIDE_SPEED);

        assert!(player.jump());
        assert_eq!(player.body.velocity, Vec2::new(-3.5, -2.5));
    }

    #[test]
    fn test_enemy_shoots_player_in_front() {
        let map = flat_floor();
        let mut sinks = Sinks::new(4);
        let mut enemy = Enemy::new(Vec2::new(40.0, 145.0));
        enemy.walking = 1;
        let target = Player::new(Vec2::new(100.0, 145.0)).target();
        let defeated = enemy.update(&map, 0.0, &mut sinks.ctx(target));

        assert!(!defeated);
        assert_eq!(sinks.projectiles.len(), 1);
        let shot = &sinks.projectiles[0];
        assert_eq!(shot.direction, 1.0);
        assert_eq!(shot.age, 0);
        assert_eq!(sinks.sparks.len(), 4);
        assert_eq!(sinks.events, vec![GameEvent::Shoot]);
    }

    #[test]
    fn test_enemy_holds_fire_behind_or_out_of_sight() {
        let map = flat_floor();
        let mut sinks = Sinks::new(4);
        for target_pos in [Vec2::new(0.0, 145.0), Vec2::new(100.0, 100.0)] {
            let mut enemy = Enemy::new(Vec2::new(40.0, 145.0));
            enemy.walking = 1;
            let target = Player::new(target_pos).target();
            enemy.update(&map, 0.0, &mut sinks.ctx(target));
        }
        assert!(sinks.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_turns_at_ledge() {
        let mut map = super::super::Tilemap::new(16);
        for x in 0..3 {
            map.insert(super::super::Tile::new(
                super::super::TileKind::Grass,
                0,
                Vec2::new(x as f32, 10.0),
            ));
        }
        let mut sinks = Sinks::new(5);
        // Standing near the right edge of a three-tile platform
        let mut enemy = Enemy::new(Vec2::new(38.0, 145.0));
        enemy.walking = 50;
        let target = Player::new(Vec2::new(-500.0, 0.0)).target();
        enemy.update(&map, 0.0, &mut sinks.ctx(target));
        assert!(enemy.body.flip);
    }

    #[test]
    fn test_enemy_defeated_by_dashing_player() {
        let map = flat_floor();
        let mut sinks = Sinks::new(6);
        let mut enemy = Enemy::new(Vec2::new(40.0, 145.0));
        let mut player = Player::new(Vec2::new(42.0, 145.0));

        let target = player.target();
        assert!(!enemy.update(&map, 0.0, &mut sinks.ctx(target)));

        player.dash();
        let target = player.target();
        assert!(enemy.update(&map, 0.0, &mut sinks.ctx(target)));
        assert_eq!(sinks.sparks.len(), 32);
        assert_eq!(sinks.particles.len(), 30);
        assert_eq!(sinks.events, vec![GameEvent::Hit]);
    }
}
