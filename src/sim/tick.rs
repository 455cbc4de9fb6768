//! Per-tick update
//!
//! `tick` runs exactly one state handler per call. The Playing handler is a
//! fixed sequence; later steps read what earlier ones wrote, so the order
//! below is part of the game's behaviour.

use glam::Vec2;

use super::effects::{burst, impact_sparks, leaf_from};
use super::level::load_level;
use super::menu::{level_select_tick, menu_tick};
use super::state::{Control, Game, GameEvent, GameState, Stage, Trigger};
use crate::consts::*;
use crate::display_center;
use crate::error::GameResult;
use crate::persistence::LevelIndex;
use crate::renderer::shake_offset;
use crate::world::{Actor, ActorContext, ParticleKind, Terrain};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Dash,
    Confirm,
    Back,
}

/// Input delivered to a single tick, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Key),
    Release(Key),
    /// Window close / process quit
    Quit,
}

/// How a Playing tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageOutcome {
    /// Ran to completion; a new frame was presented
    Continue,
    /// Fade-out finished with no enemies left
    Cleared,
    /// Death sequence finished; reload the same level
    Restart,
    /// Escape pressed
    Exit,
}

/// Advance the game by one tick
pub fn tick(game: &mut Game, input: &[InputEvent]) -> GameResult<Control> {
    if input.contains(&InputEvent::Quit) {
        log::info!("Quit requested");
        return Ok(Control::Quit);
    }

    match game.state {
        GameState::Menu => menu_tick(game, input),
        GameState::LevelSelect => level_select_tick(game, input)?,
        GameState::Playing => play_tick(game, input)?,
    }
    Ok(Control::Continue)
}

/// One tick of active gameplay
pub fn play_tick(game: &mut Game, input: &[InputEvent]) -> GameResult<()> {
    let Some(mut stage) = game.stage.take() else {
        log::warn!("Playing without a loaded level, back to level select");
        game.state = GameState::LevelSelect;
        return Ok(());
    };

    match advance_stage(game, &mut stage, input) {
        StageOutcome::Continue => game.stage = Some(stage),
        StageOutcome::Cleared => finish_level(game, stage.index),
        StageOutcome::Restart => {
            let index = stage.index;
            game.stage = Some(stage);
            load_level(game, index)?;
        }
        StageOutcome::Exit => {
            game.apply(Trigger::Back);
        }
    }
    Ok(())
}

/// Record a cleared level and route to the menu or level select.
///
/// A failed save is logged and play goes on; the in-memory set keeps the
/// level so the next successful save includes it.
fn finish_level(game: &mut Game, index: LevelIndex) {
    game.cleared.insert(index);
    if let Err(e) = game.progress.persist(&game.cleared) {
        log::error!("Could not save progress: {}", e);
    }

    let all_cleared = game.cleared.covers(game.num_levels());
    log::info!(
        "Level {} cleared ({}/{} levels)",
        index,
        game.cleared.len(),
        game.num_levels()
    );
    game.emit(GameEvent::LevelCleared(index));
    game.apply(Trigger::LevelCleared { all_cleared });
}

fn advance_stage(game: &mut Game, stage: &mut Stage, input: &[InputEvent]) -> StageOutcome {
    game.compositor.begin_gameplay();
    game.screenshake = game.screenshake.saturating_sub(1);

    // Level clear: fade out, then route
    if stage.enemies.is_empty() {
        if stage.transition >= TRANSITION_TICKS {
            return StageOutcome::Cleared;
        }
        stage.transition += 1;
    }
    if stage.transition < 0 {
        stage.transition += 1;
    }

    // Death sequence: close the iris, then reload
    if stage.dead > 0 {
        stage.dead += 1;
        if stage.dead >= DEATH_FADE_TICKS {
            stage.transition = (stage.transition + 1).min(TRANSITION_TICKS);
        }
        if stage.dead > DEATH_RELOAD_TICKS {
            return StageOutcome::Restart;
        }
    }

    let target = game.player.rect().center().as_vec2() - display_center();
    stage.scroll += (target - stage.scroll) / CAMERA_SMOOTHING;
    let offset = stage.render_scroll();

    for spawner in &stage.leaf_spawners {
        if let Some(leaf) = leaf_from(spawner, &mut game.rng) {
            stage.particles.push(leaf);
        }
    }

    game.clouds.update();
    game.clouds.render(&mut game.compositor.backdrop, offset);

    stage.tilemap.render(&mut game.compositor.gameplay, offset);

    // Enemies see the player as it was at the start of the tick
    let player_target = game.player.target();
    let mut defeated = 0;
    stage.enemies.retain_mut(|enemy| {
        let mut ctx = ActorContext {
            rng: &mut game.rng,
            target: player_target,
            projectiles: &mut stage.projectiles,
            particles: &mut stage.particles,
            sparks: &mut stage.sparks,
            events: &mut game.events,
        };
        let out = enemy.update(&stage.tilemap, 0.0, &mut ctx);
        enemy.render(&mut game.compositor.gameplay, offset);
        if out {
            defeated += 1;
        }
        !out
    });
    if defeated > 0 {
        game.shake();
    }

    if stage.dead == 0 {
        let mut ctx = ActorContext {
            rng: &mut game.rng,
            target: player_target,
            projectiles: &mut stage.projectiles,
            particles: &mut stage.particles,
            sparks: &mut stage.sparks,
            events: &mut game.events,
        };
        let fell = game.player.update(&stage.tilemap, game.movement.axis(), &mut ctx);
        game.player.render(&mut game.compositor.gameplay, offset);
        if fell {
            game.shake();
            stage.dead += 1;
            game.emit(GameEvent::PlayerDied);
        }
    }

    // Projectiles: terrain first, then age, then the player
    let player_rect = game.player.rect();
    let player_center = player_rect.center().as_vec2();
    let vulnerable = game.player.dash_magnitude() < DASH_INVULNERABILITY;
    let mut hits = 0;
    stage.projectiles.retain_mut(|projectile| {
        projectile.advance();
        projectile.render(&mut game.compositor.gameplay, offset);

        if stage.tilemap.solid_check(projectile.pos) {
            stage
                .sparks
                .extend(impact_sparks(projectile.pos, projectile.direction, &mut game.rng));
            return false;
        }
        if projectile.expired() {
            return false;
        }
        if vulnerable && player_rect.contains_point(projectile.pos) {
            hits += 1;
            burst(player_center, &mut game.rng).drain_into(&mut stage.sparks, &mut stage.particles);
            return false;
        }
        true
    });
    for _ in 0..hits {
        if stage.dead == 0 {
            game.emit(GameEvent::PlayerDied);
        }
        stage.dead += 1;
        game.emit(GameEvent::Hit);
        game.shake();
    }

    game.compositor.outline();

    stage.particles.retain_mut(|particle| {
        let finished = particle.update();
        particle.render(&mut game.compositor.gameplay, offset);
        if particle.kind == ParticleKind::Leaf {
            particle.pos.x += (particle.animation.frame as f32 * 0.035).sin() * 0.3;
        }
        !finished
    });

    stage.sparks.retain_mut(|spark| {
        let finished = spark.update();
        spark.render(&mut game.compositor.gameplay, offset);
        !finished
    });

    // A dead player keeps the held-key flags but takes no actions
    let alive = stage.dead == 0;
    for event in input {
        match *event {
            InputEvent::Press(Key::Left) => game.movement.left = true,
            InputEvent::Press(Key::Right) => game.movement.right = true,
            InputEvent::Press(Key::Up) if alive => {
                if game.player.jump() {
                    game.emit(GameEvent::Jump);
                }
            }
            InputEvent::Press(Key::Dash) if alive => {
                if game.player.dash() {
                    game.emit(GameEvent::Dash);
                }
            }
            InputEvent::Press(Key::Back) => return StageOutcome::Exit,
            InputEvent::Release(Key::Left) => game.movement.left = false,
            InputEvent::Release(Key::Right) => game.movement.right = false,
            _ => {}
        }
    }

    game.compositor.iris(stage.transition);
    game.compositor.flatten();

    // Always drawn so the RNG stream does not depend on settings
    let jitter = shake_offset(game.screenshake, &mut game.rng);
    let jitter = if game.settings.effective_screen_shake() {
        jitter
    } else {
        Vec2::ZERO
    };
    game.compositor.present(jitter);

    StageOutcome::Continue
}
