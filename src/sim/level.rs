//! Level lifecycle
//!
//! Loading a level replaces the whole [`Stage`]. Nothing from the previous
//! level survives except the player entity, which is moved and stopped.

use glam::Vec2;

use super::state::{Game, GameEvent, Movement, Stage};
use super::Rect;
use crate::error::GameResult;
use crate::persistence::LevelIndex;
use crate::world::{Enemy, TileKind};

/// Canopy area of a tree marker, relative to the marker position
const CANOPY_OFFSET: Vec2 = Vec2::new(4.0, 4.0);
const CANOPY_SIZE: (i32, i32) = (23, 13);
/// Tree variant that sheds leaves
const LEAF_TREE_VARIANT: u32 = 2;
/// Spawner variant marking the player start
const PLAYER_SPAWN_VARIANT: u32 = 0;

/// Load level `index` and reset every per-level value.
///
/// Fails only if the level is not in the library; on failure the game is
/// left untouched.
pub fn load_level(game: &mut Game, index: LevelIndex) -> GameResult<()> {
    let tilemap = game.levels.geometry(index)?;
    let mut stage = Stage::new(index, tilemap);

    stage.leaf_spawners = stage
        .tilemap
        .extract(
            |t| t.kind == TileKind::LargeDecor && t.variant == LEAF_TREE_VARIANT,
            true,
        )
        .into_iter()
        .map(|tree| {
            let corner = tree.position() + CANOPY_OFFSET;
            Rect::new(corner.x as i32, corner.y as i32, CANOPY_SIZE.0, CANOPY_SIZE.1)
        })
        .collect();

    for spawner in stage.tilemap.extract(|t| t.kind == TileKind::Spawners, false) {
        if spawner.variant == PLAYER_SPAWN_VARIANT {
            game.player.respawn(spawner.position());
        } else {
            stage.enemies.push(Enemy::new(spawner.position()));
        }
    }

    game.movement = Movement::default();
    game.player.reset_motion();

    log::info!(
        "Loaded level {} ({} enemies, {} leaf spawners)",
        index,
        stage.enemies.len(),
        stage.leaf_spawners.len()
    );
    game.stage = Some(stage);
    game.emit(GameEvent::LevelStarted(index));
    Ok(())
}
