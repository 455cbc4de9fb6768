//! Title screen and level select

use glam::{IVec2, Vec2};

use super::level::load_level;
use super::state::{Game, Trigger};
use super::tick::{InputEvent, Key};
use super::Rect;
use crate::error::GameResult;
use crate::persistence::{ClearedSet, LevelIndex};
use crate::renderer::{Anchor, Rgba, TextItem, TextSize};

const TITLE: &str = "NINJA GAME";
const CALL_TO_ACTION: &str = "Press ENTER to Start";
const CONTROLS_HINT: &str = "Arrows: Move/Jump  X: Dash  ESC: Back";
const SELECT_HEADER: &str = "SELECT LEVEL";
const SELECT_HINT: &str = "UP/DOWN: Select  ENTER: Play  ESC: Back";
pub const CLEARED_MARKER: &str = "CLEARED";

const SHADOW: Rgba = Rgba::rgb(40, 40, 40);
const HINT: Rgba = Rgba::rgb(180, 180, 180);
const SELECTED: Rgba = Rgba::rgb(255, 255, 100);
const CLEARED: Rgba = Rgba::rgb(100, 255, 100);
const HIGHLIGHT: Rgba = Rgba::rgba(255, 255, 255, 40);

/// First row of the level list and the spacing between rows
const LIST_TOP: f32 = 90.0;
const ROW_HEIGHT: f32 = 35.0;

/// One row of the level select list
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEntry {
    pub index: LevelIndex,
    pub label: String,
    pub selected: bool,
    pub cleared: bool,
    /// Text baseline row in display pixels
    pub y: f32,
}

pub fn level_entries(num_levels: usize, cursor: LevelIndex, cleared: &ClearedSet) -> Vec<LevelEntry> {
    (0..num_levels)
        .map(|index| LevelEntry {
            index,
            label: format!("Map {}", index + 1),
            selected: index == cursor,
            cleared: cleared.contains(index),
            y: LIST_TOP + index as f32 * ROW_HEIGHT,
        })
        .collect()
}

/// Cursor one row up, wrapping to the bottom
pub fn cursor_up(cursor: LevelIndex, num_levels: usize) -> LevelIndex {
    if num_levels == 0 {
        return 0;
    }
    (cursor + num_levels - 1) % num_levels
}

/// Cursor one row down, wrapping to the top
pub fn cursor_down(cursor: LevelIndex, num_levels: usize) -> LevelIndex {
    if num_levels == 0 {
        return 0;
    }
    (cursor + 1) % num_levels
}

/// Pulsing alpha of the call to action
pub fn cta_alpha(menu_timer: u32) -> u8 {
    let alpha = 155.0 + 100.0 * (menu_timer as f32 * 0.05).sin();
    (alpha as i32).clamp(0, 255) as u8
}

fn shadowed(game: &mut Game, text: &str, center: Vec2) {
    game.compositor.text(TextItem::new(
        text,
        center + Vec2::splat(2.0),
        Anchor::Center,
        TextSize::Large,
        SHADOW,
    ));
    game.compositor
        .text(TextItem::new(text, center, Anchor::Center, TextSize::Large, Rgba::WHITE));
}

fn draw_backdrop(game: &mut Game) {
    game.compositor.begin_menu();
    game.clouds.update();
    game.clouds.render(&mut game.compositor.backdrop, IVec2::ZERO);
}

/// Title screen. Enter opens level select with the cursor on the first level.
pub fn menu_tick(game: &mut Game, input: &[InputEvent]) {
    game.menu_timer = game.menu_timer.wrapping_add(1);

    draw_backdrop(game);
    shadowed(game, TITLE, Vec2::new(160.0, 80.0));
    let alpha = cta_alpha(game.menu_timer);
    game.compositor.text(TextItem::new(
        CALL_TO_ACTION,
        Vec2::new(160.0, 150.0),
        Anchor::Center,
        TextSize::Medium,
        Rgba::rgba(255, 255, 255, alpha),
    ));
    game.compositor.text(TextItem::new(
        CONTROLS_HINT,
        Vec2::new(160.0, 210.0),
        Anchor::Center,
        TextSize::Small,
        HINT,
    ));
    game.compositor.present(Vec2::ZERO);

    for event in input {
        if let InputEvent::Press(Key::Confirm) = event {
            if game.apply(Trigger::Confirm) {
                game.selected_level = 0;
            }
            break;
        }
    }
}

/// Level list. Up/Down move the cursor, Enter plays, Escape goes back.
pub fn level_select_tick(game: &mut Game, input: &[InputEvent]) -> GameResult<()> {
    draw_backdrop(game);
    shadowed(game, SELECT_HEADER, Vec2::new(160.0, 40.0));

    for entry in level_entries(game.num_levels(), game.selected_level, &game.cleared) {
        let y = entry.y;
        if entry.selected {
            game.compositor
                .backdrop
                .fill_rect(Rect::new(60, y as i32 - 5, 200, 26), HIGHLIGHT);
            game.compositor.text(TextItem::new(
                ">",
                Vec2::new(65.0, y),
                Anchor::TopLeft,
                TextSize::Medium,
                SELECTED,
            ));
        }
        let color = if entry.selected { SELECTED } else { Rgba::WHITE };
        game.compositor.text(TextItem::new(
            entry.label,
            Vec2::new(80.0, y),
            Anchor::TopLeft,
            TextSize::Medium,
            color,
        ));
        if entry.cleared {
            game.compositor.text(TextItem::new(
                CLEARED_MARKER,
                Vec2::new(160.0, y + 2.0),
                Anchor::TopLeft,
                TextSize::Small,
                CLEARED,
            ));
        }
    }

    game.compositor.text(TextItem::new(
        SELECT_HINT,
        Vec2::new(160.0, 215.0),
        Anchor::Center,
        TextSize::Small,
        HINT,
    ));
    game.compositor.present(Vec2::ZERO);

    let num_levels = game.num_levels();
    for event in input {
        match event {
            InputEvent::Press(Key::Up) => {
                game.selected_level = cursor_up(game.selected_level, num_levels);
            }
            InputEvent::Press(Key::Down) => {
                game.selected_level = cursor_down(game.selected_level, num_levels);
            }
            InputEvent::Press(Key::Confirm) => {
                let index = game.selected_level;
                load_level(game, index)?;
                game.apply(Trigger::Confirm);
                break;
            }
            InputEvent::Press(Key::Back) => {
                game.apply(Trigger::Back);
                break;
            }
            _ => {}
        }
    }
    Ok(())
}
