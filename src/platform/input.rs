//! Keyboard input

use std::collections::HashSet;

use macroquad::input::{
    KeyCode, get_keys_down, get_keys_pressed, get_keys_released, is_quit_requested, prevent_quit,
};

use crate::sim::{InputEvent, Key};

/// Physical key to game key. Unmapped keys are ignored.
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::X => Some(Key::Dash),
        KeyCode::Enter | KeyCode::KpEnter => Some(Key::Confirm),
        KeyCode::Escape => Some(Key::Back),
        _ => None,
    }
}

/// Mapped, ordered and deduplicated game keys
fn keys(codes: impl IntoIterator<Item = KeyCode>) -> Vec<Key> {
    let mut keys: Vec<Key> = codes.into_iter().filter_map(map_key).collect();
    keys.sort();
    keys.dedup();
    keys
}

/// Build one tick's events from this frame's key edges.
///
/// Quit goes first, then releases, then presses. A key pressed and released
/// within the frame that is no longer down gets a trailing release, so the
/// press still registers and held flags end up matching `down`. Each group is
/// in key order, independent of hash set iteration.
pub fn collect_events(
    pressed: impl IntoIterator<Item = KeyCode>,
    released: impl IntoIterator<Item = KeyCode>,
    down: &HashSet<KeyCode>,
    quit: bool,
) -> Vec<InputEvent> {
    let pressed: Vec<KeyCode> = pressed.into_iter().collect();
    let released: Vec<KeyCode> = released.into_iter().collect();
    let taps: Vec<KeyCode> = pressed
        .iter()
        .filter(|code| released.contains(code) && !down.contains(code))
        .copied()
        .collect();

    let mut events = Vec::new();
    if quit {
        events.push(InputEvent::Quit);
    }
    events.extend(keys(released).into_iter().map(InputEvent::Release));
    events.extend(keys(pressed).into_iter().map(InputEvent::Press));
    events.extend(keys(taps).into_iter().map(InputEvent::Release));
    events
}

/// Polls macroquad once per frame
pub struct KeyboardInput {
    _private: (),
}

impl KeyboardInput {
    /// Takes over the window close button so it arrives as [`InputEvent::Quit`]
    pub fn new() -> Self {
        prevent_quit();
        Self { _private: () }
    }

    pub fn poll(&mut self) -> Vec<InputEvent> {
        collect_events(
            get_keys_pressed(),
            get_keys_released(),
            &get_keys_down(),
            is_quit_requested(),
        )
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}
