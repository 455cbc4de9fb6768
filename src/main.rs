//! Ninja Game entry point
//!
//! Opens the window, loads levels and progress, and runs the fixed-rate
//! loop: poll keys, tick, play feedback sounds, present the frame.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use macroquad::prelude::*;

use ninja_game::audio::AudioManager;
use ninja_game::consts::*;
use ninja_game::persistence::ProgressStore;
use ninja_game::platform::{FrameClock, KeyboardInput};
use ninja_game::renderer::{Anchor, Frame, Rgba, TextItem};
use ninja_game::sim::{Control, Game, tick};
use ninja_game::world::LevelLibrary;
use ninja_game::Settings;

fn window_conf() -> Conf {
    Conf {
        window_title: "Ninja Game".to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

/// Uploads the software frame and draws it scaled to the window
struct Presenter {
    texture: Texture2D,
    scale: f32,
}

impl Presenter {
    fn new() -> Self {
        let blank = vec![0u8; DISPLAY_WIDTH * DISPLAY_HEIGHT * 4];
        let texture = Texture2D::from_rgba8(DISPLAY_WIDTH as u16, DISPLAY_HEIGHT as u16, &blank);
        texture.set_filter(FilterMode::Nearest);
        Self {
            texture,
            scale: WINDOW_WIDTH as f32 / DISPLAY_WIDTH as f32,
        }
    }

    fn draw(&self, frame: &Frame) {
        clear_background(BLACK);

        self.texture.update_from_bytes(
            frame.image.width as u32,
            frame.image.height as u32,
            frame.image.as_bytes(),
        );
        draw_texture_ex(
            &self.texture,
            frame.offset.x * self.scale,
            frame.offset.y * self.scale,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(
                    frame.image.width as f32 * self.scale,
                    frame.image.height as f32 * self.scale,
                )),
                ..Default::default()
            },
        );

        for item in &frame.texts {
            self.draw_text_item(item);
        }
    }

    fn draw_text_item(&self, item: &TextItem) {
        let font_size = (item.size.px() * self.scale) as u16;
        let dims = measure_text(&item.text, None, font_size, 1.0);
        let x = item.pos.x * self.scale;
        let y = item.pos.y * self.scale;
        // draw_text places the baseline at y
        let (x, y) = match item.anchor {
            Anchor::TopLeft => (x, y + dims.offset_y),
            Anchor::Center => (x - dims.width / 2.0, y - dims.height / 2.0 + dims.offset_y),
        };
        draw_text(&item.text, x, y, font_size as f32, to_color(item.color));
    }
}

fn to_color(c: Rgba) -> Color {
    let [r, g, b, a] = c.0;
    Color::from_rgba(r, g, b, a)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

async fn run() -> Result<()> {
    let settings = Settings::load();

    let levels = LevelLibrary::load_dir(&settings.maps_dir)
        .with_context(|| format!("loading levels from {}", settings.maps_dir.display()))?;
    let progress = ProgressStore::new(settings.save_path.clone());
    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::info!(
        "Starting with seed {}, {} levels, progress at {}",
        seed,
        levels.count(),
        settings.save_path.display()
    );

    let audio = AudioManager::load(&settings).await;
    let mut game = Game::new(levels, progress, settings, seed);

    let mut keyboard = KeyboardInput::new();
    let presenter = Presenter::new();
    let mut clock = FrameClock::default();

    audio.start_loops();

    loop {
        let input = keyboard.poll();
        let control = tick(&mut game, &input).context("running game tick")?;
        for event in game.drain_events() {
            audio.handle(event);
        }
        if control == Control::Quit {
            break;
        }

        presenter.draw(game.frame());
        clock.wait();
        next_frame().await;
    }

    log::info!("Goodbye");
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
