//! Parallax clouds behind the level

use glam::{IVec2, Vec2};
use rand::Rng;

use crate::renderer::shapes::fill_circle;
use crate::renderer::{Layer, Rgba};

/// Cloud sprite sizes
const CLOUD_SIZES: [IVec2; 2] = [IVec2::new(36, 16), IVec2::new(52, 22)];

const CLOUD_COLOR: Rgba = Rgba::rgba(255, 255, 255, 200);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: IVec2,
    pub speed: f32,
    /// Parallax factor; lower is further away
    pub depth: f32,
}

impl Cloud {
    pub fn update(&mut self) {
        self.pos.x += self.speed;
    }

    /// Top-left corner on a surface of `surface` size, wrapping around it
    pub fn screen_pos(&self, surface: IVec2, offset: IVec2) -> Vec2 {
        let render = self.pos - offset.as_vec2() * self.depth;
        let span = (surface + self.size).as_vec2();
        Vec2::new(
            render.x.rem_euclid(span.x) - self.size.x as f32,
            render.y.rem_euclid(span.y) - self.size.y as f32,
        )
    }

    pub fn render(&self, layer: &mut Layer, offset: IVec2) {
        let at = self.screen_pos(layer.size(), offset);
        let h = self.size.y as f32;
        let w = self.size.x as f32;
        // Three puffs across the sprite box
        fill_circle(layer, at + Vec2::new(w * 0.25, h * 0.6), h * 0.4, CLOUD_COLOR);
        fill_circle(layer, at + Vec2::new(w * 0.5, h * 0.45), h * 0.45, CLOUD_COLOR);
        fill_circle(layer, at + Vec2::new(w * 0.75, h * 0.6), h * 0.4, CLOUD_COLOR);
    }
}

/// Cloud field, drawn back to front
#[derive(Debug, Clone)]
pub struct Clouds {
    clouds: Vec<Cloud>,
}

impl Clouds {
    pub const COUNT: usize = 16;

    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_count(Self::COUNT, rng)
    }

    pub fn with_count<R: Rng>(count: usize, rng: &mut R) -> Self {
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                pos: Vec2::new(rng.random::<f32>() * 99999.0, rng.random::<f32>() * 99999.0),
                size: CLOUD_SIZES[rng.random_range(0..CLOUD_SIZES.len())],
                speed: rng.random::<f32>() * 0.05 + 0.05,
                depth: rng.random::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }

    pub fn render(&self, layer: &mut Layer, offset: IVec2) {
        for cloud in &self.clouds {
            cloud.render(layer, offset);
        }
    }
}
