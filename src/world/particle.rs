//! Animated particles (falling leaves, dust)

use glam::{IVec2, Vec2};

use crate::renderer::shapes::fill_circle;
use crate::renderer::{Layer, Rgba};
use crate::sim::Rect;

/// Non-looping frame counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    /// Ticks since start
    pub frame: u32,
    pub ticks_per_image: u32,
    pub images: u32,
    pub done: bool,
}

impl Animation {
    pub fn new(ticks_per_image: u32, images: u32, frame: u32) -> Self {
        Self {
            frame,
            ticks_per_image,
            images,
            done: false,
        }
    }

    fn last_frame(&self) -> u32 {
        (self.ticks_per_image * self.images).saturating_sub(1)
    }

    pub fn update(&mut self) {
        self.frame = (self.frame + 1).min(self.last_frame());
        if self.frame >= self.last_frame() {
            self.done = true;
        }
    }

    /// Index of the image currently shown
    pub fn image(&self) -> u32 {
        self.frame / self.ticks_per_image.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Decorative leaf drifting from a tree
    Leaf,
    /// Dust puff from dashes and hits
    Dust,
}

impl ParticleKind {
    fn animation(self, frame: u32) -> Animation {
        match self {
            ParticleKind::Leaf => Animation::new(20, 18, frame),
            ParticleKind::Dust => Animation::new(6, 4, frame),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub animation: Animation,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, velocity: Vec2, frame: u32) -> Self {
        Self {
            kind,
            pos,
            velocity,
            animation: kind.animation(frame),
        }
    }

    /// Move and animate. Returns true if the animation had already finished
    /// before this update.
    pub fn update(&mut self) -> bool {
        let finished = self.animation.done;
        self.pos += self.velocity;
        self.animation.update();
        finished
    }

    pub fn render(&self, layer: &mut Layer, offset: IVec2) {
        let at = self.pos - offset.as_vec2();
        let image = self.animation.image();
        match self.kind {
            ParticleKind::Leaf => {
                // Leaf flutters between wide and narrow
                let (w, h) = if image % 2 == 0 { (3, 2) } else { (2, 3) };
                let rect = Rect::new(at.x as i32 - w / 2, at.y as i32 - h / 2, w, h);
                layer.fill_rect(rect, Rgba::rgb(104, 170, 70));
            }
            ParticleKind::Dust => {
                let radius = 2.5 - image as f32 * 0.5;
                fill_circle(layer, at, radius, Rgba::WHITE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dust_lifetime() {
        let mut p = Particle::new(ParticleKind::Dust, Vec2::ZERO, Vec2::new(1.0, 0.0), 0);
        // 24 animation ticks; the last frame is reached on update 23 and
        // reported on the following one
        let mut updates = 0;
        while !p.update() {
            updates += 1;
            assert!(updates < 100);
        }
        assert_eq!(updates, 23);
        assert_eq!(p.pos.x, 24.0);
    }

    #[test]
    fn test_start_frame_shortens_life() {
        let mut p = Particle::new(ParticleKind::Leaf, Vec2::ZERO, Vec2::ZERO, 20);
        let mut updates = 0;
        while !p.update() {
            updates += 1;
        }
        assert_eq!(updates, 20 * 18 - 1 - 20);
    }

    #[test]
    fn test_animation_clamps() {
        let mut anim = Animation::new(2, 2, 10);
        anim.update();
        assert_eq!(anim.frame, 3);
        assert!(anim.done);
        assert_eq!(anim.image(), 1);
    }

    #[test]
    fn test_render_draws_near_position() {
        let mut layer = Layer::new(40, 40);
        let p = Particle::new(ParticleKind::Dust, Vec2::new(30.0, 30.0), Vec2::ZERO, 0);
        p.render(&mut layer, IVec2::new(10, 10));
        assert_ne!(layer.pixel(20, 20), Rgba::TRANSPARENT);
        assert_eq!(layer.pixel(30, 30), Rgba::TRANSPARENT);
    }
}
