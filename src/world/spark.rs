//! Sparks: short bright streaks that slow to a stop

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{IVec2, Vec2};

use crate::angle_to_vec;
use crate::renderer::shapes::fill_convex_polygon;
use crate::renderer::{Layer, Rgba};

/// Speed lost per tick
const SPARK_DRAG: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }

    /// Returns true once the spark has stopped
    pub fn update(&mut self) -> bool {
        self.pos += angle_to_vec(self.angle) * self.speed;
        self.speed = (self.speed - SPARK_DRAG).max(0.0);
        self.speed <= 0.0
    }

    /// Diamond stretched along the direction of travel
    pub fn render(&self, layer: &mut Layer, offset: IVec2) {
        let at = self.pos - offset.as_vec2();
        let points = [
            at + angle_to_vec(self.angle) * self.speed * 3.0,
            at + angle_to_vec(self.angle + FRAC_PI_2) * self.speed * 0.5,
            at + angle_to_vec(self.angle + PI) * self.speed * 3.0,
            at + angle_to_vec(self.angle - FRAC_PI_2) * self.speed * 0.5,
        ];
        fill_convex_polygon(layer, &points, Rgba::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spark_slows_and_finishes() {
        let mut spark = Spark::new(Vec2::ZERO, 0.0, 0.35);
        assert!(!spark.update());
        assert!(!spark.update());
        assert!(!spark.update());
        assert!(spark.update());
        assert_eq!(spark.speed, 0.0);
        assert!(spark.pos.x > 0.5);
        assert!(spark.pos.y.abs() < 1e-5);
    }

    #[test]
    fn test_render_stretches_along_angle() {
        let mut layer = Layer::new(40, 40);
        Spark::new(Vec2::new(20.0, 20.0), 0.0, 3.0).render(&mut layer, IVec2::ZERO);
        assert_eq!(layer.pixel(24, 20), Rgba::WHITE);
        assert_eq!(layer.pixel(20, 25), Rgba::TRANSPARENT);
    }
}
