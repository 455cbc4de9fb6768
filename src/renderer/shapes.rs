//! Rasterized 2D primitives

use glam::{IVec2, Vec2};

use super::layer::{Layer, Rgba};

/// Blend a filled circle
pub fn fill_circle(layer: &mut Layer, center: Vec2, radius: f32, color: Rgba) {
    if radius <= 0.0 {
        return;
    }
    let r2 = radius * radius;
    let y0 = (center.y - radius).floor() as i32;
    let y1 = (center.y + radius).ceil() as i32;
    let x0 = (center.x - radius).floor() as i32;
    let x1 = (center.x + radius).ceil() as i32;
    for y in y0..=y1 {
        let dy = y as f32 + 0.5 - center.y;
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            if dx * dx + dy * dy <= r2 {
                layer.blend_pixel(x, y, color);
            }
        }
    }
}

/// Blend a filled convex polygon (scanline, pixel centers)
pub fn fill_convex_polygon(layer: &mut Layer, points: &[Vec2], color: Rgba) {
    if points.len() < 3 {
        return;
    }
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    let y0 = (min_y.floor() as i32).max(0);
    let y1 = (max_y.ceil() as i32).min(layer.height as i32 - 1);

    for y in y0..=y1 {
        let sy = y as f32 + 0.5;
        let mut left = f32::INFINITY;
        let mut right = f32::NEG_INFINITY;

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                let t = (sy - a.y) / (b.y - a.y);
                let x = a.x + (b.x - a.x) * t;
                left = left.min(x);
                right = right.max(x);
            }
        }

        if left > right {
            continue;
        }
        let x0 = (left - 0.5).ceil() as i32;
        let x1 = (right - 0.5).floor() as i32;
        for x in x0..=x1 {
            layer.blend_pixel(x, y, color);
        }
    }
}

/// Overwrite the layer with a top-to-bottom gradient
pub fn vertical_gradient(layer: &mut Layer, top: Rgba, bottom: Rgba) {
    let h = layer.height.max(2) - 1;
    for y in 0..layer.height {
        let t = y as f32 / h as f32;
        let mut c = [0u8; 4];
        for (i, ch) in c.iter_mut().enumerate() {
            *ch = (top.0[i] as f32 + (bottom.0[i] as f32 - top.0[i] as f32) * t).round() as u8;
        }
        for x in 0..layer.width {
            layer.set_pixel(x as i32, y as i32, Rgba(c));
        }
    }
}

/// Convert a world position to layer coordinates for a camera offset
#[inline]
pub fn to_screen(pos: Vec2, offset: IVec2) -> Vec2 {
    pos - offset.as_vec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_coverage() {
        let mut layer = Layer::new(20, 20);
        fill_circle(&mut layer, Vec2::new(10.0, 10.0), 4.0, Rgba::WHITE);
        let covered = layer.count_opaque(0) as f32;
        let expected = std::f32::consts::PI * 16.0;
        assert!((covered - expected).abs() < 8.0, "covered {covered}");
        assert_eq!(layer.pixel(10, 10), Rgba::WHITE);
        assert_eq!(layer.pixel(0, 0), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_polygon_square() {
        let mut layer = Layer::new(10, 10);
        let square = [
            Vec2::new(2.0, 2.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(2.0, 6.0),
        ];
        fill_convex_polygon(&mut layer, &square, Rgba::WHITE);
        assert_eq!(layer.count_opaque(0), 16);
        assert_eq!(layer.pixel(2, 2), Rgba::WHITE);
        assert_eq!(layer.pixel(6, 6), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_degenerate_polygon_draws_nothing() {
        let mut layer = Layer::new(4, 4);
        fill_convex_polygon(&mut layer, &[Vec2::ZERO, Vec2::ONE], Rgba::WHITE);
        assert_eq!(layer.count_opaque(0), 0);
    }

    #[test]
    fn test_gradient_endpoints() {
        let mut layer = Layer::new(2, 5);
        vertical_gradient(&mut layer, Rgba::BLACK, Rgba::WHITE);
        assert_eq!(layer.pixel(0, 0), Rgba::BLACK);
        assert_eq!(layer.pixel(1, 4), Rgba::WHITE);
    }
}
