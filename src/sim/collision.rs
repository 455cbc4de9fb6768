//! Axis-aligned rectangles
//!
//! Integer pixel rectangles, matching how the game positions and tests
//! everything on the pixel grid.

use glam::{IVec2, Vec2};

/// Integer rectangle; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Center, rounded down
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    #[inline]
    pub fn area(&self) -> i32 {
        self.w * self.h
    }

    /// Overlap test (touching edges do not overlap)
    pub fn collides(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if the pixel containing `point` lies inside
    pub fn contains_point(&self, point: Vec2) -> bool {
        let px = point.x.floor() as i32;
        let py = point.y.floor() as i32;
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn offset(&self, by: IVec2) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collides_excludes_touching() {
        let a = Rect::new(0, 0, 16, 16);
        assert!(a.collides(&Rect::new(15, 15, 4, 4)));
        assert!(!a.collides(&Rect::new(16, 0, 4, 4)));
        assert!(!a.collides(&Rect::new(0, 16, 4, 4)));
    }

    #[test]
    fn test_contains_point_half_open() {
        let r = Rect::new(10, 20, 8, 15);
        assert!(r.contains_point(Vec2::new(10.0, 20.0)));
        assert!(r.contains_point(Vec2::new(17.9, 34.9)));
        assert!(!r.contains_point(Vec2::new(18.0, 25.0)));
        assert!(!r.contains_point(Vec2::new(9.99, 25.0)));
    }

    #[test]
    fn test_center_rounds_down() {
        assert_eq!(Rect::new(10, 20, 8, 15).center(), IVec2::new(14, 27));
    }
}
