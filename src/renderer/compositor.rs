//! Frame compositor
//!
//! Two working layers per frame:
//! - `gameplay`: alpha-aware, cleared every tick; terrain, actors, effects
//! - `backdrop`: opaque presentation layer; background, clouds, then the
//!   gameplay layer (with its outline) on top
//!
//! `present` snapshots the backdrop into a [`Frame`] along with the text
//! overlay and the screenshake offset. The window presenter only ever sees
//! frames.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::layer::{Layer, Rgba};
use super::shapes::vertical_gradient;
use crate::consts::*;

/// Directions the silhouette is stamped to build the outline
pub const OUTLINE_OFFSETS: [IVec2; 4] = [
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
];

/// Text sizes used by the menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Large,
    Medium,
    Small,
}

impl TextSize {
    /// Font size in display pixels
    pub fn px(self) -> f32 {
        match self {
            TextSize::Large => 32.0,
            TextSize::Medium => 20.0,
            TextSize::Small => 16.0,
        }
    }
}

/// Which point of the text box `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

/// A line of text laid out in display coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub pos: Vec2,
    pub anchor: Anchor,
    pub size: TextSize,
    pub color: Rgba,
}

impl TextItem {
    pub fn new(text: impl Into<String>, pos: Vec2, anchor: Anchor, size: TextSize, color: Rgba) -> Self {
        Self {
            text: text.into(),
            pos,
            anchor,
            size,
            color,
        }
    }
}

/// A finished frame ready for the window
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: Layer,
    pub texts: Vec<TextItem>,
    /// Screenshake jitter in display pixels
    pub offset: Vec2,
}

/// Iris radius for a transition counter value
#[inline]
pub fn wipe_radius(transition: i32) -> i32 {
    (TRANSITION_TICKS - transition.abs()).max(0) * WIPE_RADIUS_STEP
}

/// Random jitter, each axis uniform in `[-intensity/2, intensity/2)`
pub fn shake_offset<R: Rng>(intensity: u32, rng: &mut R) -> Vec2 {
    let s = intensity as f32;
    Vec2::new(
        rng.random::<f32>() * s - s / 2.0,
        rng.random::<f32>() * s - s / 2.0,
    )
}

/// Owns the per-frame layers
pub struct Compositor {
    pub gameplay: Layer,
    pub backdrop: Layer,
    background: Layer,
    overlay: Vec<TextItem>,
    frame: Frame,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        let mut background = Layer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT);
        vertical_gradient(
            &mut background,
            Rgba::rgb(93, 152, 196),
            Rgba::rgb(196, 222, 228),
        );
        Self {
            gameplay: Layer::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            backdrop: background.clone(),
            frame: Frame {
                image: Layer::filled(DISPLAY_WIDTH, DISPLAY_HEIGHT, Rgba::BLACK),
                texts: Vec::new(),
                offset: Vec2::ZERO,
            },
            background,
            overlay: Vec::new(),
        }
    }

    /// Clear the gameplay layer and repaint the background
    pub fn begin_gameplay(&mut self) {
        self.gameplay.clear_transparent();
        self.backdrop.copy_from(&self.background);
        self.overlay.clear();
    }

    /// Repaint the background for a menu screen
    pub fn begin_menu(&mut self) {
        self.backdrop.copy_from(&self.background);
        self.overlay.clear();
    }

    /// Queue a line of text for this frame
    pub fn text(&mut self, item: TextItem) {
        self.overlay.push(item);
    }

    /// Stamp the gameplay silhouette onto the backdrop at the four unit offsets
    pub fn outline(&mut self) {
        let mask = self
            .gameplay
            .silhouette(SILHOUETTE_ALPHA_THRESHOLD, Rgba(SILHOUETTE_SHADE));
        for offset in OUTLINE_OFFSETS {
            self.backdrop.blit(&mask, offset);
        }
    }

    /// Apply the transition iris to the gameplay layer (no-op at 0)
    pub fn iris(&mut self, transition: i32) {
        if transition == 0 {
            return;
        }
        let center = IVec2::new(DISPLAY_WIDTH as i32 / 2, DISPLAY_HEIGHT as i32 / 2);
        self.gameplay.iris(center, wipe_radius(transition));
    }

    /// Draw the gameplay layer over the backdrop
    pub fn flatten(&mut self) {
        self.backdrop.blit(&self.gameplay, IVec2::ZERO);
    }

    /// Publish the backdrop as the current frame
    pub fn present(&mut self, offset: Vec2) {
        self.frame.image.copy_from(&self.backdrop);
        self.frame.texts = std::mem::take(&mut self.overlay);
        self.frame.offset = offset;
    }

    /// Most recently presented frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_wipe_radius_bounds() {
        assert_eq!(wipe_radius(0), 240);
        assert_eq!(wipe_radius(-30), 0);
        assert_eq!(wipe_radius(30), 0);
        assert_eq!(wipe_radius(15), 120);
        for t in -30..=30 {
            assert!(wipe_radius(t) >= 0);
        }
    }

    #[test]
    fn test_shake_offset_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            let o = shake_offset(16, &mut rng);
            assert!((-8.0..8.0).contains(&o.x));
            assert!((-8.0..8.0).contains(&o.y));
        }
        assert_eq!(shake_offset(0, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn test_outline_surrounds_shape() {
        let mut comp = Compositor::new();
        comp.begin_gameplay();
        comp.gameplay.set_pixel(100, 100, Rgba::WHITE);

        comp.outline();

        for offset in OUTLINE_OFFSETS {
            let p = IVec2::new(100, 100) + offset;
            assert_ne!(
                comp.backdrop.pixel(p.x, p.y),
                comp.background.pixel(p.x, p.y),
                "no shade at {p:?}"
            );
        }
        // Diagonals untouched
        assert_eq!(comp.backdrop.pixel(101, 101), comp.background.pixel(101, 101));
    }

    #[test]
    fn test_flatten_puts_gameplay_on_top() {
        let mut comp = Compositor::new();
        comp.begin_gameplay();
        comp.gameplay.set_pixel(10, 10, Rgba::rgb(1, 2, 3));
        comp.outline();
        comp.flatten();
        assert_eq!(comp.backdrop.pixel(10, 10), Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn test_iris_closed_hides_gameplay() {
        let mut comp = Compositor::new();
        comp.begin_gameplay();
        comp.gameplay.set_pixel(160, 120, Rgba::WHITE);
        comp.iris(30);
        comp.flatten();
        assert_eq!(comp.backdrop.pixel(160, 120), Rgba::BLACK);
        assert_eq!(comp.backdrop.pixel(0, 0), Rgba::BLACK);
    }

    #[test]
    fn test_present_takes_overlay() {
        let mut comp = Compositor::new();
        comp.begin_menu();
        comp.text(TextItem::new("hi", Vec2::ZERO, Anchor::TopLeft, TextSize::Small, Rgba::WHITE));
        comp.present(Vec2::new(1.0, -1.0));
        assert_eq!(comp.frame().texts.len(), 1);
        assert_eq!(comp.frame().offset, Vec2::new(1.0, -1.0));

        comp.begin_menu();
        comp.present(Vec2::ZERO);
        assert!(comp.frame().texts.is_empty());
    }
}
