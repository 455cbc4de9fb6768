//! RGBA software layer
//!
//! Every draw in the game lands in one of these. Layers are plain byte buffers
//! (4 bytes per pixel, row-major) so the presenter can upload them directly.

use glam::IVec2;

use crate::sim::Rect;

/// RGBA color, non-premultiplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba([r, g, b, a])
    }

    #[inline]
    pub fn alpha(self) -> u8 {
        self.0[3]
    }
}

/// A width x height RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub width: usize,
    pub height: usize,
    pixels: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// Layer filled with a single color
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let mut layer = Self::new(width, height);
        layer.fill(color);
        layer
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear_transparent(&mut self) {
        self.pixels.fill(0);
    }

    /// Overwrite every pixel (no blending)
    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color.0);
        }
    }

    /// Overwrite this layer with another of the same size
    pub fn copy_from(&mut self, other: &Layer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.pixels.copy_from_slice(&other.pixels);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((y as usize * self.width + x as usize) * 4)
    }

    /// Read a pixel (transparent when out of bounds)
    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        match self.index(x, y) {
            Some(i) => Rgba([
                self.pixels[i],
                self.pixels[i + 1],
                self.pixels[i + 2],
                self.pixels[i + 3],
            ]),
            None => Rgba::TRANSPARENT,
        }
    }

    /// Overwrite a pixel (no blending)
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.0);
        }
    }

    /// Source-over blend of `color` onto the pixel at (x, y)
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let Some(i) = self.index(x, y) else { return };
        let sa = color.alpha() as u32;
        if sa == 0 {
            return;
        }
        if sa == 255 {
            self.pixels[i..i + 4].copy_from_slice(&color.0);
            return;
        }

        let da = self.pixels[i + 3] as u32;
        // out_a = sa + da * (1 - sa), all in 0..=255 fixed point
        let out_a = sa * 255 + da * (255 - sa);
        if out_a == 0 {
            return;
        }
        for c in 0..3 {
            let s = color.0[c] as u32;
            let d = self.pixels[i + c] as u32;
            self.pixels[i + c] = ((s * sa * 255 + d * da * (255 - sa)) / out_a) as u8;
        }
        self.pixels[i + 3] = (out_a / 255) as u8;
    }

    /// Blend a filled rectangle
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width as i32);
        let y1 = rect.bottom().min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Blend `src` onto this layer with its top-left corner at `offset`
    pub fn blit(&mut self, src: &Layer, offset: IVec2) {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + src.width as i32).min(self.width as i32);
        let y1 = (offset.y + src.height as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                let color = src.pixel(x - offset.x, y - offset.y);
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Shape mask of this layer: pixels with alpha above `threshold` become
    /// `shade`, everything else transparent.
    pub fn silhouette(&self, threshold: u8, shade: Rgba) -> Layer {
        let mut mask = Layer::new(self.width, self.height);
        for (dst, src) in mask
            .pixels
            .chunks_exact_mut(4)
            .zip(self.pixels.chunks_exact(4))
        {
            if src[3] > threshold {
                dst.copy_from_slice(&shade.0);
            }
        }
        mask
    }

    /// Black out everything outside the circle at `center` with `radius`.
    /// A radius of zero or less blacks out the whole layer.
    pub fn iris(&mut self, center: IVec2, radius: i32) {
        if radius <= 0 {
            self.fill(Rgba::BLACK);
            return;
        }
        let r2 = radius as i64 * radius as i64;
        for y in 0..self.height as i32 {
            let dy = (y - center.y) as i64;
            for x in 0..self.width as i32 {
                let dx = (x - center.x) as i64;
                if dx * dx + dy * dy > r2 {
                    self.set_pixel(x, y, Rgba::BLACK);
                }
            }
        }
    }

    /// Number of pixels with alpha above `threshold`
    pub fn count_opaque(&self, threshold: u8) -> usize {
        self.pixels
            .chunks_exact(4)
            .filter(|px| px[3] > threshold)
            .count()
    }
}
