use super::Vec2;

pub const PIXELS_PER_WORLD: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn half_extent_px(self) -> (f32, f32) {
        (self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

/// World ↔ render space transform.
///
/// World space has its origin at the surface center with +y up; render space
/// has its origin at the surface top-left with +y down, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xfm {
    pixels_per_world: f32,
}

impl Default for Xfm {
    fn default() -> Self {
        Self::new(PIXELS_PER_WORLD)
    }
}

impl Xfm {
    pub fn new(pixels_per_world: f32) -> Self {
        debug_assert!(pixels_per_world > 0.0, "scale must be positive");
        Self { pixels_per_world }
    }

    pub fn pixels_per_world(&self) -> f32 {
        self.pixels_per_world
    }

    pub fn world_to_render(&self, world: Vec2, viewport: Viewport) -> (i32, i32) {
        let k = self.pixels_per_world;
        let (e, f) = viewport.half_extent_px();
        let x = k * world.x + e;
        let y = -k * world.y + f;
        (x.round() as i32, y.round() as i32)
    }

    pub fn render_to_world(&self, render_px: Vec2, viewport: Viewport) -> Vec2 {
        let k_inv = self.pixels_per_world.recip();
        let (e, f) = viewport.half_extent_px();
        Vec2 {
            x: k_inv * (render_px.x - e),
            y: -k_inv * (render_px.y - f),
        }
    }

    /// Lengths scale without the translation.
    pub fn world_len_to_px(&self, len: f32) -> f32 {
        len * self.pixels_per_world
    }
}
