use crate::geom::{FRect, Vec2};
use crate::grid::TILE_WIDTH;
use crate::physics::Mover;

pub const PLAYER_SPAWN: Vec2 = Vec2 { x: -1.0, y: 0.0 };
pub const PLAYER_SPAWN_WIDTH: u32 = 2;
/// Players move in half-tile steps.
pub const PLAYER_STEP: f32 = TILE_WIDTH / 2.0;

/// The single moving entity of a game session. Square, sized in whole tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    position: Vec2,
    width_tiles: u32,
    step: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_SPAWN, PLAYER_SPAWN_WIDTH)
    }
}

impl Player {
    pub fn new(position: Vec2, width_tiles: u32) -> Self {
        Self {
            position,
            width_tiles: width_tiles.max(1),
            step: PLAYER_STEP,
        }
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    pub fn width_tiles(&self) -> u32 {
        self.width_tiles
    }

    pub fn size(&self) -> Vec2 {
        Vec2::splat(self.width_tiles as f32 * TILE_WIDTH)
    }

    pub fn hitbox(&self) -> FRect {
        FRect::new(self.position, self.size())
    }

    pub fn vertices(&self) -> [Vec2; 4] {
        self.hitbox().corners()
    }

    /// Unbounded above.
    pub fn grow(&mut self) {
        self.width_tiles = self.width_tiles.saturating_add(1);
    }

    /// Never below one tile.
    pub fn shrink(&mut self) {
        self.width_tiles = self.width_tiles.saturating_sub(1).max(1);
    }

    /// One unit square per tile of the player's footprint, centered on the
    /// player, as polygon vertices. Only used for the debug overlay.
    ///
    /// For a 2×2 player at (x, y) the centers are (x ± 0.5, y ± 0.5).
    pub fn debug_tiles(&self) -> Vec<[Vec2; 4]> {
        let width = self.width_tiles;
        let half_tile = TILE_WIDTH / 2.0;
        let spread = half_tile * (width as f32 - 1.0);
        let mut tiles = Vec::with_capacity((width * width) as usize);
        for row in 0..width {
            for col in 0..width {
                let center = Vec2::new(
                    self.position.x + col as f32 * TILE_WIDTH - spread,
                    self.position.y + row as f32 * TILE_WIDTH - spread,
                );
                tiles.push(FRect::new(center, Vec2::splat(TILE_WIDTH)).corners());
            }
        }
        tiles
    }
}

impl Mover for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn size(&self) -> Vec2 {
        Player::size(self)
    }

    fn step(&self) -> f32 {
        self.step
    }
}
