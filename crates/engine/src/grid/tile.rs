use serde::{Deserialize, Serialize};

use super::GridPos;
use crate::geom::{FRect, Vec2};

/// Tile side length in world units. Grid cells and tiles share this unit.
pub const TILE_WIDTH: f32 = 1.0;

/// 0–255 RGBA, stored in the level file as a 4-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    pub const fn alpha(self) -> u8 {
        self.0[3]
    }
}

/// Named palette shared by the game and the editor.
pub struct Color;

impl Color {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const GREY: Rgba = Rgba::rgb(40, 40, 40);
    pub const MED_GREY: Rgba = Rgba::rgb(80, 80, 80);
    pub const LIGHT_GREY: Rgba = Rgba::rgb(120, 120, 120);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);

    /// Palette name ignoring alpha, `unknown` for anything off-palette.
    pub fn name(color: Rgba) -> &'static str {
        match color.with_alpha(255) {
            Self::WHITE => "white",
            Self::GREY => "grey",
            Self::MED_GREY => "med_grey",
            Self::LIGHT_GREY => "light_grey",
            Self::RED => "red",
            _ => "unknown",
        }
    }
}

/// How a tile reacts when a mover overlaps it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    #[default]
    Stop,
    Pass,
    Push,
}

impl Behavior {
    pub fn next(self) -> Self {
        match self {
            Behavior::Stop => Behavior::Pass,
            Behavior::Pass => Behavior::Push,
            Behavior::Push => Behavior::Stop,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Behavior::Stop => "stop",
            Behavior::Pass => "pass",
            Behavior::Push => "push",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub pos: GridPos,
    pub color: Rgba,
    pub behavior: Behavior,
}

impl Tile {
    pub fn new(pos: GridPos, color: Rgba, behavior: Behavior) -> Self {
        Self {
            pos,
            color,
            behavior,
        }
    }

    pub fn name(&self) -> String {
        self.pos.to_string()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::splat(TILE_WIDTH)
    }

    pub fn hitbox(&self) -> FRect {
        FRect::new(self.pos.to_world(), self.size())
    }

    pub fn vertices(&self) -> [Vec2; 4] {
        self.hitbox().corners()
    }
}
