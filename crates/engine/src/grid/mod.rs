mod tile;
mod tile_map;

pub use tile::{Behavior, Color, Rgba, Tile, TILE_WIDTH};
pub use tile_map::{TileMap, TileMapError};

use std::fmt;

use crate::geom::Vec2;

/// Integer grid cell. The value-typed map key for tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_world(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.unit_cells();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Canonical key text, `(x, y)`. Only used at the file boundary and in logs.
impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn unit_cells(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn unit_vector(self) -> Vec2 {
        let (dx, dy) = self.unit_cells();
        Vec2::new(dx as f32, dy as f32)
    }
}

/// Round a world point to the nearest grid cell, component-wise.
pub fn snap_to_grid(world: Vec2) -> GridPos {
    GridPos::new(world.x.round() as i32, world.y.round() as i32)
}
