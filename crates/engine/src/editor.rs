//! Level editing: snapped placement and erasure, the tile cursor, and the
//! fixed style palette.

use thiserror::Error;
use tracing::debug;

use crate::drawing::{Drawing, StyleSwatch, TileArt};
use crate::geom::Vec2;
use crate::grid::{snap_to_grid, Behavior, Color, Direction, GridPos, Rgba, Tile, TileMap};

/// Alpha of the ghost tile drawn under the cursor.
pub const CURSOR_GHOST_ALPHA: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStyle {
    pub id: u8,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("no tile style with id {0}")]
    Unknown(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    styles: Vec<TileStyle>,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            styles: vec![
                TileStyle { id: 1, color: Color::WHITE },
                TileStyle { id: 2, color: Color::GREY },
                TileStyle { id: 3, color: Color::LIGHT_GREY },
                TileStyle { id: 4, color: Color::RED },
            ],
        }
    }
}

impl StyleTable {
    pub fn get(&self, id: u8) -> Result<TileStyle, StyleError> {
        self.styles
            .iter()
            .copied()
            .find(|style| style.id == id)
            .ok_or(StyleError::Unknown(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = TileStyle> + '_ {
        self.styles.iter().copied()
    }

    pub fn first_id(&self) -> u8 {
        self.styles.first().map(|style| style.id).unwrap_or(1)
    }
}

/// Which input last drove the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Pointer,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub pos: GridPos,
    pub style: u8,
    pub behavior: Behavior,
    pub mode: CursorMode,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            pos: GridPos::default(),
            style: 1,
            behavior: Behavior::default(),
            mode: CursorMode::Pointer,
        }
    }
}

impl Cursor {
    pub fn pointer_moved(&mut self) {
        self.mode = CursorMode::Pointer;
    }

    /// Re-snap to the pointer, unless a nudge has taken over since the last
    /// pointer motion.
    pub fn follow_pointer(&mut self, pointer_world: Option<Vec2>) {
        if self.mode != CursorMode::Pointer {
            return;
        }
        if let Some(world) = pointer_world {
            self.pos = snap_to_grid(world);
        }
    }

    pub fn nudge(&mut self, direction: Direction) {
        self.mode = CursorMode::Manual;
        self.pos = self.pos.offset(direction);
    }

    pub fn cycle_behavior(&mut self) -> Behavior {
        self.behavior = self.behavior.next();
        self.behavior
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleResult {
    Placed(GridPos),
    Erased(GridPos),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Editor {
    pub cursor: Cursor,
    pub styles: StyleTable,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_style(&mut self, id: u8) -> Result<TileStyle, StyleError> {
        let style = self.styles.get(id)?;
        self.cursor.style = style.id;
        debug!(style = id, color = Color::name(style.color), "style_selected");
        Ok(style)
    }

    /// Color the cursor style stands for. Falls back to the first style if the
    /// cursor somehow names an id the table does not hold.
    pub fn cursor_color(&self) -> Rgba {
        self.styles
            .get(self.cursor.style)
            .or_else(|_| self.styles.get(self.styles.first_id()))
            .map(|style| style.color)
            .unwrap_or(Color::WHITE)
    }

    /// Snap and insert, replacing whatever held the cell.
    pub fn place_tile(&self, tiles: &mut TileMap, world: Vec2) -> GridPos {
        let pos = snap_to_grid(world);
        let tile = Tile::new(pos, self.cursor_color(), self.cursor.behavior);
        let replaced = tiles.place(tile).is_some();
        debug!(
            tile = %pos,
            color = Color::name(tile.color),
            behavior = tile.behavior.as_str(),
            replaced,
            "tile_placed"
        );
        pos
    }

    pub fn erase_tile(&self, tiles: &mut TileMap, world: Vec2) -> Option<Tile> {
        let erased = tiles.erase_at(world);
        if let Some(tile) = erased {
            debug!(tile = %tile.pos, "tile_erased");
        }
        erased
    }

    pub fn has_tile(&self, tiles: &TileMap, world: Vec2) -> bool {
        tiles.has_tile_at(world)
    }

    /// Erase the tile under the cursor, or place one if the cell is empty.
    pub fn toggle_at_cursor(&self, tiles: &mut TileMap) -> ToggleResult {
        let world = self.cursor.pos.to_world();
        if self.has_tile(tiles, world) {
            self.erase_tile(tiles, world);
            ToggleResult::Erased(self.cursor.pos)
        } else {
            ToggleResult::Placed(self.place_tile(tiles, world))
        }
    }

    /// Translucent preview of the tile a click would place.
    pub fn cursor_drawing(&self) -> Drawing {
        let ghost = Tile::new(
            self.cursor.pos,
            self.cursor_color().with_alpha(CURSOR_GHOST_ALPHA),
            self.cursor.behavior,
        );
        Drawing::Cursor(TileArt {
            vertices: ghost.vertices(),
            color: ghost.color,
        })
    }

    /// Style `n` sits at world `(2n - 1, 2)`.
    pub fn styles_drawing(&self) -> Drawing {
        Drawing::Styles(
            self.styles
                .iter()
                .map(|style| StyleSwatch {
                    id: style.id,
                    center: Vec2::new(2.0 * style.id as f32 - 1.0, 2.0),
                    color: style.color,
                    selected: style.id == self.cursor.style,
                })
                .collect(),
        )
    }
}
