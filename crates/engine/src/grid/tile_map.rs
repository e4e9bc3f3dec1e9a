use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use super::{snap_to_grid, Behavior, Direction, GridPos, Rgba, Tile};
use crate::geom::Vec2;

/// Tile store keyed by grid position. Holds at most one tile per cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileMap {
    tiles: BTreeMap<GridPos, Tile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileMapError {
    #[error("cell {0} is already occupied")]
    Occupied(GridPos),
    #[error("no tile at {0}")]
    MissingTile(GridPos),
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from tiles that must all sit on distinct cells.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Result<Self, TileMapError> {
        let mut map = Self::new();
        for tile in tiles {
            map.insert_new(tile)?;
        }
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, pos: GridPos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.tiles.contains_key(&pos)
    }

    /// Every stored tile, in key order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.values()
    }

    /// Insert or replace. Returns the tile that previously held the cell.
    pub fn place(&mut self, tile: Tile) -> Option<Tile> {
        self.tiles.insert(tile.pos, tile)
    }

    /// Insert into an empty cell only.
    pub fn insert_new(&mut self, tile: Tile) -> Result<(), TileMapError> {
        if self.tiles.contains_key(&tile.pos) {
            return Err(TileMapError::Occupied(tile.pos));
        }
        self.tiles.insert(tile.pos, tile);
        Ok(())
    }

    pub fn remove(&mut self, pos: GridPos) -> Option<Tile> {
        self.tiles.remove(&pos)
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn place_at(&mut self, world: Vec2, color: Rgba, behavior: Behavior) -> Option<Tile> {
        self.place(Tile::new(snap_to_grid(world), color, behavior))
    }

    pub fn has_tile_at(&self, world: Vec2) -> bool {
        self.contains(snap_to_grid(world))
    }

    pub fn erase_at(&mut self, world: Vec2) -> Option<Tile> {
        self.remove(snap_to_grid(world))
    }

    /// Cell that `pos` would occupy after moving one step. `Err` names the
    /// occupant when the cell is taken by a tile outside `moving`.
    pub fn destination_for(
        &self,
        pos: GridPos,
        direction: Direction,
        moving: &BTreeSet<GridPos>,
    ) -> Result<GridPos, TileMapError> {
        let destination = pos.offset(direction);
        if self.contains(destination) && !moving.contains(&destination) {
            return Err(TileMapError::Occupied(destination));
        }
        Ok(destination)
    }

    /// Move every tile in `positions` one cell in `direction` as one batch.
    ///
    /// Either every tile moves or the map is left untouched. Tiles may move
    /// into cells vacated by other tiles of the same batch.
    pub fn translate(
        &mut self,
        positions: &BTreeSet<GridPos>,
        direction: Direction,
    ) -> Result<(), TileMapError> {
        for &pos in positions {
            if !self.contains(pos) {
                return Err(TileMapError::MissingTile(pos));
            }
            self.destination_for(pos, direction, positions)?;
        }

        let lifted: Vec<Tile> = positions
            .iter()
            .filter_map(|pos| self.tiles.remove(pos))
            .collect();
        for mut tile in lifted {
            tile.pos = tile.pos.offset(direction);
            let previous = self.tiles.insert(tile.pos, tile);
            debug_assert!(previous.is_none(), "batch translate clobbered {}", tile.pos);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Color;

    fn stop(x: i32, y: i32) -> Tile {
        Tile::new(GridPos::new(x, y), Color::GREY, Behavior::Stop)
    }

    fn set(positions: &[(i32, i32)]) -> BTreeSet<GridPos> {
        positions.iter().copied().map(GridPos::from).collect()
    }

    #[test]
    fn place_replaces_existing_tile_in_cell() {
        let mut map = TileMap::new();
        assert!(map.place(stop(1, 1)).is_none());
        let replaced = map.place(Tile::new(GridPos::new(1, 1), Color::RED, Behavior::Push));
        assert_eq!(replaced, Some(stop(1, 1)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(GridPos::new(1, 1)).map(|t| t.color), Some(Color::RED));
    }

    #[test]
    fn insert_new_refuses_occupied_cell() {
        let mut map = TileMap::from_tiles([stop(0, 0)]).expect("map");
        assert_eq!(
            map.insert_new(stop(0, 0)),
            Err(TileMapError::Occupied(GridPos::new(0, 0)))
        );
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn from_tiles_rejects_duplicate_positions() {
        let result = TileMap::from_tiles([stop(3, 3), stop(3, 3)]);
        assert_eq!(result, Err(TileMapError::Occupied(GridPos::new(3, 3))));
    }

    #[test]
    fn world_point_operations_snap_before_lookup() {
        let mut map = TileMap::new();
        map.place_at(Vec2::new(0.8, -1.3), Color::WHITE, Behavior::Stop);
        assert!(map.contains(GridPos::new(1, -1)));
        assert!(map.has_tile_at(Vec2::new(1.2, -0.6)));
        assert!(!map.has_tile_at(Vec2::new(1.6, -0.6)));

        assert!(map.erase_at(Vec2::new(1.4, -1.4)).is_some());
        assert!(map.is_empty());
        assert!(map.erase_at(Vec2::new(1.0, -1.0)).is_none());
    }

    #[test]
    fn tiles_enumerates_every_entry() {
        let map = TileMap::from_tiles([stop(2, 0), stop(-1, 0), stop(0, 5)]).expect("map");
        let mut seen: Vec<GridPos> = map.tiles().map(|tile| tile.pos).collect();
        seen.sort();
        assert_eq!(
            seen,
            vec![GridPos::new(-1, 0), GridPos::new(0, 5), GridPos::new(2, 0)]
        );
    }

    #[test]
    fn translate_moves_tiles_and_rekeys_them() {
        let mut map = TileMap::from_tiles([stop(1, 0)]).expect("map");
        map.translate(&set(&[(1, 0)]), Direction::Right)
            .expect("translate");
        assert!(!map.contains(GridPos::new(1, 0)));
        assert_eq!(map.get(GridPos::new(2, 0)).map(|t| t.pos), Some(GridPos::new(2, 0)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn translate_into_occupied_cell_leaves_map_untouched() {
        let mut map = TileMap::from_tiles([stop(1, 0), stop(2, 0), stop(1, 1)]).expect("map");
        let before = map.clone();
        let result = map.translate(&set(&[(1, 1), (1, 0)]), Direction::Right);
        assert_eq!(result, Err(TileMapError::Occupied(GridPos::new(2, 0))));
        assert_eq!(map, before);
    }

    #[test]
    fn translate_allows_moving_into_cell_vacated_by_same_batch() {
        let mut map = TileMap::from_tiles([stop(1, 0), stop(2, 0)]).expect("map");
        map.translate(&set(&[(1, 0), (2, 0)]), Direction::Right)
            .expect("translate");
        assert!(map.contains(GridPos::new(2, 0)));
        assert!(map.contains(GridPos::new(3, 0)));
        assert!(!map.contains(GridPos::new(1, 0)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn translate_missing_tile_is_an_error() {
        let mut map = TileMap::new();
        assert_eq!(
            map.translate(&set(&[(4, 4)]), Direction::Up),
            Err(TileMapError::MissingTile(GridPos::new(4, 4)))
        );
    }
}
