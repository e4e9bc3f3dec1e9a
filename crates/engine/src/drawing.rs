//! Per-frame drawable list.
//!
//! Sessions derive a [`DrawList`] from their state once per frame and hand it
//! to the renderer. Entries are keyed by logical name; the renderer decides
//! which names it knows how to draw.

use crate::geom::Vec2;
use crate::grid::{Color, Rgba, TileMap};
use crate::player::Player;

pub const TILE_MAP_DRAWING: &str = "tileMap";
pub const PLAYER_DRAWING: &str = "player";
pub const CURSOR_DRAWING: &str = "cursor";
pub const STYLES_DRAWING: &str = "styles";

pub const PLAYER_COLOR: Rgba = Color::RED;
pub const PLAYER_DEBUG_COLOR: Rgba = Color::WHITE;

/// A filled quad in world space, vertices in top-left, top-right,
/// bottom-right, bottom-left order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileArt {
    pub vertices: [Vec2; 4],
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    pub tiles: Vec<[Vec2; 4]>,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerArt {
    pub vertices: [Vec2; 4],
    pub color: Rgba,
    pub debug: Option<DebugOverlay>,
}

/// One entry of the editor's style palette strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSwatch {
    pub id: u8,
    pub center: Vec2,
    pub color: Rgba,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawing {
    TileMap(Vec<TileArt>),
    Player(PlayerArt),
    Cursor(TileArt),
    Styles(Vec<StyleSwatch>),
}

impl Drawing {
    pub fn tile_map(tiles: &TileMap) -> Self {
        Drawing::TileMap(
            tiles
                .tiles()
                .map(|tile| TileArt {
                    vertices: tile.vertices(),
                    color: tile.color,
                })
                .collect(),
        )
    }

    /// The debug overlay is attached only when `debug` is on.
    pub fn player(player: &Player, debug: bool) -> Self {
        Drawing::Player(PlayerArt {
            vertices: player.vertices(),
            color: PLAYER_COLOR,
            debug: debug.then(|| DebugOverlay {
                tiles: player.debug_tiles(),
                color: PLAYER_DEBUG_COLOR,
            }),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Drawing::TileMap(_) => "tile_map",
            Drawing::Player(_) => "player",
            Drawing::Cursor(_) => "cursor",
            Drawing::Styles(_) => "styles",
        }
    }
}

/// Named drawings in publish order. Publishing a name twice replaces the
/// earlier entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    entries: Vec<(String, Drawing)>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, name: impl Into<String>, drawing: Drawing) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = drawing,
            None => self.entries.push((name, drawing)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Drawing> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, drawing)| drawing)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Drawing)> + '_ {
        self.entries
            .iter()
            .map(|(name, drawing)| (name.as_str(), drawing))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
