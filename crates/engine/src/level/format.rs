use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::grid::{Behavior, GridPos, Rgba, Tile, TileMap, TileMapError};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid level json at {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("record key {key:?} does not match its pos {pos}")]
    KeyMismatch { key: String, pos: GridPos },
    #[error("two records share position {0}")]
    DuplicatePosition(GridPos),
    #[error("failed to encode level json: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One tile as written to disk. `behavior` is absent in early level files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct TileRecord {
    pos: [i32; 2],
    color: Rgba,
    #[serde(default)]
    behavior: Behavior,
}

impl From<&Tile> for TileRecord {
    fn from(tile: &Tile) -> Self {
        Self {
            pos: [tile.pos.x, tile.pos.y],
            color: tile.color,
            behavior: tile.behavior,
        }
    }
}

impl TileRecord {
    fn grid_pos(&self) -> GridPos {
        GridPos::new(self.pos[0], self.pos[1])
    }
}

/// Serializes records in grid order rather than key-string order.
struct LevelDocument<'a>(&'a TileMap);

impl Serialize for LevelDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for tile in self.0.tiles() {
            map.serialize_entry(&tile.name(), &TileRecord::from(tile))?;
        }
        map.end()
    }
}

/// Records in document order. Keeps repeated keys so they can be rejected
/// instead of silently overwritten.
struct RecordList(Vec<(String, TileRecord)>);

impl<'de> Deserialize<'de> for RecordList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordListVisitor;

        impl<'de> Visitor<'de> for RecordListVisitor {
            type Value = RecordList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of tile records keyed by position")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RecordList, A::Error> {
                let mut records = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, TileRecord>()? {
                    records.push(entry);
                }
                Ok(RecordList(records))
            }
        }

        deserializer.deserialize_map(RecordListVisitor)
    }
}

fn key_names_pos(key: &str, pos: GridPos) -> bool {
    key == pos.to_string() || key == format!("{}, {}", pos.x, pos.y)
}

pub fn parse_tile_map(raw: &str) -> Result<TileMap, FormatError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let RecordList(records) =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            let location = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            FormatError::Json {
                location,
                source: error.into_inner(),
            }
        })?;

    let mut tiles = TileMap::new();
    for (key, record) in records {
        let pos = record.grid_pos();
        if !key_names_pos(&key, pos) {
            return Err(FormatError::KeyMismatch { key, pos });
        }
        tiles
            .insert_new(Tile::new(pos, record.color, record.behavior))
            .map_err(|error| match error {
                TileMapError::Occupied(pos) | TileMapError::MissingTile(pos) => {
                    FormatError::DuplicatePosition(pos)
                }
            })?;
    }
    Ok(tiles)
}

pub fn encode_tile_map(tiles: &TileMap) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&LevelDocument(tiles)).map_err(FormatError::Encode)
}
