//! Level persistence: one JSON file of keyed tile records per level.
//!
//! Loading is all-or-nothing: a file either yields a complete [`TileMap`] or
//! an error, never a partially hydrated map. Saving replaces the file with a
//! temp-file rename.

mod atomic_io;
mod format;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::grid::TileMap;

pub use format::{encode_tile_map, parse_tile_map, FormatError};

pub const DEFAULT_LEVEL_FILE: &str = "level1.json";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write level {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode level for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("malformed level {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// SHA-256 of a level's encoded JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelDigest([u8; 32]);

impl LevelDigest {
    pub fn of_text(text: &str) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(text.as_bytes()));
        Self(bytes)
    }

    /// Digest of the file `tiles` would encode to.
    pub fn of_tiles(tiles: &TileMap) -> Result<Self, FormatError> {
        encode_tile_map(tiles).map(|json| Self::of_text(&json))
    }

    pub fn short_hex(&self) -> String {
        to_hex_lower(&self.0[..4])
    }
}

impl fmt::Display for LevelDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex_lower(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLevel {
    pub tiles: TileMap,
    pub digest: LevelDigest,
}

pub fn load_level(path: &Path) -> Result<LoadedLevel, LevelError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tiles = parse_tile_map(&raw).map_err(|source| LevelError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    // Digest the canonical encoding so a hand-edited file still compares
    // equal to the same map saved back out.
    let digest = LevelDigest::of_tiles(&tiles).map_err(|source| LevelError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(LoadedLevel { tiles, digest })
}

pub fn save_level(path: &Path, tiles: &TileMap) -> Result<LevelDigest, LevelError> {
    let json = encode_tile_map(tiles).map_err(|source| LevelError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_io::write_text_atomic(path, &json).map_err(|source| LevelError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(LevelDigest::of_text(&json))
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}
