use std::path::{Path, PathBuf};

use gridshift_engine::{load_level, save_level, LevelDigest, LevelError, TileMap};
use tracing::{info, warn};

/// The level file a session reads from and writes to, plus the digest of
/// what was last on disk.
#[derive(Debug, Clone)]
pub(crate) struct LevelSlot {
    path: PathBuf,
    disk_digest: Option<LevelDigest>,
}

impl LevelSlot {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            disk_digest: None,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Replaces `tiles` with the file's contents. On failure `tiles` is left
    /// as it was.
    pub(crate) fn load_into(&mut self, tiles: &mut TileMap) -> Result<(), LevelError> {
        match load_level(&self.path) {
            Ok(loaded) => {
                *tiles = loaded.tiles;
                self.disk_digest = Some(loaded.digest);
                info!(
                    path = %self.path.display(),
                    tile_count = tiles.len(),
                    digest = %loaded.digest.short_hex(),
                    "level_loaded"
                );
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "level_load_failed");
                Err(error)
            }
        }
    }

    pub(crate) fn save(&mut self, tiles: &TileMap) -> Result<(), LevelError> {
        match save_level(&self.path, tiles) {
            Ok(digest) => {
                self.disk_digest = Some(digest);
                info!(
                    path = %self.path.display(),
                    tile_count = tiles.len(),
                    digest = %digest.short_hex(),
                    "level_saved"
                );
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "level_save_failed");
                Err(error)
            }
        }
    }

    /// True when `tiles` would not encode to what was last loaded or saved.
    /// A slot that never touched disk counts as modified once it holds tiles.
    pub(crate) fn is_modified(&self, tiles: &TileMap) -> bool {
        match (self.disk_digest, LevelDigest::of_tiles(tiles)) {
            (Some(disk), Ok(current)) => disk != current,
            (None, _) => !tiles.is_empty(),
            (Some(_), Err(_)) => true,
        }
    }

    pub(crate) fn hud_line(&self, tiles: &TileMap) -> String {
        let state = if self.is_modified(tiles) {
            " (modified)"
        } else {
            ""
        };
        format!("Level: {}{state}, {} tiles", self.name(), tiles.len())
    }
}
