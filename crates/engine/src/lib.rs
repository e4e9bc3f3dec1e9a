use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod drawing;
pub mod editor;
pub mod geom;
pub mod grid;
pub mod level;
pub mod physics;
pub mod player;

pub use app::{
    run_app, AppError, HudContext, InputCommand, InputSnapshot, LoopConfig, LoopMetricsSnapshot,
    RenderReport, Renderer, Scene, SceneCommand, ScreenshotError,
};
pub use drawing::{DrawList, Drawing};
pub use editor::{Cursor, CursorMode, Editor, StyleError, StyleTable, TileStyle, ToggleResult};
pub use geom::{FRect, Vec2, Viewport, Xfm, PIXELS_PER_WORLD};
pub use grid::{
    snap_to_grid, Behavior, Color, Direction, GridPos, Rgba, Tile, TileMap, TileMapError,
    TILE_WIDTH,
};
pub use level::{load_level, save_level, LevelDigest, LevelError, LoadedLevel, DEFAULT_LEVEL_FILE};
pub use physics::{resolve_move, MoveOutcome, Mover};
pub use player::Player;

pub const ROOT_ENV_VAR: &str = "GRIDSHIFT_ROOT";
pub const LEVEL_ENV_VAR: &str = "GRIDSHIFT_LEVEL";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub levels_dir: PathBuf,
    pub screenshots_dir: PathBuf,
    pub level_file: String,
}

impl AppPaths {
    pub fn level_path(&self) -> PathBuf {
        self.levels_dir.join(&self.level_file)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create levels directory at {path}: {source}")]
    CreateLevelsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "GRIDSHIFT_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or levels/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error("GRIDSHIFT_LEVEL must be a bare file name inside levels/, got {value:?}")]
    InvalidLevelName { value: String },
    #[error(
        "Could not find the gridshift root above the executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or levels/.\n\
Point {env_var} at it, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/gridshift\"\n\
PowerShell: $env:{env_var}=\"C:\\path\\to\\gridshift\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the project root and the level file a session reads and writes.
/// The levels directory is created if missing; screenshots are created on
/// first capture.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let level_file = resolve_level_file()?;
    paths_under(root, level_file)
}

fn paths_under(root: PathBuf, level_file: String) -> Result<AppPaths, StartupError> {
    let levels_dir = root.join("levels");
    let screenshots_dir = root.join("screenshots");

    fs::create_dir_all(&levels_dir).map_err(|source| StartupError::CreateLevelsDir {
        path: levels_dir.clone(),
        source,
    })?;

    Ok(AppPaths {
        root,
        levels_dir,
        screenshots_dir,
        level_file,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(Path::new(&value));
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            find_root_above(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn resolve_level_file() -> Result<String, StartupError> {
    match env::var(LEVEL_ENV_VAR) {
        Ok(value) => validate_level_name(value.trim()),
        Err(env::VarError::NotPresent) => Ok(DEFAULT_LEVEL_FILE.to_string()),
        Err(source) => Err(StartupError::EnvVar {
            var: LEVEL_ENV_VAR,
            source,
        }),
    }
}

fn validate_level_name(value: &str) -> Result<String, StartupError> {
    let path = Path::new(value);
    let is_bare_name = !value.is_empty()
        && path.file_name().map(|name| name == path.as_os_str()) == Some(true);
    if is_bare_name {
        Ok(value.to_string())
    } else {
        Err(StartupError::InvalidLevelName {
            value: value.to_string(),
        })
    }
}

fn find_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_levels = path.join("levels").is_dir();

    cargo_toml && (has_crates || has_levels)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
