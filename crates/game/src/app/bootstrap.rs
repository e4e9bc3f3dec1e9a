use gridshift_engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::editing::EditorSession;
use super::gameplay::GameSession;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_game() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== gridshift ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), level = %paths.level_path().display(), "app_paths");
    Ok(AppWiring {
        config: LoopConfig {
            window_title: "gridshift".to_string(),
            screenshot_dir: Some(paths.screenshots_dir.clone()),
            ..LoopConfig::default()
        },
        scene: Box::new(GameSession::new(paths.level_path())),
    })
}

pub(crate) fn build_editor() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== gridshift editor ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), level = %paths.level_path().display(), "app_paths");
    Ok(AppWiring {
        config: LoopConfig {
            window_title: "gridshift editor".to_string(),
            screenshot_dir: Some(paths.screenshots_dir.clone()),
            ..LoopConfig::default()
        },
        scene: Box::new(EditorSession::new(paths.level_path())),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
