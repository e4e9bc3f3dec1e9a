use std::process::ExitCode;

use gridshift_engine::{run_app, AppError, StartupError};
use tracing::error;

use super::bootstrap::AppWiring;

pub(crate) fn run(app: Result<AppWiring, StartupError>) -> ExitCode {
    let result = app
        .map_err(AppError::from)
        .and_then(|app| run_app(app.config, app.scene));
    if let Err(err) = result {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
