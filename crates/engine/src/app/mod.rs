mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputCommand, InputSnapshot};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{RenderReport, Renderer, ScreenshotError};
pub use scene::{HudContext, Scene, SceneCommand};
