use crate::drawing::DrawList;
use crate::geom::{Vec2, Viewport, Xfm};
use crate::grid::snap_to_grid;

use super::input::InputSnapshot;
use super::metrics::LoopMetricsSnapshot;
use super::rendering::RenderReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// What the loop knows that a scene may want to show in its HUD.
#[derive(Debug, Clone, Copy)]
pub struct HudContext<'a> {
    pub metrics: LoopMetricsSnapshot,
    pub pointer_px: Option<Vec2>,
    pub viewport: Viewport,
    pub xfm: &'a Xfm,
    pub last_report: &'a RenderReport,
}

impl HudContext<'_> {
    /// FPS and the pointer in render, world and snapped grid coordinates.
    pub fn common_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("FPS: {:.1}", self.metrics.fps)];
        lines.push(match self.pointer_px {
            Some(px) => {
                let world = self.xfm.render_to_world(px, self.viewport);
                let snapped = snap_to_grid(world);
                format!(
                    "Mouse: Render=({:4},{:4}), World=({:+.2}, {:+.2}){}",
                    px.x.round() as i32,
                    px.y.round() as i32,
                    world.x,
                    world.y,
                    snapped
                )
            }
            None => "Mouse: outside window".to_string(),
        });
        lines
    }
}

/// One session driven by the app loop: a game or an editor.
pub trait Scene {
    fn name(&self) -> &'static str;
    fn load(&mut self);
    fn update(&mut self, input: &InputSnapshot, xfm: &Xfm) -> SceneCommand;
    fn drawings(&self) -> DrawList;
    fn debug_enabled(&self) -> bool;
    fn hud_lines(&self, context: &HudContext<'_>) -> Vec<String>;
    fn unload(&mut self) {}
}
