use std::path::PathBuf;

use gridshift_engine::drawing::{CURSOR_DRAWING, STYLES_DRAWING, TILE_MAP_DRAWING};
use gridshift_engine::{
    Color, CursorMode, DrawList, Drawing, Editor, HudContext, InputCommand, InputSnapshot, Scene,
    SceneCommand, TileMap, ToggleResult, Vec2, Xfm,
};
use tracing::{debug, info, warn};

use super::level_slot::LevelSlot;

pub(crate) struct EditorSession {
    tiles: TileMap,
    editor: Editor,
    debug: bool,
    level: LevelSlot,
}

impl EditorSession {
    pub(crate) fn new(level_path: PathBuf) -> Self {
        Self {
            tiles: TileMap::new(),
            editor: Editor::new(),
            debug: true,
            level: LevelSlot::new(level_path),
        }
    }

    fn apply(&mut self, command: InputCommand, input: &InputSnapshot, xfm: &Xfm) -> SceneCommand {
        match command {
            InputCommand::PointerMoved => {
                self.editor.cursor.pointer_moved();
                self.editor.cursor.follow_pointer(input.pointer_world(xfm));
            }
            InputCommand::Move(direction) => {
                self.editor.cursor.nudge(direction);
                debug!(cursor = %self.editor.cursor.pos, "cursor_nudged");
            }
            InputCommand::PrimaryClick(px) => {
                let world = self.click_world(px, input, xfm);
                self.editor.place_tile(&mut self.tiles, world);
            }
            InputCommand::SecondaryClick(px) => {
                let world = self.click_world(px, input, xfm);
                self.editor.erase_tile(&mut self.tiles, world);
            }
            InputCommand::ToggleAtCursor => match self.editor.toggle_at_cursor(&mut self.tiles) {
                ToggleResult::Placed(pos) => debug!(tile = %pos, "toggle_placed"),
                ToggleResult::Erased(pos) => debug!(tile = %pos, "toggle_erased"),
            },
            InputCommand::SelectStyle(id) => {
                if let Err(error) = self.editor.select_style(id) {
                    warn!(error = %error, "style_select_failed");
                }
            }
            InputCommand::CycleBehavior => {
                let behavior = self.editor.cursor.cycle_behavior();
                info!(behavior = behavior.as_str(), "cursor_behavior_changed");
            }
            InputCommand::ToggleDebug => {
                self.debug = !self.debug;
                info!(debug = self.debug, "debug_toggled");
            }
            InputCommand::Save => {
                let _ = self.level.save(&self.tiles);
            }
            InputCommand::Load => {
                let _ = self.level.load_into(&mut self.tiles);
            }
            InputCommand::Quit => return SceneCommand::Quit,
            InputCommand::Grow | InputCommand::Shrink | InputCommand::Screenshot => {}
        }
        SceneCommand::None
    }

    fn click_world(&self, px: Vec2, input: &InputSnapshot, xfm: &Xfm) -> Vec2 {
        xfm.render_to_world(px, input.viewport())
    }
}

impl Scene for EditorSession {
    fn name(&self) -> &'static str {
        "editor"
    }

    fn load(&mut self) {
        // A missing level means authoring a new one.
        let _ = self.level.load_into(&mut self.tiles);
    }

    fn update(&mut self, input: &InputSnapshot, xfm: &Xfm) -> SceneCommand {
        self.editor.cursor.follow_pointer(input.pointer_world(xfm));
        for &command in input.commands() {
            if self.apply(command, input, xfm) == SceneCommand::Quit {
                return SceneCommand::Quit;
            }
        }
        SceneCommand::None
    }

    fn drawings(&self) -> DrawList {
        let mut list = DrawList::new();
        list.publish(TILE_MAP_DRAWING, Drawing::tile_map(&self.tiles));
        list.publish(CURSOR_DRAWING, self.editor.cursor_drawing());
        list.publish(STYLES_DRAWING, self.editor.styles_drawing());
        list
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }

    fn hud_lines(&self, context: &HudContext<'_>) -> Vec<String> {
        let cursor = &self.editor.cursor;
        let mode = match cursor.mode {
            CursorMode::Pointer => "pointer",
            CursorMode::Manual => "keys",
        };
        let mut lines = context.common_lines();
        lines.push(format!(
            "Cursor: {} style={} ({}) behavior={} via {mode}",
            cursor.pos,
            cursor.style,
            Color::name(self.editor.cursor_color()),
            cursor.behavior.as_str(),
        ));
        lines.push(self.level.hud_line(&self.tiles));
        lines.extend(context.last_report.hud_lines());
        lines
    }

    fn unload(&mut self) {
        if self.level.is_modified(&self.tiles) {
            warn!(level = %self.level.path().display(), "editor_closed_with_unsaved_changes");
        }
    }
}

#[cfg(test)]
mod tests {
    use gridshift_engine::{Behavior, Direction, GridPos, LoopMetricsSnapshot, RenderReport, Viewport};

    use super::*;

    const WIDTH: u32 = 500;
    const HEIGHT: u32 = 180;

    fn session(dir: &tempfile::TempDir) -> EditorSession {
        let mut session = EditorSession::new(dir.path().join("level1.json"));
        session.load();
        session
    }

    fn frame() -> InputSnapshot {
        InputSnapshot::empty().with_window_size(WIDTH, HEIGHT)
    }

    /// Render pixel at the center of grid cell (x, y) for the default transform.
    fn cell_px(x: i32, y: i32) -> Vec2 {
        Vec2::new(250.0 + 30.0 * x as f32, 90.0 - 30.0 * y as f32)
    }

    #[test]
    fn clicks_place_and_erase_snapped_tiles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(&dir);
        let xfm = Xfm::default();

        let near_cell = cell_px(2, 1) + Vec2::new(8.0, -6.0);
        session.update(&frame().with_command(InputCommand::PrimaryClick(near_cell)), &xfm);
        let tile = session.tiles.get(GridPos::new(2, 1)).expect("placed");
        assert_eq!(tile.color, Color::WHITE);
        assert_eq!(tile.behavior, Behavior::Stop);

        session.update(&frame().with_command(InputCommand::SecondaryClick(cell_px(2, 1))), &xfm);
        assert!(session.tiles.is_empty());
    }

    #[test]
    fn cursor_follows_pointer_until_nudged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(&dir);
        let xfm = Xfm::default();

        let pointing = frame()
            .with_pointer_px(Some(cell_px(-3, 1)))
            .with_command(InputCommand::PointerMoved);
        session.update(&pointing, &xfm);
        assert_eq!(session.editor.cursor.pos, GridPos::new(-3, 1));

        let nudge = frame()
            .with_pointer_px(Some(cell_px(-3, 1)))
            .with_command(InputCommand::Move(Direction::Right));
        session.update(&nudge, &xfm);
        session.update(&frame().with_pointer_px(Some(cell_px(-3, 1))), &xfm);
        assert_eq!(session.editor.cursor.pos, GridPos::new(-2, 1));
        assert_eq!(session.editor.cursor.mode, CursorMode::Manual);

        let moved_again = frame()
            .with_pointer_px(Some(cell_px(4, 0)))
            .with_command(InputCommand::PointerMoved);
        session.update(&moved_again, &xfm);
        assert_eq!(session.editor.cursor.pos, GridPos::new(4, 0));
    }

    #[test]
    fn space_toggles_with_selected_style_and_behavior() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(&dir);
        let xfm = Xfm::default();
        let setup = frame()
            .with_command(InputCommand::SelectStyle(4))
            .with_command(InputCommand::CycleBehavior)
            .with_command(InputCommand::CycleBehavior)
            .with_command(InputCommand::ToggleAtCursor);
        session.update(&setup, &xfm);

        let tile = session.tiles.get(GridPos::new(0, 0)).expect("placed at origin");
        assert_eq!(tile.color, Color::RED);
        assert_eq!(tile.behavior, Behavior::Push);

        session.update(&frame().with_command(InputCommand::ToggleAtCursor), &xfm);
        assert!(session.tiles.is_empty());
    }

    #[test]
    fn unknown_style_keeps_the_current_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(&dir);
        session.update(
            &frame()
                .with_command(InputCommand::SelectStyle(2))
                .with_command(InputCommand::SelectStyle(9)),
            &Xfm::default(),
        );
        assert_eq!(session.editor.cursor.style, 2);
    }

    #[test]
    fn saved_level_loads_back_in_a_new_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut first = session(&dir);
        let xfm = Xfm::default();
        let authoring = frame()
            .with_command(InputCommand::PrimaryClick(cell_px(1, -1)))
            .with_command(InputCommand::SelectStyle(2))
            .with_command(InputCommand::CycleBehavior)
            .with_command(InputCommand::CycleBehavior)
            .with_command(InputCommand::PrimaryClick(cell_px(2, -1)))
            .with_command(InputCommand::Save);
        first.update(&authoring, &xfm);

        let second = session(&dir);
        assert_eq!(second.tiles, first.tiles);
        let pushed = second.tiles.get(GridPos::new(2, -1)).expect("push tile");
        assert_eq!(pushed.behavior, Behavior::Push);
        assert_eq!(pushed.color, Color::GREY);
    }

    #[test]
    fn drawings_are_tiles_cursor_and_styles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = session(&dir);
        let list = session.drawings();
        let names: Vec<&str> = list.names().collect();
        assert_eq!(names, vec![TILE_MAP_DRAWING, CURSOR_DRAWING, STYLES_DRAWING]);
    }

    #[test]
    fn hud_reports_cursor_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = session(&dir);
        session.update(
            &frame().with_command(InputCommand::Move(Direction::Up)),
            &Xfm::default(),
        );
        let xfm = Xfm::default();
        let report = RenderReport::default();
        let context = HudContext {
            metrics: LoopMetricsSnapshot::default(),
            pointer_px: None,
            viewport: Viewport::new(WIDTH, HEIGHT),
            xfm: &xfm,
            last_report: &report,
        };

        let lines = session.hud_lines(&context);
        assert!(lines.contains(&"Cursor: (0, 1) style=1 (white) behavior=stop via keys".to_string()));
        assert!(lines.contains(&"Level: level1.json, 0 tiles".to_string()));
    }
}
