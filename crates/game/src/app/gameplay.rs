use std::path::PathBuf;

use gridshift_engine::drawing::{PLAYER_DRAWING, TILE_MAP_DRAWING};
use gridshift_engine::{
    resolve_move, DrawList, Drawing, HudContext, InputCommand, InputSnapshot, MoveOutcome, Mover,
    Player, Scene, SceneCommand, TileMap, Xfm,
};
use tracing::{debug, info};

use super::level_slot::LevelSlot;

/// One play session: the level's tiles and the player walking through them.
pub(crate) struct GameSession {
    tiles: TileMap,
    player: Player,
    debug: bool,
    level: LevelSlot,
}

impl GameSession {
    pub(crate) fn new(level_path: PathBuf) -> Self {
        Self {
            tiles: TileMap::new(),
            player: Player::default(),
            debug: true,
            level: LevelSlot::new(level_path),
        }
    }

    fn apply(&mut self, command: InputCommand) -> SceneCommand {
        match command {
            InputCommand::Move(direction) => {
                let outcome = resolve_move(&mut self.tiles, &mut self.player, direction);
                if let MoveOutcome::Moved { pushed, .. } = &outcome {
                    if !pushed.is_empty() {
                        debug!(count = pushed.len(), "tiles_pushed");
                    }
                }
            }
            InputCommand::Grow => {
                self.player.grow();
                debug!(width = self.player.width_tiles(), "player_grew");
            }
            InputCommand::Shrink => {
                self.player.shrink();
                debug!(width = self.player.width_tiles(), "player_shrank");
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
            InputCommand::ToggleAtCursor
            | InputCommand::PrimaryClick(_)
            | InputCommand::SecondaryClick(_)
            | InputCommand::PointerMoved
            | InputCommand::SelectStyle(_)
            | InputCommand::CycleBehavior
            | InputCommand::Screenshot => {}
        }
        SceneCommand::None
    }
}

impl Scene for GameSession {
    fn name(&self) -> &'static str {
        "game"
    }

    fn load(&mut self) {
        // A missing level is not fatal: play starts on an empty grid.
        let _ = self.level.load_into(&mut self.tiles);
    }

    fn update(&mut self, input: &InputSnapshot, _xfm: &Xfm) -> SceneCommand {
        for &command in input.commands() {
            if self.apply(command) == SceneCommand::Quit {
                return SceneCommand::Quit;
            }
        }
        SceneCommand::None
    }

    fn drawings(&self) -> DrawList {
        let mut list = DrawList::new();
        list.publish(TILE_MAP_DRAWING, Drawing::tile_map(&self.tiles));
        list.publish(PLAYER_DRAWING, Drawing::player(&self.player, self.debug));
        list
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }

    fn hud_lines(&self, context: &HudContext<'_>) -> Vec<String> {
        let mut lines = context.common_lines();
        let position = self.player.position();
        lines.push(format!(
            "Player: pos=({:+.2}, {:+.2}) size={}",
            position.x,
            position.y,
            self.player.width_tiles()
        ));
        lines.push(self.level.hud_line(&self.tiles));
        lines.extend(context.last_report.hud_lines());
        lines
    }

    fn unload(&mut self) {
        info!(
            level = %self.level.path().display(),
            unsaved = self.level.is_modified(&self.tiles),
            "game_session_closed"
        );
    }
}
