use crate::geom::{Vec2, Viewport, Xfm};
use crate::grid::Direction;

/// Logical commands produced by the host bindings, one per key or button
/// press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    Move(Direction),
    Grow,
    Shrink,
    ToggleDebug,
    ToggleAtCursor,
    /// Pointer position in render pixels at the time of the click.
    PrimaryClick(Vec2),
    SecondaryClick(Vec2),
    PointerMoved,
    SelectStyle(u8),
    CycleBehavior,
    Save,
    Load,
    Screenshot,
    Quit,
}

impl InputCommand {
    pub fn name(self) -> &'static str {
        match self {
            InputCommand::Move(Direction::Up) => "move_up",
            InputCommand::Move(Direction::Down) => "move_down",
            InputCommand::Move(Direction::Left) => "move_left",
            InputCommand::Move(Direction::Right) => "move_right",
            InputCommand::Grow => "grow",
            InputCommand::Shrink => "shrink",
            InputCommand::ToggleDebug => "toggle_debug",
            InputCommand::ToggleAtCursor => "toggle_at_cursor",
            InputCommand::PrimaryClick(_) => "primary_click",
            InputCommand::SecondaryClick(_) => "secondary_click",
            InputCommand::PointerMoved => "pointer_moved",
            InputCommand::SelectStyle(_) => "select_style",
            InputCommand::CycleBehavior => "cycle_behavior",
            InputCommand::Save => "save",
            InputCommand::Load => "load",
            InputCommand::Screenshot => "screenshot",
            InputCommand::Quit => "quit",
        }
    }
}

/// Everything a scene sees of one frame's input, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    commands: Vec<InputCommand>,
    pointer_px: Option<Vec2>,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
            pointer_px: None,
            window_width: 0,
            window_height: 0,
        }
    }

    pub(crate) fn new(
        commands: Vec<InputCommand>,
        pointer_px: Option<Vec2>,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            commands,
            pointer_px,
            window_width,
            window_height,
        }
    }

    pub fn commands(&self) -> &[InputCommand] {
        &self.commands
    }

    pub fn quit_requested(&self) -> bool {
        self.commands.contains(&InputCommand::Quit)
    }

    pub fn pointer_px(&self) -> Option<Vec2> {
        self.pointer_px
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.window_width, self.window_height)
    }

    pub fn pointer_world(&self, xfm: &Xfm) -> Option<Vec2> {
        self.pointer_px
            .map(|px| xfm.render_to_world(px, self.viewport()))
    }

    pub fn with_command(mut self, command: InputCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_pointer_px(mut self, pointer_px: Option<Vec2>) -> Self {
        self.pointer_px = pointer_px;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }
}
