//! The gridshift puzzle game and its level editor, wired onto
//! `gridshift_engine`.

mod app;

pub use app::{run_editor, run_game};
