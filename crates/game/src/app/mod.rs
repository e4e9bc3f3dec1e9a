mod bootstrap;
mod editing;
mod gameplay;
mod level_slot;
mod loop_runner;

use std::process::ExitCode;

pub fn run_game() -> ExitCode {
    loop_runner::run(bootstrap::build_game())
}

pub fn run_editor() -> ExitCode {
    loop_runner::run(bootstrap::build_editor())
}
