use std::process::ExitCode;

fn main() -> ExitCode {
    gridshift::run_game()
}
