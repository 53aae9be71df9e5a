//! Snowglobe - Command-line tool for rendering holiday particle backdrops

use std::process::ExitCode;

use snowglobe::cli;

fn main() -> ExitCode {
    cli::run()
}
