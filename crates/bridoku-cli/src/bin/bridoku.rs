//! The `bridoku` command.

use std::{io, process::ExitCode};

use bridoku_cli::Args;
use clap::Parser as _;

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    match bridoku_cli::run(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("command failed: {err:?}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
