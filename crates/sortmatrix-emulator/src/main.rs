//! Sort-matrix emulator standalone binary.

use std::process::ExitCode;

use clap::Parser;
use sortmatrix_emulator::{EmulateArgs, cli};

fn main() -> ExitCode {
    let args = EmulateArgs::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
