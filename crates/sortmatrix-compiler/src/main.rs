//! Sort-matrix compiler standalone binary.

use std::process::ExitCode;

use clap::Parser;
use sortmatrix_compiler::{CompileArgs, cli};

fn main() -> ExitCode {
    let args = CompileArgs::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
