//! Unified sortmatrix CLI.
//!
//! This binary provides a unified interface to both tools:
//! - `sortmatrix compile` - Compile staff bin assignments into a rule table
//! - `sortmatrix emulate` - Validate a rule table and predict item bins
//!
//! Each subcommand can also be run as a standalone binary.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Sortmatrix unified CLI.
#[derive(Parser)]
#[command(
    name = "sortmatrix",
    version,
    about = "Rule compiler and emulator for library materials sorters",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a classification sheet into a rule table.
    #[command(name = "compile")]
    Compile(Box<sortmatrix_compiler::CompileArgs>),

    /// Validate a rule table and route item records.
    #[command(name = "emulate", alias = "test")]
    Emulate(Box<sortmatrix_emulator::EmulateArgs>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile(args) => sortmatrix_compiler::cli::run(*args),
        Commands::Emulate(args) => sortmatrix_emulator::cli::run(*args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
