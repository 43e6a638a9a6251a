//! CLI module for sortmatrix-compiler.
//!
//! Used by the standalone `sortmatrix-compile` binary and by the unified
//! `sortmatrix compile` subcommand.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use sortmatrix_config::{CliOverrides, apply_overrides, init_tracing, load_or_default, validate_config};
use tracing::{error, info};

use crate::compiler::{Compiler, CompilerOptions};
use crate::input::read_records;

/// Compile CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sortmatrix-compile",
    version,
    about = "Compile staff bin assignments into a sort-matrix rule table"
)]
pub struct CompileArgs {
    /// Config file path (json/jsonc/yaml/toml); defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Classification file (csv, xlsx, xls, xlsb, ods)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Zero-based index of the staff-selection sheet
    #[arg(long, default_value_t = 0)]
    pub sheet: usize,

    /// Write the rule table here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the coverage report as JSON
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Run a compilation with the given arguments.
pub fn run(args: CompileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;

    init_tracing(&config.logging);

    let input = read_records(&args.input, args.sheet)?;
    let compiler = Compiler::new(CompilerOptions::from(&config.compiler));
    let compilation = compiler.compile_input(&input).inspect_err(|e| {
        error!(error = %e, error_type = e.error_type(), "compilation failed");
    })?;

    let table = compilation.render();
    match &args.output {
        Some(path) => {
            std::fs::write(path, &table)?;
            info!(path = %path.display(), rules = compilation.table.len(), "rule table written");
            print!("{}", compilation.report);
        }
        None => {
            // keep stdout clean for the table
            eprint!("{}", compilation.report);
            std::io::stdout().write_all(table.as_bytes())?;
        }
    }

    if let Some(path) = &args.report_json {
        std::fs::write(path, serde_json::to_string_pretty(&compilation.report)?)?;
    }
    Ok(())
}
