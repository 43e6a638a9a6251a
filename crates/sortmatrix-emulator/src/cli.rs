//! CLI module for sortmatrix-emulator.
//!
//! Used by the standalone `sortmatrix-emulate` binary and by the unified
//! `sortmatrix emulate` subcommand.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use sortmatrix_config::{CliOverrides, apply_overrides, init_tracing, load_or_default, validate_config};
use sortmatrix_rules::{FileProvider, MatchOptions};
use tracing::{error, warn};

use crate::{emulate, load_reference, write_emulation};

/// Emulate CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sortmatrix-emulate",
    version,
    about = "Validate a sort-matrix rule table and predict item bins"
)]
pub struct EmulateArgs {
    /// Config file path (json/jsonc/yaml/toml); defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rule table (pipe-delimited or pasted from the sorter's web page)
    #[arg(short, long)]
    pub table: PathBuf,

    /// Item records, one `id|location|destination|type|callnum|` per line
    #[arg(short, long)]
    pub items: Option<PathBuf>,

    /// Evaluate hold/alert rules too
    #[arg(long)]
    pub holds: bool,

    /// Trace every column comparison
    #[arg(short, long)]
    pub explain: bool,

    /// Skip table validation
    #[arg(long)]
    pub no_validate: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Run an emulation with the given arguments.
pub fn run(args: EmulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, &args.overrides);
    if args.holds {
        config.engine.include_holds = true;
    }
    if args.explain {
        config.engine.explain = true;
        // comparison traces are emitted at trace level
        if !args.overrides.debug && args.overrides.log_level.is_none() {
            config.logging.level = Some("trace".into());
        }
    }
    validate_config(&config)?;

    init_tracing(&config.logging);

    let mut builder = FileProvider::load_table(&args.table)?;
    builder.set_max_fingerprints(config.engine.max_fingerprints);
    if let Some(registry) = load_reference(&config.reference)? {
        builder.set_reference(registry);
    }
    let engine = builder.build().inspect_err(|e| {
        error!(error = %e, error_type = e.error_type(), "failed to load rule table");
    })?;

    let items = match &args.items {
        Some(path) => FileProvider::load_items(path)?,
        None => Vec::new(),
    };
    let options = MatchOptions {
        include_holds: config.engine.include_holds,
        explain: config.engine.explain,
    };
    let emulation = emulate(
        &engine,
        items.iter().map(String::as_str),
        options,
        !args.no_validate,
    );
    if !emulation.errors.is_empty() {
        warn!(count = emulation.errors.len(), "some item records could not be matched");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &emulation)?;
        writeln!(out)?;
    } else {
        write_emulation(&mut out, &engine, &emulation)?;
    }
    Ok(())
}
