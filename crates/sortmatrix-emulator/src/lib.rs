//! Sort-matrix emulator.
//!
//! Loads a persisted rule table, validates it, and predicts the bin each
//! item record would be routed to.

pub mod cli;
pub mod report;

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use sortmatrix_config::ReferenceConfig;
use sortmatrix_rules::{
    FileProvider, MatchOptions, MatchResult, ReferenceRegistry, RuleEngine, RulesError,
    ValidationReport,
};
use tracing::info;

pub use cli::EmulateArgs;
pub use report::write_report;

/// Build the reference registry from inline lists and list files.
/// Returns `None` when nothing is configured.
pub fn load_reference(config: &ReferenceConfig) -> Result<Option<ReferenceRegistry>, RulesError> {
    if config.is_empty() {
        return Ok(None);
    }
    let mut registry = ReferenceRegistry::default();
    for code in &config.locations {
        registry.add_location(code.as_str());
    }
    for code in &config.item_types {
        registry.add_item_type(code.as_str());
    }
    if let Some(path) = &config.locations_file {
        for code in FileProvider::load_reference(Path::new(path))? {
            registry.add_location(code);
        }
    }
    if let Some(path) = &config.item_types_file {
        for code in FileProvider::load_reference(Path::new(path))? {
            registry.add_item_type(code);
        }
    }
    Ok(Some(registry))
}

/// What an emulation run produced.
#[derive(Debug, Default, Serialize)]
pub struct Emulation {
    pub report: Option<ValidationReport>,
    pub results: Vec<MatchResult>,
    pub errors: Vec<String>,
}

impl Emulation {
    pub fn exception_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_exception()).count()
    }
}

/// Validate (optionally) and route `items` through `engine`.
pub fn emulate<'a, I>(engine: &RuleEngine, items: I, options: MatchOptions, validate: bool) -> Emulation
where
    I: IntoIterator<Item = &'a str>,
{
    let report = validate.then(|| engine.validate());
    let mut results = Vec::new();
    let mut errors = Vec::new();
    for outcome in engine.match_batch(items, options) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => errors.push(e.to_string()),
        }
    }
    let emulation = Emulation {
        report,
        results,
        errors,
    };
    info!(
        routed = emulation.results.len(),
        exceptions = emulation.exception_count(),
        errors = emulation.errors.len(),
        "emulation complete"
    );
    emulation
}

/// Human-readable output: skipped lines, the report, then one line per item.
pub fn write_emulation<W: Write>(out: &mut W, engine: &RuleEngine, emulation: &Emulation) -> io::Result<()> {
    for skipped in engine.skipped() {
        writeln!(out, "skipped line {}: {}", skipped.line, skipped.reason)?;
    }
    if let Some(report) = &emulation.report {
        write_report(out, report)?;
    }
    for result in &emulation.results {
        writeln!(out, "{}", result.summary())?;
    }
    for error in &emulation.errors {
        writeln!(out, "error: {error}")?;
    }
    Ok(())
}
