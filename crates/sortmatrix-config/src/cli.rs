//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override compression level (shared prefix length, 0 = dedupe only)
    #[arg(long)]
    pub compression: Option<i32>,
    /// Override library/branch code
    #[arg(long)]
    pub library: Option<String>,
    /// Override the sorter's physical bin count
    #[arg(long)]
    pub bin_count: Option<u32>,
    /// Skip hold rules and the deny-list rule
    #[arg(long)]
    pub no_defaults: bool,
    /// Override deny-list locations (repeatable or comma-separated)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub deny: Option<Vec<String>>,
    /// Override per-rule fingerprint cap for duplicate detection
    #[arg(long)]
    pub max_fingerprints: Option<usize>,
    /// Override reference location file (one token per line)
    #[arg(long)]
    pub locations_file: Option<String>,
    /// Override reference item-type file (one token per line)
    #[arg(long)]
    pub item_types_file: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Shorthand for --log-level debug
    #[arg(long)]
    pub debug: bool,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = overrides.compression {
        config.compiler.compression_level = v;
    }
    if let Some(v) = &overrides.library {
        config.compiler.library = Some(v.clone());
    }
    if let Some(v) = overrides.bin_count {
        config.compiler.bin_count = Some(v);
    }
    if overrides.no_defaults {
        config.compiler.default_rules = false;
    }
    if let Some(v) = &overrides.deny {
        config.compiler.deny_locations = v.clone();
    }
    if let Some(v) = overrides.max_fingerprints {
        config.engine.max_fingerprints = v;
    }
    if let Some(v) = &overrides.locations_file {
        config.reference.locations_file = Some(v.clone());
    }
    if let Some(v) = &overrides.item_types_file {
        config.reference.item_types_file = Some(v.clone());
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    // --debug wins over an explicit level
    if overrides.debug {
        config.logging.level = Some("debug".into());
    }
}
