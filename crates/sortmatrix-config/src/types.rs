//! Configuration type definitions for the compiler, engine, reference data, and logging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Matrix compiler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Shared prefix length that triggers wildcard compression (<= 0 disables).
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,
    /// Inject hold rules and the deny-list rule.
    #[serde(default = "default_inject_rules")]
    pub default_rules: bool,
    /// Physical bin count of the sorter. When unset it is inferred from the
    /// highest bin staff identified.
    #[serde(default)]
    pub bin_count: Option<u32>,
    /// Library or branch code written into the table header.
    #[serde(default)]
    pub library: Option<String>,
    /// Locations routed straight to the exception bin.
    #[serde(default = "default_deny_locations")]
    pub deny_locations: Vec<String>,
    /// Hold/alert rules placed at the top of the table.
    #[serde(default = "default_hold_rules")]
    pub hold_rules: Vec<HoldRuleConfig>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
            default_rules: default_inject_rules(),
            bin_count: None,
            library: None,
            deny_locations: default_deny_locations(),
            hold_rules: default_hold_rules(),
        }
    }
}

/// A hold/alert rule, e.g. holds for other branches or interlibrary loans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoldRuleConfig {
    /// Route name, usually `REJECT`.
    pub route: String,
    /// Alert flag column value (`Y` or `N`).
    pub alert: String,
    /// Alert type column value.
    #[serde(default)]
    pub alert_type: String,
    /// Higher severity sorts earlier.
    #[serde(default)]
    pub severity: u8,
}

/// Rule engine settings used by the emulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cap on fingerprints per rule during duplicate detection.
    #[serde(default = "default_max_fingerprints")]
    pub max_fingerprints: usize,
    /// Evaluate hold/alert rules when matching items.
    #[serde(default = "default_include_holds")]
    pub include_holds: bool,
    /// Log per-column comparisons while matching.
    #[serde(default = "default_explain")]
    pub explain: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_fingerprints: default_max_fingerprints(),
            include_holds: default_include_holds(),
            explain: default_explain(),
        }
    }
}

/// Closed reference registry for location and item-type tokens.
///
/// Inline lists and files (one token per line) are merged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReferenceConfig {
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub item_types: Vec<String>,
    #[serde(default)]
    pub locations_file: Option<String>,
    #[serde(default)]
    pub item_types_file: Option<String>,
}

impl ReferenceConfig {
    /// True when no reference data is configured at all.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
            && self.item_types.is_empty()
            && self.locations_file.is_none()
            && self.item_types_file.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Output target: stdout or stderr. Default: stderr.
    pub output: Option<String>,
    /// Per-module log level filters (e.g., {"sortmatrix_rules": "debug"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}
