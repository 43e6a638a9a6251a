//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Rule Table Schema
// ============================================================================

/// Width of the positional rule/item schema, including the route column.
pub const SCHEMA_COLUMNS: usize = 15;
/// Fewest fields a rule-table line may carry after normalization.
pub const MIN_COLS: usize = 9;
/// Universal wildcard token.
pub const WILDCARD: &str = "*";
/// Separator between fields of a persisted rule line or item record.
pub const FIELD_SEPARATOR: char = '|';
/// Separator between alternatives inside one field.
pub const LIST_SEPARATOR: char = ',';

// ============================================================================
// Compiler Defaults
// ============================================================================

/// Fewest distinct bins a classification sheet must identify.
pub const MIN_BINS: usize = 3;
/// Default compression level (0 = deduplicate only, no wildcards).
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 0;
/// Inject hold rules and the deny-list rule by default.
pub const DEFAULT_INJECT_DEFAULT_RULES: bool = true;
/// Score contribution for a rule that affects no items.
pub const EMPTY_RULE_SCORE_BONUS: f64 = 100.0;
/// Locations whose stock is never folded into a real bin.
pub const DEFAULT_DENY_LOCATIONS: &[&str] = &[
    "BINDERY", "DAMAGE", "DISCARD", "LOST*", "MISSING", "NOF", "ON-ORDER", "UNKNOWN",
];
/// Default hold rules as (route, alert flag, alert type, severity).
pub const DEFAULT_HOLD_RULES: &[(&str, &str, &str, u8)] = &[
    ("REJECT", "Y", "01", 3),
    ("REJECT", "Y", "02", 2),
    ("REJECT", "Y", "03", 1),
];

// ============================================================================
// Engine Defaults
// ============================================================================

/// Cap on fingerprints a single rule may expand to during duplicate detection.
pub const DEFAULT_MAX_FINGERPRINTS: usize = 10_000;
/// Whole-table fingerprint budget, as a multiple of the per-rule cap.
pub const TABLE_FINGERPRINT_FACTOR: usize = 20;
/// Evaluate hold/alert rules during matching.
pub const DEFAULT_INCLUDE_HOLDS: bool = false;
/// Emit per-column comparison traces while matching.
pub const DEFAULT_EXPLAIN: bool = false;
