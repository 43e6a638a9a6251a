//! Error kind labels for logging.
//!
//! These constants provide consistent error classification across all crates.

/// Rule-table or item line could not be parsed.
pub const ERROR_PARSE: &str = "parse";
/// Item record does not fit the column schema.
pub const ERROR_ITEM: &str = "item";
/// Classification input is structurally unusable (e.g. too few bins).
pub const ERROR_STRUCTURE: &str = "structure";
/// Classification input file could not be read.
pub const ERROR_INPUT: &str = "input";
/// I/O error.
pub const ERROR_IO: &str = "io";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
