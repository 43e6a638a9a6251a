//! Parsers for the persisted rule-table format.

pub mod table;

pub use table::{SkippedLine, normalize_screen_scrape, parse_rule_line, parse_table};
