//! Sort-matrix rule engine.
//!
//! Loads an ordered table of routing rules for a library materials sorter,
//! routes item records to bins, and validates the table.
//!
//! # Architecture
//!
//! - **Patterns**: literal, prefix-wildcard (`FIC*`) and universal (`*`)
//! - **Rule model**: 15 positional columns, each an OR-list of patterns
//! - **Parser**: pipe-delimited table lines and screen-scraped web config
//! - **Matchers**: per-column `FxHashSet` literals plus prefix scan
//! - **Engine**: first match wins; no match means the exception bin
//! - **Validation**: bin usage, duplicate/conflict fingerprints, ordering,
//!   reference validity
//!
//! # Example
//!
//! ```
//! use sortmatrix_rules::{MatchOptions, RuleEngineBuilder};
//!
//! let mut builder = RuleEngineBuilder::new();
//! builder.load_table("\
//! R2|*|*|*|*|*|*|CD,DVD*|*
//! R3|*|*|*|*|FIC*|*|BOOK|*
//! ");
//! let engine = builder.build().unwrap();
//!
//! let result = engine
//!     .match_line("31221|FICGENERAL|EPLMNA|BOOK|", MatchOptions::default())
//!     .unwrap();
//! assert_eq!(result.rule_name(), Some("R3"));
//!
//! let miss = engine
//!     .match_line("31222|NONFICTION|EPLMNA|BOOK|", MatchOptions::default())
//!     .unwrap();
//! assert!(miss.is_exception());
//! ```

pub mod engine;
pub mod error;
pub mod item;
pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod provider;
pub mod reference;
pub mod rule;
pub mod validate;

pub use engine::{RuleEngine, RuleEngineBuilder};
pub use error::{ItemError, RulesError};
pub use item::{ItemRecord, MatchOptions, MatchOutcome, MatchResult, MatchedPattern};
pub use parser::{SkippedLine, parse_table};
pub use provider::FileProvider;
pub use reference::ReferenceRegistry;
pub use rule::{Column, ColumnConstraint, Rule, RuleTable};
pub use validate::{CoverageKind, LimitScope, OrderingKind, RuleRef, ValidationReport};
