//! # sortmatrix
//!
//! Rule compiler and emulator for automated library materials sorters.
//!
//! ## Crates
//!
//! - [`sortmatrix_core`] - Shared constants and error labels
//! - [`sortmatrix_config`] - Configuration loading and validation
//! - [`sortmatrix_rules`] - Rule model, matcher and rule engine
//! - [`sortmatrix_compiler`] - Classification sheet to rule table compiler
//! - [`sortmatrix_emulator`] - Table validation and bin prediction

pub use sortmatrix_compiler as compiler;
pub use sortmatrix_config as config;
pub use sortmatrix_core as core;
pub use sortmatrix_emulator as emulator;
pub use sortmatrix_rules as rules;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use sortmatrix_compiler::{ClassificationRecord, Compilation, Compiler, CompilerOptions, compile};
    pub use sortmatrix_config::{Config, load_config, validate_config};
    pub use sortmatrix_rules::{ItemRecord, MatchOptions, RuleEngine, RuleEngineBuilder, RuleTable};
}
