//! Configuration loading and CLI definitions.
//!
//! A single file (JSON/JSONC, YAML or TOML) configures the compiler, the
//! emulator and logging. Every field has a default, so an absent file is
//! equivalent to an empty one.

mod cli;
mod defaults;
mod loader;
mod logging;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, ConfigFormat, load_config, load_or_default, parse_config};
pub use logging::init_tracing;
pub use types::*;
pub use validate::validate_config;
