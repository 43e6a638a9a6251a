//! Configuration validation logic.

use crate::Config;
use crate::loader::ConfigError;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if let Some(bins) = config.compiler.bin_count
        && (bins as usize) < sortmatrix_core::MIN_BINS
    {
        return Err(ConfigError::Validation(format!(
            "compiler.bin_count must be >= {}",
            sortmatrix_core::MIN_BINS
        )));
    }
    if config
        .compiler
        .deny_locations
        .iter()
        .any(|loc| loc.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "compiler.deny_locations contains an empty entry".into(),
        ));
    }
    for hold in &config.compiler.hold_rules {
        if hold.route.trim().is_empty() {
            return Err(ConfigError::Validation(
                "compiler.hold_rules: route is empty".into(),
            ));
        }
        if hold.alert.trim().is_empty() || hold.alert == sortmatrix_core::WILDCARD {
            return Err(ConfigError::Validation(format!(
                "compiler.hold_rules: route '{}' needs a non-wildcard alert flag",
                hold.route
            )));
        }
    }
    if config.engine.max_fingerprints == 0 {
        return Err(ConfigError::Validation(
            "engine.max_fingerprints must be > 0".into(),
        ));
    }
    if let Some(format) = config.logging.format.as_deref()
        && !["json", "pretty", "compact"].contains(&format)
    {
        return Err(ConfigError::Validation(
            "logging.format must be one of: json, pretty, compact".into(),
        ));
    }
    if let Some(output) = config.logging.output.as_deref()
        && output != "stdout"
        && output != "stderr"
    {
        return Err(ConfigError::Validation(
            "logging.output must be 'stdout' or 'stderr'".into(),
        ));
    }
    Ok(())
}
