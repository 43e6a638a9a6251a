//! Configuration file loading and error types.

use std::{fs, path::Path};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format '{0}'")]
    UnsupportedFormat(String),
    #[error("validation: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Get the error kind label for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => sortmatrix_core::ERROR_IO,
            _ => sortmatrix_core::ERROR_CONFIG,
        }
    }
}

/// Config file syntaxes, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json` or `.jsonc`; comments are stripped before parsing.
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "json" | "jsonc" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }
}

/// Parse config text in the given syntax.
pub fn parse_config(data: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let config = match format {
        ConfigFormat::Json => {
            serde_json::from_reader(json_comments::StripComments::new(data.as_bytes()))?
        }
        ConfigFormat::Yaml => serde_yaml::from_str(data)?,
        ConfigFormat::Toml => toml::from_str(data)?,
    };
    Ok(config)
}

/// Read and parse a config file. The format is checked before the file is
/// read.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    parse_config(&fs::read_to_string(path)?, format)
}

/// Load the config file if one was given, otherwise use defaults.
///
/// An explicitly named file that does not exist is still an error.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}
