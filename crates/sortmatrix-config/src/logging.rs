//! Tracing subscriber setup shared by the sortmatrix binaries.

use std::io;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::LoggingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_config(config: &LoggingConfig) -> Self {
        match config.format.as_deref() {
            Some("json") => LogFormat::Json,
            Some("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// `level[,module=level...]` for the env filter.
fn filter_directives(config: &LoggingConfig) -> String {
    let base = config.level.as_deref().unwrap_or("info");
    config
        .filters
        .iter()
        .fold(base.to_string(), |mut acc, (module, level)| {
            acc.push_str(&format!(",{module}={level}"));
            acc
        })
}

fn writer(config: &LoggingConfig) -> BoxMakeWriter {
    match config.output.as_deref() {
        Some("stdout") => BoxMakeWriter::new(io::stdout),
        _ => BoxMakeWriter::new(io::stderr),
    }
}

fn format_layer(config: &LoggingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer().with_writer(writer(config));
    match LogFormat::from_config(config) {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.boxed(),
    }
}

/// Install the global subscriber: `level` plus per-module `filters`, in
/// `format` (json, compact, pretty; default pretty) to `output` (stdout or
/// stderr; default stderr).
///
/// A subscriber that is already installed is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(format_layer(config))
        .with(filter)
        .try_init();
}
