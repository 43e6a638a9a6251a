//! Error types for matrix compilation.

use thiserror::Error;

/// Errors that abort a compilation or an input read.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("only {found} distinct bins identified, at least {min} required")]
    TooFewBins { found: usize, min: usize },

    #[error("bin count {bin_count} is lower than the highest identified bin {highest}")]
    BinCountTooSmall { bin_count: u32, highest: u32 },

    #[error("row {row}: {message}")]
    Input { row: usize, message: String },

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Get the error kind label for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            CompileError::TooFewBins { .. } | CompileError::BinCountTooSmall { .. } => {
                sortmatrix_core::ERROR_STRUCTURE
            }
            CompileError::Io(_) => sortmatrix_core::ERROR_IO,
            _ => sortmatrix_core::ERROR_INPUT,
        }
    }
}
