//! Error types for the rule engine.

use thiserror::Error;

/// Errors that can occur while loading a rule table.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("line {line}: expected at least {min} fields, found {found}")]
    TooFewColumns {
        line: usize,
        found: usize,
        min: usize,
    },

    #[error("line {line}: expected at most {max} fields, found {found}")]
    TooManyColumns {
        line: usize,
        found: usize,
        max: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rule table is empty")]
    EmptyTable,
}

impl RulesError {
    /// Get the error kind label for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            RulesError::Io(_) => sortmatrix_core::ERROR_IO,
            _ => sortmatrix_core::ERROR_PARSE,
        }
    }
}

/// Errors for a single item record. These never abort a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("empty item record")]
    Empty,

    #[error("item {item}: expands to {found} columns, schema has {expected}")]
    ColumnMismatch {
        item: String,
        found: usize,
        expected: usize,
    },
}

impl ItemError {
    /// Get the error kind label for logging.
    pub fn error_type(&self) -> &'static str {
        sortmatrix_core::ERROR_ITEM
    }
}
