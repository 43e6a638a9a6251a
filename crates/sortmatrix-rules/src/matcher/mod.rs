//! Compiled matchers used by the engine's hot path.

pub mod column;

pub use column::{ColumnMatcher, CompiledRule};
