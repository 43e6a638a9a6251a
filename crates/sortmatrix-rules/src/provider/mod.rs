//! Providers for loading tables, item streams and reference lists.

pub mod file;

pub use file::FileProvider;
