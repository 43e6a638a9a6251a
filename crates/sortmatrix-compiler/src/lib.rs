//! Sort-matrix compiler.
//!
//! Turns staff bin assignments (item counts per location/item-type pair)
//! into an ordered, deduplicated rule table for the materials sorter:
//!
//! 1. partition records into assigned, unassigned and malformed
//! 2. group assigned records per bin, diverting deny-list locations
//! 3. check that enough bins were identified and derive the exception bin
//! 4. compress location and item-type lists with prefix wildcards
//! 5. order by alert severity, specificity and score
//! 6. add the deny-list rule ahead of rules that leave the location open
//!
//! # Example
//!
//! ```
//! use sortmatrix_compiler::{ClassificationRecord, compile};
//!
//! let records = vec![
//!     ClassificationRecord::new(1250, "TEENFIC", "COMICBOOK", "2"),
//!     ClassificationRecord::new(900, "TEENFIC", "COMICBOOK", "2"),
//!     ClassificationRecord::new(400, "FICGENERAL", "BOOK", "1"),
//!     ClassificationRecord::new(75, "CD", "CD", "3"),
//! ];
//! let compilation = compile(&records, 0).unwrap();
//! let r2 = compilation.table.iter().find(|r| r.name == "R2").unwrap();
//! assert_eq!(r2.affected_count, 2150);
//! assert_eq!(compilation.report.layout.exception, 3);
//! ```

pub mod bins;
pub mod builder;
pub mod cli;
pub mod compiler;
pub mod compress;
pub mod error;
pub mod input;
pub mod order;
pub mod record;
pub mod report;

pub use bins::{BinLayout, BinRegistry};
pub use cli::CompileArgs;
pub use compiler::{Compilation, Compiler, CompilerOptions, HoldRule, compile};
pub use compress::compress;
pub use error::CompileError;
pub use input::{ClassificationInput, read_csv, read_csv_from, read_records, read_spreadsheet};
pub use record::{BinAssignment, ClassificationRecord};
pub use report::{CompilationReport, MalformedBin, RejectedRow};
