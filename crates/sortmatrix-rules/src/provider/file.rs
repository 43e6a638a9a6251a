//! File-based provider.

use std::path::Path;

use crate::engine::RuleEngineBuilder;
use crate::error::RulesError;
use crate::parser::table::is_ignorable;

/// Provider that loads tables and item streams from local files.
pub struct FileProvider;

impl FileProvider {
    /// Load a persisted rule table into a fresh builder.
    pub fn load_table(path: &Path) -> Result<RuleEngineBuilder, RulesError> {
        let content = std::fs::read_to_string(path)?;
        let mut builder = RuleEngineBuilder::new();
        builder.load_table(&content);
        tracing::info!(
            path = %path.display(),
            rules = builder.rule_count(),
            skipped = builder.skipped().len(),
            "loaded rule table"
        );
        Ok(builder)
    }

    /// Read item wire records, one per non-blank line.
    pub fn load_items(path: &Path) -> Result<Vec<String>, RulesError> {
        let content = std::fs::read_to_string(path)?;
        Ok(content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Read a reference code list: one code per line, `#` comments allowed.
    /// Comma-separated lines are split.
    pub fn load_reference(path: &Path) -> Result<Vec<String>, RulesError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse_reference(&content))
    }

    pub fn parse_reference(content: &str) -> Vec<String> {
        content
            .lines()
            .filter(|l| !is_ignorable(l))
            .flat_map(|l| l.split(','))
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_reference_list() {
        let codes = FileProvider::parse_reference("# locations\nFICGENERAL\n\nNONFICTION, JUVPIC\n");
        assert_eq!(codes, ["FICGENERAL", "NONFICTION", "JUVPIC"]);
    }

    #[test]
    fn load_table_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# compiled").unwrap();
        writeln!(file, "R1|*|*|*|*|FIC*|*|*|*").unwrap();
        writeln!(file, "bad line").unwrap();
        let builder = FileProvider::load_table(file.path()).unwrap();
        assert_eq!(builder.rule_count(), 1);
        assert_eq!(builder.skipped().len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FileProvider::load_items(Path::new("/nonexistent/items.txt")).unwrap_err();
        assert!(matches!(err, RulesError::Io(_)));
        assert_eq!(err.error_type(), sortmatrix_core::ERROR_IO);
    }
}
