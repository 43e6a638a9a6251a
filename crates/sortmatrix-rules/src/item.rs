//! Item records and match results.

use serde::Serialize;
use sortmatrix_core::{FIELD_SEPARATOR, SCHEMA_COLUMNS, WILDCARD};

use crate::error::ItemError;
use crate::rule::Column;

/// Raw item fields that land at [`Column::PermanentLocation`] onwards.
const ITEM_FIELD_OFFSET: usize = 5;

/// An item expanded to the full positional schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    fields: [String; SCHEMA_COLUMNS],
}

impl ItemRecord {
    /// Parse a wire record: `id|location|destination|type|callnum|...`.
    ///
    /// The id lands in the route column, the alert and media columns are
    /// unknown (`*`), and the remaining fields fill the schema from the
    /// permanent location onwards.
    pub fn parse(line: &str) -> Result<Self, ItemError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ItemError::Empty);
        }
        let line = line.strip_suffix(FIELD_SEPARATOR).unwrap_or(line);
        let mut raw = line.split(FIELD_SEPARATOR).map(str::trim);
        let id = raw.next().unwrap_or_default();
        if id.is_empty() {
            return Err(ItemError::Empty);
        }

        let rest: Vec<&str> = raw.collect();
        let found = ITEM_FIELD_OFFSET + rest.len();
        if found > SCHEMA_COLUMNS {
            return Err(ItemError::ColumnMismatch {
                item: id.to_string(),
                found,
                expected: SCHEMA_COLUMNS,
            });
        }

        let mut fields: [String; SCHEMA_COLUMNS] = std::array::from_fn(|_| WILDCARD.to_string());
        fields[0] = id.to_string();
        for (slot, value) in fields[ITEM_FIELD_OFFSET..].iter_mut().zip(rest) {
            if !value.is_empty() {
                *slot = value.to_string();
            }
        }
        Ok(Self { fields })
    }

    /// Build from an already full-width record, e.g. to exercise alert columns.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, ItemError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = columns.into_iter().map(Into::into).collect();
        let id = values.first().map(|v| v.trim().to_string()).unwrap_or_default();
        if id.is_empty() {
            return Err(ItemError::Empty);
        }
        if values.len() > SCHEMA_COLUMNS {
            return Err(ItemError::ColumnMismatch {
                item: id,
                found: values.len(),
                expected: SCHEMA_COLUMNS,
            });
        }
        let mut fields: [String; SCHEMA_COLUMNS] = std::array::from_fn(|_| WILDCARD.to_string());
        for (slot, value) in fields.iter_mut().zip(values) {
            let value = value.trim();
            if !value.is_empty() {
                *slot = value.to_string();
            }
        }
        Ok(Self { fields })
    }

    pub fn id(&self) -> &str {
        &self.fields[0]
    }

    pub fn get(&self, column: Column) -> &str {
        &self.fields[column.index()]
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        self.fields[column.index()] = value.into();
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// Per-call matching switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// Evaluate hold/alert rules instead of skipping them.
    pub include_holds: bool,
    /// Trace every column comparison.
    pub explain: bool,
}

/// Where an item ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    Rule {
        name: String,
        bin: Option<u32>,
        /// Zero-based position in the table.
        position: usize,
        line: Option<usize>,
    },
    /// Nothing matched; the item goes to the exception bin.
    Exception,
}

/// Pattern that accepted one item column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPattern {
    pub column: Column,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub item: String,
    pub outcome: MatchOutcome,
    pub matched: Vec<MatchedPattern>,
}

impl MatchResult {
    pub fn rule_name(&self) -> Option<&str> {
        match &self.outcome {
            MatchOutcome::Rule { name, .. } => Some(name),
            MatchOutcome::Exception => None,
        }
    }

    pub fn is_exception(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Exception)
    }

    /// One-line summary, e.g. `31221 -> bin 3 (R3, line 4) matched on [PermanentLocation=FIC*]`.
    pub fn summary(&self) -> String {
        match &self.outcome {
            MatchOutcome::Rule {
                name, bin, line, ..
            } => {
                let bin = bin.map_or_else(|| name.clone(), |b| b.to_string());
                let line = line.map_or_else(String::new, |l| format!(", line {l}"));
                let matched: Vec<String> = self
                    .matched
                    .iter()
                    .map(|m| format!("{}={}", m.column, m.pattern))
                    .collect();
                format!(
                    "{} -> bin {bin} ({name}{line}) matched on [{}]",
                    self.item,
                    matched.join(", ")
                )
            }
            MatchOutcome::Exception => format!("{} -> bin E no rule matches", self.item),
        }
    }
}
