//! Rule model: the positional column schema, per-column OR constraints, and
//! the ordered rule table.

use std::fmt;

use serde::Serialize;
use sortmatrix_core::{FIELD_SEPARATOR, LIST_SEPARATOR, SCHEMA_COLUMNS, WILDCARD};

use crate::pattern;

/// Positional columns shared by rule lines and item records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Column {
    /// Rule name on a rule line, item id on an item record.
    SortRoute,
    Alert,
    AlertType,
    MagneticMedia,
    MediaType,
    PermanentLocation,
    DestinationLocation,
    /// Item type.
    CollectionCode,
    CallNumber,
    SortBin,
    BranchId,
    LibraryId,
    CheckinResult,
    CustomTagData,
    DetectionSource,
}

impl Column {
    pub const ALL: [Column; SCHEMA_COLUMNS] = [
        Column::SortRoute,
        Column::Alert,
        Column::AlertType,
        Column::MagneticMedia,
        Column::MediaType,
        Column::PermanentLocation,
        Column::DestinationLocation,
        Column::CollectionCode,
        Column::CallNumber,
        Column::SortBin,
        Column::BranchId,
        Column::LibraryId,
        Column::CheckinResult,
        Column::CustomTagData,
        Column::DetectionSource,
    ];

    /// Columns a rule may constrain (everything but the route).
    pub fn constrained() -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().skip(1)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::SortRoute => "SortRoute",
            Column::Alert => "Alert",
            Column::AlertType => "AlertType",
            Column::MagneticMedia => "MagneticMedia",
            Column::MediaType => "MediaType",
            Column::PermanentLocation => "PermanentLocation",
            Column::DestinationLocation => "DestinationLocation",
            Column::CollectionCode => "CollectionCode",
            Column::CallNumber => "CallNumber",
            Column::SortBin => "SortBin",
            Column::BranchId => "BranchID",
            Column::LibraryId => "LibraryID",
            Column::CheckinResult => "CheckinResult",
            Column::CustomTagData => "CustomTagData",
            Column::DetectionSource => "DetectionSource",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An OR-set of patterns for one column. An empty set, or one containing
/// `*`, places no constraint on the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnConstraint {
    patterns: Vec<String>,
}

impl ColumnConstraint {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// A constraint with no patterns (matches anything).
    pub fn any() -> Self {
        Self::default()
    }

    /// The explicit universal wildcard `*`.
    pub fn wildcard() -> Self {
        Self {
            patterns: vec![WILDCARD.to_string()],
        }
    }

    /// Parse a field such as `CD, DVD*,JCD`. Blank fields become `*`.
    pub fn parse(field: &str) -> Self {
        let patterns: Vec<String> = field
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if patterns.is_empty() {
            Self::wildcard()
        } else {
            Self { patterns }
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn patterns_mut(&mut self) -> &mut Vec<String> {
        &mut self.patterns
    }

    pub fn push(&mut self, pattern: impl Into<String>) {
        self.patterns.push(pattern.into());
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when the column places no constraint.
    pub fn is_any(&self) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| pattern::is_universal(p))
    }

    /// The first pattern accepting `value`.
    pub fn matched_pattern(&self, value: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| pattern::matches(p, value))
            .map(String::as_str)
    }

    pub fn matches(&self, value: &str) -> bool {
        self.is_any() || self.matched_pattern(value).is_some()
    }

    /// True when every value accepted by `other` is accepted by `self`.
    pub fn covers(&self, other: &ColumnConstraint) -> bool {
        if self.is_any() {
            return true;
        }
        if other.is_any() {
            return false;
        }
        other
            .patterns
            .iter()
            .all(|inner| self.patterns.iter().any(|outer| pattern::covers(outer, inner)))
    }

    /// Render as a persisted field (`*` or a comma-joined list).
    pub fn render(&self) -> String {
        if self.is_any() {
            WILDCARD.to_string()
        } else {
            self.patterns.join(",")
        }
    }
}

/// A named rule routing matching items to one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Route name such as `R5` or `REJECT`.
    pub name: String,
    /// Indexed by [`Column::index`]; the route slot is never consulted.
    pub columns: [ColumnConstraint; SCHEMA_COLUMNS],
    /// Catalog items this rule was compiled from.
    pub affected_count: u64,
    /// Severity of a hold/alert rule; higher sorts earlier.
    pub alert_priority: Option<u8>,
    pub score: f64,
    /// Source line in a persisted table.
    pub line: Option<usize>,
}

impl Rule {
    /// A rule with every column unconstrained.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: std::array::from_fn(|_| ColumnConstraint::any()),
            affected_count: 0,
            alert_priority: None,
            score: 0.0,
            line: None,
        }
    }

    pub fn with_column(mut self, column: Column, constraint: ColumnConstraint) -> Self {
        self.columns[column.index()] = constraint;
        self
    }

    pub fn column(&self, column: Column) -> &ColumnConstraint {
        &self.columns[column.index()]
    }

    pub fn column_mut(&mut self, column: Column) -> &mut ColumnConstraint {
        &mut self.columns[column.index()]
    }

    /// Hold/alert rules carry a non-wildcard alert flag.
    pub fn is_alert(&self) -> bool {
        !self.column(Column::Alert).is_any()
    }

    /// Columns carrying a real constraint.
    pub fn constrained_columns(&self) -> impl Iterator<Item = Column> + '_ {
        Column::constrained().filter(|c| !self.column(*c).is_any())
    }

    /// Count of non-wildcard columns; alert rules rank highest.
    pub fn specificity_rank(&self) -> usize {
        if self.is_alert() {
            SCHEMA_COLUMNS
        } else {
            self.constrained_columns().count()
        }
    }

    /// Bin number for routes named `R<n>`.
    pub fn bin(&self) -> Option<u32> {
        self.name.strip_prefix('R')?.parse().ok()
    }

    /// True when every item this rule accepts is accepted by `other`.
    pub fn is_covered_by(&self, other: &Rule) -> bool {
        Column::constrained().all(|c| other.column(c).covers(self.column(c)))
    }

    /// Serialize to one persisted rule-table line.
    pub fn to_line(&self) -> String {
        let mut fields = Vec::with_capacity(SCHEMA_COLUMNS);
        fields.push(self.name.clone());
        fields.extend(Column::constrained().map(|c| self.column(c).render()));
        fields.join(&FIELD_SEPARATOR.to_string())
    }
}

/// Ordered rules; the first match wins and anything unmatched goes to the
/// exception bin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    /// Render in the persisted line format, prefixed by `#` comment lines.
    pub fn render(&self, header: &[String]) -> String {
        let mut out = String::new();
        for line in header {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
        for rule in &self.rules {
            out.push_str(&rule.to_line());
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
