//! Per-column matcher.
//!
//! - Literals live in an `FxHashSet` (O(1) lookup)
//! - Prefix wildcards are scanned linearly; lists are short in practice
//! - `*` short-circuits to an unconstrained column

use rustc_hash::FxHashSet;
use sortmatrix_core::WILDCARD;

use crate::pattern;
use crate::rule::{Column, ColumnConstraint, Rule};

/// Compiled form of a [`ColumnConstraint`].
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    literals: FxHashSet<String>,
    /// `(pattern, prefix)` pairs, e.g. `("FIC*", "FIC")`.
    prefixes: Vec<(String, String)>,
    any: bool,
}

impl ColumnMatcher {
    pub fn new(constraint: &ColumnConstraint) -> Self {
        let mut literals = FxHashSet::default();
        let mut prefixes = Vec::new();
        let mut any = constraint.is_empty();
        for p in constraint.patterns() {
            if p.is_empty() {
                continue;
            }
            if pattern::is_universal(p) {
                any = true;
            } else if let Some(prefix) = pattern::prefix_of(p) {
                prefixes.push((p.clone(), prefix.to_string()));
            } else {
                literals.insert(p.clone());
            }
        }
        Self {
            literals,
            prefixes,
            any,
        }
    }

    pub fn is_any(&self) -> bool {
        self.any
    }

    /// The pattern accepting `value`, if any.
    pub fn find<'a>(&'a self, value: &'a str) -> Option<&'a str> {
        if self.any {
            return Some(WILDCARD);
        }
        if value == WILDCARD {
            return None;
        }
        if let Some(hit) = self.literals.get(value) {
            return Some(hit.as_str());
        }
        self.prefixes
            .iter()
            .find(|(_, prefix)| value.starts_with(prefix.as_str()))
            .map(|(full, _)| full.as_str())
    }

    pub fn matches(&self, value: &str) -> bool {
        self.find(value).is_some()
    }
}

/// A rule with matchers for its constrained columns only.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    columns: Vec<(Column, ColumnMatcher)>,
    alert: bool,
}

impl CompiledRule {
    pub fn new(rule: &Rule) -> Self {
        let columns = Column::constrained()
            .map(|c| (c, ColumnMatcher::new(rule.column(c))))
            .filter(|(_, m)| !m.is_any())
            .collect();
        Self {
            columns,
            alert: rule.is_alert(),
        }
    }

    pub fn is_alert(&self) -> bool {
        self.alert
    }

    pub fn columns(&self) -> &[(Column, ColumnMatcher)] {
        &self.columns
    }
}
