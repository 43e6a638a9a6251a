//! Rule-table validation: bin usage, duplicate/conflicting coverage,
//! ordering, and reference-data validity.
//!
//! Every check runs independently; findings are advisory and never block
//! matching.

use std::collections::BTreeMap;
use std::ops::Bound;

use rustc_hash::FxHashMap;
use serde::Serialize;
use sortmatrix_core::TABLE_FINGERPRINT_FACTOR;
use tracing::warn;

use crate::pattern;
use crate::reference::ReferenceRegistry;
use crate::rule::{Column, Rule};

/// Route name the sorter uses for rejected material.
const REJECT_ROUTE: &str = "REJECT";

/// Identifies a rule in findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRef {
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    pub line: Option<usize>,
}

impl RuleRef {
    pub fn new(rule: &Rule, position: usize) -> Self {
        Self {
            name: rule.name.clone(),
            position,
            line: rule.line,
        }
    }

    /// Line number if known, else the 1-based position.
    pub fn display_line(&self) -> usize {
        self.line.unwrap_or(self.position + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageKind {
    /// Identical value combination claimed by two routes.
    Duplicate,
    /// Overlapping combinations under wildcard semantics.
    Conflict,
}

/// Two routes claiming the same items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageFinding {
    pub kind: CoverageKind,
    pub first: RuleRef,
    pub second: RuleRef,
    /// First colliding fingerprint of `first`, e.g. `7=DVD*`.
    pub first_fingerprint: String,
    pub second_fingerprint: String,
    /// Colliding fingerprint pairs between the two rules.
    pub occurrences: usize,
}

/// Which cap stopped a rule from being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitScope {
    /// The rule alone exceeds the per-rule cap.
    Rule,
    /// The rule would push the table past its total budget.
    Table,
}

/// A rule whose Cartesian product was too large to expand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpansionLimit {
    pub rule: RuleRef,
    pub combinations: u64,
    pub limit: usize,
    pub scope: LimitScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderingKind {
    /// Rank is higher than the last correctly ordered rule's.
    RankInversion { rank: usize, previous_rank: usize },
    /// An earlier rule accepts every item this rule accepts.
    Shadowed { by: RuleRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderingViolation {
    pub rule: RuleRef,
    pub violation: OrderingKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidToken {
    pub rule: RuleRef,
    pub column: Column,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Rules per route name.
    pub bins: BTreeMap<String, usize>,
    /// Routes set up to reject material.
    pub reject_routes: Vec<RuleRef>,
    pub coverage: Vec<CoverageFinding>,
    pub expansion_limits: Vec<ExpansionLimit>,
    pub ordering: Vec<OrderingViolation>,
    /// `None` when no reference registry was configured.
    pub invalid_tokens: Option<Vec<InvalidToken>>,
}

impl ValidationReport {
    pub fn duplicates(&self) -> impl Iterator<Item = &CoverageFinding> {
        self.coverage
            .iter()
            .filter(|f| f.kind == CoverageKind::Duplicate)
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &CoverageFinding> {
        self.coverage
            .iter()
            .filter(|f| f.kind == CoverageKind::Conflict)
    }

    pub fn is_ordered(&self) -> bool {
        self.ordering.is_empty()
    }

    /// True when no check produced a finding.
    pub fn is_clean(&self) -> bool {
        self.reject_routes.is_empty()
            && self.coverage.is_empty()
            && self.expansion_limits.is_empty()
            && self.ordering.is_empty()
            && self.invalid_tokens.as_ref().is_none_or(Vec::is_empty)
    }
}

/// Run all checks over `rules`.
pub fn validate_rules(
    rules: &[Rule],
    reference: Option<&ReferenceRegistry>,
    max_fingerprints: usize,
) -> ValidationReport {
    let (coverage, expansion_limits) = check_coverage(rules, max_fingerprints);
    let mut ordering = check_rank_order(rules);
    ordering.extend(check_shadowing(rules));
    ordering.sort_by_key(|v| v.rule.position);

    ValidationReport {
        bins: bin_usage(rules),
        reject_routes: rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.name.eq_ignore_ascii_case(REJECT_ROUTE))
            .map(|(i, r)| RuleRef::new(r, i))
            .collect(),
        coverage,
        expansion_limits,
        ordering,
        invalid_tokens: reference
            .filter(|reg| !reg.is_empty())
            .map(|reg| check_reference(rules, reg)),
    }
}

/// Histogram of rules per route name.
pub fn bin_usage(rules: &[Rule]) -> BTreeMap<String, usize> {
    let mut bins = BTreeMap::new();
    for rule in rules {
        *bins.entry(rule.name.clone()).or_insert(0) += 1;
    }
    bins
}

// ── Duplicate / conflict detection ──

/// One concrete value combination a rule covers.
struct Fingerprint {
    key: String,
    patterns: Vec<String>,
    has_wildcard: bool,
}

fn combinations(rule: &Rule, columns: &[Column]) -> u64 {
    columns
        .iter()
        .map(|c| rule.column(*c).len() as u64)
        .fold(1u64, |acc, n| acc.saturating_mul(n))
}

/// Expand the Cartesian product of a rule's constrained columns.
fn fingerprints(rule: &Rule, columns: &[Column]) -> Vec<Fingerprint> {
    let mut tuples: Vec<Vec<String>> = vec![Vec::new()];
    for column in columns {
        let patterns = rule.column(*column).patterns();
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                patterns.iter().map(move |p| {
                    let mut next = prefix.clone();
                    next.push(p.clone());
                    next
                })
            })
            .collect();
    }

    tuples
        .into_iter()
        .map(|patterns| {
            let key = columns
                .iter()
                .zip(&patterns)
                .map(|(c, p)| format!("{}={p}", c.index()))
                .collect::<Vec<_>>()
                .join(".");
            let has_wildcard = patterns.iter().any(|p| pattern::is_wildcard(p));
            Fingerprint {
                key,
                patterns,
                has_wildcard,
            }
        })
        .collect()
}

/// Fingerprints of one column signature, indexed by the literal part of
/// their first pattern so a lookup only visits prefix-related entries.
#[derive(Default)]
struct SignatureIndex {
    entries: Vec<(usize, Fingerprint)>,
    by_head: BTreeMap<String, Vec<usize>>,
    universal: Vec<usize>,
}

impl SignatureIndex {
    fn insert(&mut self, position: usize, fp: Fingerprint) {
        let id = self.entries.len();
        let head = &fp.patterns[0];
        if pattern::is_universal(head) {
            self.universal.push(id);
        } else {
            let stem = pattern::prefix_of(head).unwrap_or(head);
            self.by_head.entry(stem.to_string()).or_default().push(id);
        }
        self.entries.push((position, fp));
    }

    /// Entries whose first pattern may intersect `head`.
    fn candidates(&self, head: &str) -> Vec<usize> {
        if pattern::is_universal(head) {
            return (0..self.entries.len()).collect();
        }
        let mut ids = self.universal.clone();
        let (stem, is_prefix) = match pattern::prefix_of(head) {
            Some(stem) => (stem, true),
            None => (head, false),
        };
        // Shorter prefix patterns and equal stems.
        let cuts = stem
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(std::iter::once(stem.len()));
        for cut in cuts {
            if let Some(found) = self.by_head.get(&stem[..cut]) {
                ids.extend_from_slice(found);
            }
        }
        // Longer stems under a prefix pattern.
        if is_prefix {
            let longer = self
                .by_head
                .range::<str, _>((Bound::Excluded(stem), Bound::Unbounded))
                .take_while(|(key, _)| key.starts_with(stem));
            for (_, found) in longer {
                ids.extend_from_slice(found);
            }
        }
        ids
    }
}

#[derive(Default)]
struct CoverageTally {
    findings: BTreeMap<(usize, usize, CoverageKind), CoverageFinding>,
}

impl CoverageTally {
    fn record(
        &mut self,
        rules: &[Rule],
        kind: CoverageKind,
        (first, first_key): (usize, &str),
        (second, second_key): (usize, &str),
    ) {
        self.findings
            .entry((first, second, kind))
            .and_modify(|f| f.occurrences += 1)
            .or_insert_with(|| CoverageFinding {
                kind,
                first: RuleRef::new(&rules[first], first),
                second: RuleRef::new(&rules[second], second),
                first_fingerprint: first_key.to_string(),
                second_fingerprint: second_key.to_string(),
                occurrences: 1,
            });
    }
}

/// Duplicate and conflict detection over expanded fingerprints.
///
/// Rules above `max_fingerprints` are reported instead of expanded, and so
/// is every rule that would take the table past
/// `max_fingerprints * TABLE_FINGERPRINT_FACTOR` fingerprints in total.
pub fn check_coverage(
    rules: &[Rule],
    max_fingerprints: usize,
) -> (Vec<CoverageFinding>, Vec<ExpansionLimit>) {
    let table_budget = max_fingerprints.saturating_mul(TABLE_FINGERPRINT_FACTOR) as u64;
    let mut expanded: u64 = 0;
    let mut owners: FxHashMap<String, usize> = FxHashMap::default();
    let mut by_signature: FxHashMap<Vec<Column>, SignatureIndex> = FxHashMap::default();
    let mut tally = CoverageTally::default();
    let mut limits = Vec::new();

    for (position, rule) in rules.iter().enumerate() {
        let columns: Vec<Column> = rule.constrained_columns().collect();
        if columns.is_empty() {
            continue;
        }
        let count = combinations(rule, &columns);
        let scope = if count > max_fingerprints as u64 {
            Some((LimitScope::Rule, max_fingerprints))
        } else if expanded.saturating_add(count) > table_budget {
            Some((LimitScope::Table, table_budget as usize))
        } else {
            None
        };
        if let Some((scope, limit)) = scope {
            warn!(
                rule = %rule.name,
                combinations = count,
                limit,
                scope = ?scope,
                "rule too large to expand for duplicate detection"
            );
            limits.push(ExpansionLimit {
                rule: RuleRef::new(rule, position),
                combinations: count,
                limit,
                scope,
            });
            continue;
        }
        expanded += count;

        let index = by_signature.entry(columns.clone()).or_default();
        for fp in fingerprints(rule, &columns) {
            match owners.get(&fp.key) {
                Some(&owner) if rules[owner].name != rule.name => {
                    tally.record(
                        rules,
                        CoverageKind::Duplicate,
                        (owner, &fp.key),
                        (position, &fp.key),
                    );
                }
                Some(_) => {}
                None => {
                    owners.insert(fp.key.clone(), position);
                }
            }

            for id in index.candidates(&fp.patterns[0]) {
                let (other, seen) = &index.entries[id];
                if rules[*other].name == rule.name
                    || seen.key == fp.key
                    || !(seen.has_wildcard || fp.has_wildcard)
                {
                    continue;
                }
                let overlaps = seen
                    .patterns
                    .iter()
                    .zip(&fp.patterns)
                    .all(|(a, b)| pattern::intersects(a, b));
                if overlaps {
                    tally.record(
                        rules,
                        CoverageKind::Conflict,
                        (*other, &seen.key),
                        (position, &fp.key),
                    );
                }
            }
            index.insert(position, fp);
        }
    }

    (tally.findings.into_values().collect(), limits)
}

// ── Ordering ──

/// Flag rules more specific than the last in-order rule before them.
pub fn check_rank_order(rules: &[Rule]) -> Vec<OrderingViolation> {
    let mut violations = Vec::new();
    let mut current = sortmatrix_core::SCHEMA_COLUMNS;
    for (position, rule) in rules.iter().enumerate() {
        let rank = rule.specificity_rank();
        if rank > current {
            violations.push(OrderingViolation {
                rule: RuleRef::new(rule, position),
                violation: OrderingKind::RankInversion {
                    rank,
                    previous_rank: current,
                },
            });
        } else {
            current = rank;
        }
    }
    violations
}

/// Flag rules that can never fire because an earlier route covers them.
pub fn check_shadowing(rules: &[Rule]) -> Vec<OrderingViolation> {
    let mut violations = Vec::new();
    for (position, rule) in rules.iter().enumerate() {
        let shadow = rules[..position]
            .iter()
            .enumerate()
            .find(|(_, earlier)| earlier.name != rule.name && rule.is_covered_by(earlier));
        if let Some((by, earlier)) = shadow {
            violations.push(OrderingViolation {
                rule: RuleRef::new(rule, position),
                violation: OrderingKind::Shadowed {
                    by: RuleRef::new(earlier, by),
                },
            });
        }
    }
    violations
}

// ── Reference validity ──

pub fn check_reference(rules: &[Rule], registry: &ReferenceRegistry) -> Vec<InvalidToken> {
    let mut invalid = Vec::new();
    for (position, rule) in rules.iter().enumerate() {
        for column in registry.checked_columns() {
            for token in rule.column(column).patterns() {
                if !registry.is_known(column, token) {
                    invalid.push(InvalidToken {
                        rule: RuleRef::new(rule, position),
                        column,
                        token: token.clone(),
                    });
                }
            }
        }
    }
    invalid
}
