//! Rule engine: loads an ordered rule table, routes items, and validates
//! the table.

use tracing::{debug, trace, warn};

use sortmatrix_core::DEFAULT_MAX_FINGERPRINTS;

use crate::error::{ItemError, RulesError};
use crate::item::{ItemRecord, MatchOptions, MatchOutcome, MatchResult, MatchedPattern};
use crate::matcher::CompiledRule;
use crate::parser::SkippedLine;
use crate::parser::table::{is_ignorable, parse_rule_line, parse_table};
use crate::reference::ReferenceRegistry;
use crate::rule::{Rule, RuleTable};
use crate::validate::{ValidationReport, validate_rules};

/// A loaded rule table ready for matching and validation.
///
/// Immutable once built; matching and validation only read it.
pub struct RuleEngine {
    table: RuleTable,
    compiled: Vec<CompiledRule>,
    reference: Option<ReferenceRegistry>,
    max_fingerprints: usize,
    skipped: Vec<SkippedLine>,
}

impl RuleEngine {
    /// Route an item. Rules are scanned in order; the first match wins and
    /// an exhausted scan yields the exception bin.
    pub fn match_item(&self, item: &ItemRecord, options: MatchOptions) -> MatchResult {
        for (position, (rule, compiled)) in self.table.iter().zip(&self.compiled).enumerate() {
            if compiled.is_alert() && !options.include_holds {
                continue;
            }
            if let Some(matched) = match_rule(rule, compiled, item, options.explain) {
                if options.explain {
                    debug!(item = item.id(), rule = %rule.name, position, "rule matched");
                }
                return MatchResult {
                    item: item.id().to_string(),
                    outcome: MatchOutcome::Rule {
                        name: rule.name.clone(),
                        bin: rule.bin(),
                        position,
                        line: rule.line,
                    },
                    matched,
                };
            }
        }
        if options.explain {
            debug!(item = item.id(), "no rule matched, exception bin");
        }
        MatchResult {
            item: item.id().to_string(),
            outcome: MatchOutcome::Exception,
            matched: Vec::new(),
        }
    }

    /// Parse a wire record and route it.
    pub fn match_line(&self, line: &str, options: MatchOptions) -> Result<MatchResult, ItemError> {
        let item = ItemRecord::parse(line)?;
        Ok(self.match_item(&item, options))
    }

    /// Route every non-blank line. A bad record fails only its own entry.
    pub fn match_batch<'a, I>(
        &self,
        lines: I,
        options: MatchOptions,
    ) -> Vec<Result<MatchResult, ItemError>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                let result = self.match_line(l, options);
                if let Err(e) = &result {
                    warn!(error = %e, error_type = e.error_type(), "item skipped");
                }
                result
            })
            .collect()
    }

    /// Run every validation check.
    pub fn validate(&self) -> ValidationReport {
        validate_rules(
            self.table.rules(),
            self.reference.as_ref(),
            self.max_fingerprints,
        )
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn rule_count(&self) -> usize {
        self.table.len()
    }

    /// Lines dropped while loading.
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }
}

/// Match one rule, returning the accepting pattern per constrained column.
fn match_rule(
    rule: &Rule,
    compiled: &CompiledRule,
    item: &ItemRecord,
    explain: bool,
) -> Option<Vec<MatchedPattern>> {
    let mut matched = Vec::with_capacity(compiled.columns().len());
    for (column, matcher) in compiled.columns() {
        let value = item.get(*column);
        match matcher.find(value) {
            Some(pattern) => {
                if explain {
                    trace!(rule = %rule.name, column = %column, value, pattern, "column matched");
                }
                matched.push(MatchedPattern {
                    column: *column,
                    pattern: pattern.to_string(),
                });
            }
            None => {
                if explain {
                    trace!(
                        rule = %rule.name,
                        column = %column,
                        value,
                        expected = %rule.column(*column).render(),
                        "column mismatch"
                    );
                }
                return None;
            }
        }
    }
    Some(matched)
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.table.len())
            .field("skipped", &self.skipped.len())
            .field("reference", &self.reference.is_some())
            .finish()
    }
}

// ── Builder ──

/// Builder for a `RuleEngine`: the loading phase of the engine lifecycle.
pub struct RuleEngineBuilder {
    rules: Vec<Rule>,
    skipped: Vec<SkippedLine>,
    lines_read: usize,
    reference: Option<ReferenceRegistry>,
    max_fingerprints: usize,
}

impl RuleEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            skipped: Vec::new(),
            lines_read: 0,
            reference: None,
            max_fingerprints: DEFAULT_MAX_FINGERPRINTS,
        }
    }

    /// Parse and append one persisted rule line.
    ///
    /// Lines are numbered across calls. A malformed line is recorded as
    /// skipped and its error returned; the builder stays usable.
    pub fn load_rule(&mut self, line: &str) -> Result<Option<&Rule>, RulesError> {
        self.lines_read += 1;
        if is_ignorable(line) {
            return Ok(None);
        }
        match parse_rule_line(line, self.lines_read) {
            Ok(rule) => {
                debug!(rule = %rule.name, line = self.lines_read, rank = rule.specificity_rank(), "loaded rule");
                self.rules.push(rule);
                Ok(self.rules.last())
            }
            Err(e) => {
                warn!(line = self.lines_read, error = %e, error_type = e.error_type(), "skipping rule line");
                self.skipped.push(SkippedLine {
                    line: self.lines_read,
                    content: line.to_string(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Load a whole table's text, skipping bad lines.
    pub fn load_table(&mut self, content: &str) -> &mut Self {
        let offset = self.lines_read;
        let (rules, skipped) = parse_table(content);
        self.lines_read += content.lines().count();
        self.rules.extend(rules.into_iter().map(|mut r| {
            r.line = r.line.map(|l| l + offset);
            r
        }));
        self.skipped.extend(skipped.into_iter().map(|mut s| {
            s.line += offset;
            s
        }));
        self
    }

    /// Append an already-built rule, e.g. from the compiler.
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn add_table(&mut self, table: RuleTable) -> &mut Self {
        self.rules.extend(table.into_rules());
        self
    }

    /// Registry used by the reference-validity check.
    pub fn set_reference(&mut self, registry: ReferenceRegistry) -> &mut Self {
        self.reference = Some(registry);
        self
    }

    /// Per-rule cap on expanded fingerprints.
    pub fn set_max_fingerprints(&mut self, limit: usize) -> &mut Self {
        self.max_fingerprints = limit;
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Freeze the loaded rules.
    pub fn build(self) -> Result<RuleEngine, RulesError> {
        if self.rules.is_empty() {
            return Err(RulesError::EmptyTable);
        }
        let compiled = self.rules.iter().map(CompiledRule::new).collect();
        debug!(rules = self.rules.len(), skipped = self.skipped.len(), "rule engine built");
        Ok(RuleEngine {
            table: RuleTable::new(self.rules),
            compiled,
            reference: self.reference,
            max_fingerprints: self.max_fingerprints,
            skipped: self.skipped,
        })
    }
}

impl Default for RuleEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
REJECT|Y|01|*|*|*|*|*|*|*|*|*|*|*|*
R2|*|*|*|*|*|*|CD, DVD*, JCD|*|*|*|*|*|*|*
R3|*|*|*|*|GENERAL, FIC*, PBK*|*|BOOK, PBK|*|*|*|*|*|*|*
R5|*|*|*|*|*|*|BOOK|*|*|*|*|*|*|*
";

    fn engine() -> RuleEngine {
        let mut builder = RuleEngineBuilder::new();
        builder.load_table(TABLE);
        builder.build().unwrap()
    }

    #[test]
    fn first_match_wins() {
        let engine = engine();
        let result = engine
            .match_line("31221|FICGENERAL|EPLMNA|BOOK|Fic|", MatchOptions::default())
            .unwrap();
        assert_eq!(result.rule_name(), Some("R3"));
        assert!(matches!(
            result.outcome,
            MatchOutcome::Rule { bin: Some(3), position: 2, line: Some(3), .. }
        ));
        let patterns: Vec<&str> = result.matched.iter().map(|m| m.pattern.as_str()).collect();
        assert_eq!(patterns, ["FIC*", "BOOK"]);
    }

    #[test]
    fn falls_through_to_later_rule() {
        let result = engine()
            .match_line("1|NONFICTION|EPLMNA|BOOK|", MatchOptions::default())
            .unwrap();
        assert_eq!(result.rule_name(), Some("R5"));
    }

    #[test]
    fn unknown_field_goes_to_exception() {
        let result = engine()
            .match_line("1|FICGENERAL|EPLMNA||", MatchOptions::default())
            .unwrap();
        assert!(result.is_exception());
    }

    #[test]
    fn holds_only_when_requested() {
        let engine = engine();
        let item = ItemRecord::from_columns(["1", "Y", "01", "*", "*", "FICGENERAL", "*", "BOOK"])
            .unwrap();
        let plain = engine.match_item(&item, MatchOptions::default());
        assert_eq!(plain.rule_name(), Some("R3"));
        let holds = engine.match_item(
            &item,
            MatchOptions {
                include_holds: true,
                explain: true,
            },
        );
        assert_eq!(holds.rule_name(), Some("REJECT"));
    }

    #[test]
    fn batch_continues_past_bad_items() {
        let engine = engine();
        let bad = format!("2{}", "|X".repeat(11));
        let lines = ["1|FICGENERAL|EPLMNA|BOOK|", bad.as_str(), "", "3|X|X|CD|"];
        let results = engine.match_batch(lines, MatchOptions::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ItemError::ColumnMismatch { .. })));
        assert_eq!(results[2].as_ref().unwrap().rule_name(), Some("R2"));
    }

    #[test]
    fn load_rule_numbers_lines_and_skips() {
        let mut builder = RuleEngineBuilder::new();
        assert!(builder.load_rule("# header").unwrap().is_none());
        assert!(builder.load_rule("R1|*|*").is_err());
        let rule = builder.load_rule("R1|*|*|*|*|FIC*|*|*|*").unwrap().unwrap();
        assert_eq!(rule.line, Some(3));
        assert_eq!(builder.skipped().len(), 1);
        assert_eq!(builder.skipped()[0].line, 2);
        let engine = builder.build().unwrap();
        assert_eq!(engine.rule_count(), 1);
        assert_eq!(engine.skipped().len(), 1);
    }

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(
            RuleEngineBuilder::new().build(),
            Err(RulesError::EmptyTable)
        ));
    }

    #[test]
    fn deterministic_matching() {
        let engine = engine();
        let line = "9|PBKMYS|EPLSTR|PBK|870.44|";
        let first = engine.match_line(line, MatchOptions::default()).unwrap();
        for _ in 0..10 {
            assert_eq!(engine.match_line(line, MatchOptions::default()).unwrap(), first);
        }
    }
}
