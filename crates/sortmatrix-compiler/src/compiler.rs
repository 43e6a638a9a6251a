//! The matrix compiler: partition, group, check bins, compress, order and
//! inject default rules.

use sortmatrix_config::{CompilerConfig, HoldRuleConfig};
use sortmatrix_core::{
    DEFAULT_COMPRESSION_LEVEL, DEFAULT_DENY_LOCATIONS, DEFAULT_HOLD_RULES,
    DEFAULT_INJECT_DEFAULT_RULES,
};
use sortmatrix_rules::{Column, ColumnConstraint, Rule, RuleTable, pattern};
use tracing::{debug, info, warn};

use crate::bins::BinRegistry;
use crate::builder::{RuleAccumulator, RuleSetBuilder, route_name};
use crate::error::CompileError;
use crate::input::ClassificationInput;
use crate::order::{insert_before_single_column, order_rules, score};
use crate::record::{BinAssignment, ClassificationRecord};
use crate::report::{CompilationReport, MalformedBin};

/// A hold/alert rule placed ahead of every destination rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldRule {
    pub route: String,
    pub alert: String,
    pub alert_type: String,
    pub severity: u8,
}

impl HoldRule {
    fn to_rule(&self) -> Rule {
        let mut rule = Rule::new(&self.route)
            .with_column(Column::Alert, ColumnConstraint::parse(&self.alert))
            .with_column(Column::AlertType, ColumnConstraint::parse(&self.alert_type));
        rule.alert_priority = Some(self.severity);
        rule
    }
}

impl From<&HoldRuleConfig> for HoldRule {
    fn from(c: &HoldRuleConfig) -> Self {
        Self {
            route: c.route.clone(),
            alert: c.alert.clone(),
            alert_type: c.alert_type.clone(),
            severity: c.severity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    pub compression_level: i32,
    /// Inject hold rules and the deny-list rule.
    pub default_rules: bool,
    /// Physical bin count; inferred from the highest bin when unset.
    pub bin_count: Option<u32>,
    /// Library or branch code written to the table header.
    pub library: Option<String>,
    pub deny_locations: Vec<String>,
    pub hold_rules: Vec<HoldRule>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            default_rules: DEFAULT_INJECT_DEFAULT_RULES,
            bin_count: None,
            library: None,
            deny_locations: DEFAULT_DENY_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            hold_rules: DEFAULT_HOLD_RULES
                .iter()
                .map(|(route, alert, alert_type, severity)| HoldRule {
                    route: route.to_string(),
                    alert: alert.to_string(),
                    alert_type: alert_type.to_string(),
                    severity: *severity,
                })
                .collect(),
        }
    }
}

impl From<&CompilerConfig> for CompilerOptions {
    fn from(c: &CompilerConfig) -> Self {
        Self {
            compression_level: c.compression_level,
            default_rules: c.default_rules,
            bin_count: c.bin_count,
            library: c.library.clone(),
            deny_locations: c.deny_locations.clone(),
            hold_rules: c.hold_rules.iter().map(HoldRule::from).collect(),
        }
    }
}

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub table: RuleTable,
    pub report: CompilationReport,
    pub library: Option<String>,
    pub compression_level: i32,
}

impl Compilation {
    /// The table in its persisted form with a `#` header.
    pub fn render(&self) -> String {
        let mut header = Vec::new();
        if let Some(library) = &self.library {
            header.push(format!("library: {library}"));
        }
        header.push(format!("compression level: {}", self.compression_level));
        header.push(format!("exception bin: {}", self.report.layout.exception));
        self.table.render(&header)
    }
}

pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    fn is_denied(&self, location: &str) -> bool {
        let location = location.trim();
        self.options
            .deny_locations
            .iter()
            .any(|p| pattern::matches(p, location))
    }

    /// Compile classification records into an ordered rule table.
    ///
    /// Fails only when fewer than the minimum number of bins are identified
    /// or the configured bin count is too small; bad rows are reported.
    pub fn compile(&self, records: &[ClassificationRecord]) -> Result<Compilation, CompileError> {
        let opts = &self.options;
        let mut registry = BinRegistry::default();
        let mut builder = RuleSetBuilder::default();
        let mut denied = RuleAccumulator::default();

        let mut handled_records = 0;
        let mut handled_items = 0;
        let mut unhandled_records = 0;
        let mut unhandled_items = 0;
        let mut malformed = Vec::new();
        let mut malformed_items = 0;

        for record in records {
            match record.assignment() {
                BinAssignment::Unassigned => {
                    unhandled_records += 1;
                    unhandled_items += record.count;
                }
                BinAssignment::Malformed(value) => {
                    warn!(row = record.row, value = %value, count = record.count, "malformed bin assignment");
                    malformed_items += record.count;
                    malformed.push(MalformedBin {
                        row: record.row,
                        value,
                        count: record.count,
                    });
                }
                BinAssignment::Bin(bin) => {
                    registry.record(bin);
                    handled_records += 1;
                    handled_items += record.count;
                    if opts.default_rules && self.is_denied(&record.location) {
                        debug!(row = record.row, location = %record.location, "deny-list location");
                        denied.add(record);
                    } else {
                        builder.add(bin, record);
                    }
                }
            }
        }

        let layout = registry.layout(opts.bin_count)?;
        let gaps = registry.gaps();
        for gap in &gaps {
            warn!(bin = gap, "no records assigned to bin");
        }

        let mut rules = builder.finish(opts.compression_level);
        if opts.default_rules {
            rules.extend(opts.hold_rules.iter().map(HoldRule::to_rule));
        }
        order_rules(&mut rules);

        let denied_items = denied.affected_count();
        if opts.default_rules && denied.records() > 0 && denied_items > 0 {
            let mut rule = Rule::new(route_name(layout.exception)).with_column(
                Column::PermanentLocation,
                ColumnConstraint::new(opts.deny_locations.clone()),
            );
            rule.affected_count = denied_items;
            rule.score = score(&rule);
            insert_before_single_column(&mut rules, rule);
        }

        for (position, rule) in rules.iter().enumerate() {
            debug!(
                position,
                rule = %rule.name,
                rank = rule.specificity_rank(),
                score = rule.score,
                items = rule.affected_count,
                "compiled rule"
            );
        }

        let report = CompilationReport {
            rule_count: rules.len(),
            handled_records,
            handled_items,
            unhandled_records,
            unhandled_items,
            malformed,
            malformed_items,
            denied_items,
            bins: registry.counts().clone(),
            layout,
            gaps,
            rejected_rows: Vec::new(),
        };
        info!(
            rules = report.rule_count,
            covered = report.percent_covered(),
            exception = report.percent_exception(),
            "compilation complete"
        );

        Ok(Compilation {
            table: RuleTable::new(rules),
            report,
            library: opts.library.clone(),
            compression_level: opts.compression_level,
        })
    }

    /// Compile a file's records and carry its unreadable rows into the
    /// report.
    pub fn compile_input(&self, input: &ClassificationInput) -> Result<Compilation, CompileError> {
        let mut compilation = self.compile(&input.records)?;
        compilation.report.rejected_rows = input.rejected.clone();
        Ok(compilation)
    }
}

/// Compile with default options at `compression_level`.
pub fn compile(
    records: &[ClassificationRecord],
    compression_level: i32,
) -> Result<Compilation, CompileError> {
    Compiler::new(CompilerOptions {
        compression_level,
        ..CompilerOptions::default()
    })
    .compile(records)
}
