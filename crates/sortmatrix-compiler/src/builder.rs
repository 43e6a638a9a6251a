//! Per-bin accumulators for the grouping phase.

use std::collections::BTreeMap;

use sortmatrix_rules::{Column, ColumnConstraint, Rule};

use crate::compress::compress;
use crate::order::score;
use crate::record::ClassificationRecord;

/// Patterns and counts gathered for one route while records are folded in.
#[derive(Debug, Clone, Default)]
pub struct RuleAccumulator {
    locations: Vec<String>,
    item_types: Vec<String>,
    call_numbers: Vec<String>,
    affected_count: u64,
    records: usize,
    /// Records folded in without a call number.
    open_records: usize,
}

impl RuleAccumulator {
    pub fn add(&mut self, record: &ClassificationRecord) {
        push_value(&mut self.locations, &record.location);
        push_value(&mut self.item_types, &record.item_type);
        match record.call_number.as_deref().map(str::trim) {
            Some(call_number) if !call_number.is_empty() => {
                self.call_numbers.push(call_number.to_string());
            }
            _ => self.open_records += 1,
        }
        self.affected_count += record.count;
        self.records += 1;
    }

    pub fn affected_count(&self) -> u64 {
        self.affected_count
    }

    pub fn records(&self) -> usize {
        self.records
    }

    /// Freeze into a rule: compress location and item-type lists, keep call
    /// numbers as given, and leave empty columns as `*`.
    ///
    /// The call-number column is only constrained when every record carries
    /// one; otherwise the records without one would lose their bin.
    pub fn finish(self, name: impl Into<String>, compression_level: i32) -> Rule {
        let mut rule = Rule::new(name);
        rule.affected_count = self.affected_count;
        set_column(
            &mut rule,
            Column::PermanentLocation,
            compress(&self.locations, compression_level),
        );
        set_column(
            &mut rule,
            Column::CollectionCode,
            compress(&self.item_types, compression_level),
        );
        let call_numbers = if self.open_records == 0 {
            compress(&self.call_numbers, 0)
        } else {
            Vec::new()
        };
        set_column(&mut rule, Column::CallNumber, call_numbers);
        rule.score = score(&rule);
        rule
    }
}

fn push_value(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        list.push(value.to_string());
    }
}

fn set_column(rule: &mut Rule, column: Column, patterns: Vec<String>) {
    rule.columns[column.index()] = if patterns.is_empty() {
        ColumnConstraint::wildcard()
    } else {
        ColumnConstraint::new(patterns)
    };
}

/// Accumulators keyed by bin number.
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    bins: BTreeMap<u32, RuleAccumulator>,
}

impl RuleSetBuilder {
    pub fn add(&mut self, bin: u32, record: &ClassificationRecord) {
        self.bins.entry(bin).or_default().add(record);
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// One rule per bin, named `R<bin>`, in bin order.
    pub fn finish(self, compression_level: i32) -> Vec<Rule> {
        self.bins
            .into_iter()
            .map(|(bin, acc)| acc.finish(route_name(bin), compression_level))
            .collect()
    }
}

pub fn route_name(bin: u32) -> String {
    format!("R{bin}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bin_records_fold_into_one_rule() {
        let mut builder = RuleSetBuilder::default();
        builder.add(2, &ClassificationRecord::new(1250, "TEENFIC", "COMICBOOK", "2"));
        builder.add(2, &ClassificationRecord::new(900, "TEENFIC", "COMICBOOK", "2"));
        let rules = builder.finish(0);
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.name, "R2");
        assert_eq!(rule.affected_count, 2150);
        assert_eq!(rule.column(Column::PermanentLocation).patterns(), ["TEENFIC"]);
        assert_eq!(rule.column(Column::CollectionCode).patterns(), ["COMICBOOK"]);
        assert!(rule.column(Column::CallNumber).is_any());
    }

    #[test]
    fn blank_values_leave_wildcard() {
        let mut acc = RuleAccumulator::default();
        acc.add(&ClassificationRecord::new(5, "", "BOOK", "1"));
        let rule = acc.finish("R1", 0);
        assert_eq!(rule.column(Column::PermanentLocation).render(), "*");
        assert_eq!(rule.specificity_rank(), 1);
    }

    #[test]
    fn call_numbers_dropped_when_any_record_lacks_one() {
        let mut acc = RuleAccumulator::default();
        acc.add(&ClassificationRecord::new(100, "FICGENERAL", "BOOK", "1").with_call_number("7*"));
        acc.add(&ClassificationRecord::new(500, "FICMYSTERY", "BOOK", "1"));
        acc.add(&ClassificationRecord::new(20, "FICSCIENCE", "BOOK", "1").with_call_number("  "));
        let rule = acc.finish("R1", 0);
        assert!(rule.column(Column::CallNumber).is_any());
        assert_eq!(rule.affected_count, 620);
    }

    #[test]
    fn call_numbers_are_collected_uncompressed() {
        let mut acc = RuleAccumulator::default();
        acc.add(&ClassificationRecord::new(5, "GENERAL", "BOOK", "1").with_call_number("DVD 791*"));
        acc.add(&ClassificationRecord::new(5, "GENERAL", "BOOK", "1").with_call_number("DVD 792"));
        acc.add(&ClassificationRecord::new(5, "GENERAL", "BOOK", "1").with_call_number("DVD 791*"));
        assert_eq!(acc.records(), 3);
        assert_eq!(acc.affected_count(), 15);
        let rule = acc.finish("R1", 4);
        assert_eq!(
            rule.column(Column::CallNumber).patterns(),
            ["DVD 791*", "DVD 792"]
        );
    }
}
