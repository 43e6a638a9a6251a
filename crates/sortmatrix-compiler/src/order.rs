//! Rule scoring and ordering.

use std::cmp::Ordering;

use sortmatrix_core::EMPTY_RULE_SCORE_BONUS;
use sortmatrix_rules::{Column, Rule};

fn constrained_len(rule: &Rule, column: Column) -> usize {
    let constraint = rule.column(column);
    if constraint.is_any() { 0 } else { constraint.len() }
}

/// `2 * item types + locations + 100 / affected items`.
///
/// Item types discriminate more than locations. Among similar rules the one
/// touching fewer items scores higher and is placed earlier.
pub fn score(rule: &Rule) -> f64 {
    let types = constrained_len(rule, Column::CollectionCode) as f64;
    let locations = constrained_len(rule, Column::PermanentLocation) as f64;
    let rarity = if rule.affected_count == 0 {
        EMPTY_RULE_SCORE_BONUS
    } else {
        EMPTY_RULE_SCORE_BONUS / rule.affected_count as f64
    };
    2.0 * types + locations + rarity
}

/// Precedence: alert rules first by severity, then specificity rank, then
/// score. Equal keys compare equal so sorting keeps encounter order.
pub fn precedence(a: &Rule, b: &Rule) -> Ordering {
    b.is_alert()
        .cmp(&a.is_alert())
        .then_with(|| b.alert_priority.cmp(&a.alert_priority))
        .then_with(|| b.specificity_rank().cmp(&a.specificity_rank()))
        .then_with(|| b.score.total_cmp(&a.score))
}

/// Stable sort into match order.
pub fn order_rules(rules: &mut [Rule]) {
    rules.sort_by(precedence);
}

/// Insert the single-column deny rule ahead of the first ordinary rule of
/// rank 1 or less. Those rules leave the location column open and would
/// otherwise claim deny-listed stock.
pub fn insert_before_single_column(rules: &mut Vec<Rule>, rule: Rule) {
    let at = rules
        .iter()
        .position(|r| !r.is_alert() && r.specificity_rank() <= 1)
        .unwrap_or(rules.len());
    rules.insert(at, rule);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortmatrix_rules::ColumnConstraint;

    fn rule(name: &str, locs: &str, types: &str, count: u64) -> Rule {
        let mut r = Rule::new(name)
            .with_column(Column::PermanentLocation, ColumnConstraint::parse(locs))
            .with_column(Column::CollectionCode, ColumnConstraint::parse(types));
        r.affected_count = count;
        r.score = score(&r);
        r
    }

    #[test]
    fn score_formula() {
        assert_eq!(score(&rule("R1", "A,B", "C", 50)), 2.0 + 2.0 + 2.0);
        assert_eq!(score(&rule("R1", "*", "*", 0)), 100.0);
        assert_eq!(score(&rule("R1", "A", "*", 200)), 1.0 + 0.5);
    }

    #[test]
    fn alerts_lead_by_severity() {
        let mut low = Rule::new("REJECT").with_column(Column::Alert, ColumnConstraint::parse("Y"));
        low.alert_priority = Some(1);
        let mut high = low.clone();
        high.alert_priority = Some(3);
        let mut rules = vec![rule("R1", "A", "B", 10), low, high];
        order_rules(&mut rules);
        assert_eq!(rules[0].alert_priority, Some(3));
        assert_eq!(rules[1].alert_priority, Some(1));
        assert_eq!(rules[2].name, "R1");
    }

    #[test]
    fn rank_then_score() {
        let mut rules = vec![
            rule("R1", "A", "*", 10),
            rule("R2", "A,B", "C", 1000),
            rule("R3", "A", "C", 1),
        ];
        order_rules(&mut rules);
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["R3", "R2", "R1"]);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let mut rules = vec![rule("R1", "A", "B", 10), rule("R2", "C", "D", 10)];
        order_rules(&mut rules);
        assert_eq!(rules[0].name, "R1");
    }

    #[test]
    fn insert_ahead_of_catch_all() {
        let mut rules = vec![rule("R1", "A", "B", 10), rule("R2", "*", "*", 10)];
        insert_before_single_column(&mut rules, rule("R5", "DISCARD", "*", 3));
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["R1", "R5", "R2"]);

        let mut plain = vec![rule("R1", "A", "B", 10)];
        insert_before_single_column(&mut plain, rule("R5", "DISCARD", "*", 3));
        assert_eq!(plain[1].name, "R5");
    }

    #[test]
    fn insert_ahead_of_type_only_rule() {
        let mut hold = Rule::new("REJECT").with_column(Column::Alert, ColumnConstraint::parse("Y"));
        hold.alert_priority = Some(3);
        let mut rules = vec![
            hold,
            rule("R1", "A", "B", 10),
            rule("R4", "*", "BOOK", 100),
            rule("R2", "C", "*", 10),
        ];
        insert_before_single_column(&mut rules, rule("R5", "DISCARD", "*", 12));
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["REJECT", "R1", "R5", "R4", "R2"]);
    }
}
