//! Rule-table line parser.
//!
//! Each rule is one pipe-delimited line with 9 to 15 fields. Lines pasted
//! from the sorter's web configuration page have no pipes; they are
//! normalised to fields first.

use serde::Serialize;
use sortmatrix_core::{FIELD_SEPARATOR, MIN_COLS, SCHEMA_COLUMNS};
use tracing::warn;

use crate::error::RulesError;
use crate::rule::{Column, ColumnConstraint, Rule};

/// Paste artifact from the web configuration page's buttons.
const SCRAPE_ARTIFACT: &str = "Submit";

/// A table line the loader could not use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub content: String,
    pub reason: String,
}

/// True for blank lines and `#` comments.
pub(crate) fn is_ignorable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Split a screen-scraped line into fields.
///
/// Drops `Submit` tokens, splits on whitespace and rejoins comma lists
/// whose items were separated by spaces (`CD, DVD*` becomes `CD,DVD*`).
pub fn normalize_screen_scrape(line: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for token in line.split_whitespace().filter(|t| *t != SCRAPE_ARTIFACT) {
        match fields.last_mut() {
            Some(prev) if prev.ends_with(',') || token.starts_with(',') => prev.push_str(token),
            _ => fields.push(token.to_string()),
        }
    }
    fields
}

fn split_fields(line: &str) -> Vec<String> {
    if line.contains(FIELD_SEPARATOR) {
        let line = line.strip_suffix(FIELD_SEPARATOR).unwrap_or(line);
        line.split(FIELD_SEPARATOR)
            .map(|f| f.trim().to_string())
            .collect()
    } else {
        normalize_screen_scrape(line)
    }
}

/// Parse one rule line. `line_no` is 1-based and recorded on the rule.
pub fn parse_rule_line(line: &str, line_no: usize) -> Result<Rule, RulesError> {
    let fields = split_fields(line.trim());
    if fields.len() < MIN_COLS {
        return Err(RulesError::TooFewColumns {
            line: line_no,
            found: fields.len(),
            min: MIN_COLS,
        });
    }
    if fields.len() > SCHEMA_COLUMNS {
        return Err(RulesError::TooManyColumns {
            line: line_no,
            found: fields.len(),
            max: SCHEMA_COLUMNS,
        });
    }

    let name = fields[0].as_str();
    if name.is_empty() {
        return Err(RulesError::Parse(format!("line {line_no}: missing rule name")));
    }

    let mut rule = Rule::new(name);
    rule.line = Some(line_no);
    for column in Column::constrained() {
        let constraint = fields
            .get(column.index())
            .map(|f| ColumnConstraint::parse(f))
            .unwrap_or_else(ColumnConstraint::wildcard);
        rule.columns[column.index()] = constraint;
    }
    Ok(rule)
}

/// Parse a whole table. Bad lines are skipped and returned alongside the
/// rules rather than failing the load.
pub fn parse_table(content: &str) -> (Vec<Rule>, Vec<SkippedLine>) {
    let mut rules = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if is_ignorable(line) {
            continue;
        }
        let line_no = idx + 1;
        match parse_rule_line(line, line_no) {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                warn!(line = line_no, error = %e, error_type = e.error_type(), "skipping rule line");
                skipped.push(SkippedLine {
                    line: line_no,
                    content: line.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (rules, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pipe_line() {
        let rule = parse_rule_line("R2|*|*|*|*|*|*|CD, DVD*,JCD|*|*|*|*|*|*|*", 3).unwrap();
        assert_eq!(rule.name, "R2");
        assert_eq!(rule.line, Some(3));
        assert_eq!(
            rule.column(Column::CollectionCode).patterns(),
            ["CD", "DVD*", "JCD"]
        );
        assert!(rule.column(Column::PermanentLocation).is_any());
    }

    #[test]
    fn short_line_is_padded() {
        let rule = parse_rule_line("R5|*|*|*|*|EPLCLV|*|PERIODICAL|*|", 1).unwrap();
        assert_eq!(rule.column(Column::PermanentLocation).patterns(), ["EPLCLV"]);
        assert!(rule.column(Column::DetectionSource).is_any());
        assert_eq!(rule.to_line().split('|').count(), SCHEMA_COLUMNS);
    }

    #[test]
    fn too_few_fields() {
        let err = parse_rule_line("R1|*|*|*|FIC", 7).unwrap_err();
        assert!(matches!(
            err,
            RulesError::TooFewColumns { line: 7, found: 5, min: MIN_COLS }
        ));
    }

    #[test]
    fn too_many_fields() {
        let line = format!("R1{}", "|*".repeat(15));
        assert!(matches!(
            parse_rule_line(&line, 1),
            Err(RulesError::TooManyColumns { found: 16, .. })
        ));
    }

    #[test]
    fn screen_scrape_line() {
        let line = "Submit\t \tSubmit\tSubmit\tR1\t*\t*\t*\t*\tTEENFIC, TEENGRAPHC , TPBK\t*\tJBOOK, JPBK, BOOK\t*\t*\t*\t*\t*\t*\t*";
        let rule = parse_rule_line(line, 1).unwrap();
        assert_eq!(rule.name, "R1");
        assert_eq!(
            rule.column(Column::PermanentLocation).patterns(),
            ["TEENFIC", "TEENGRAPHC", "TPBK"]
        );
        assert_eq!(
            rule.column(Column::CollectionCode).patterns(),
            ["JBOOK", "JPBK", "BOOK"]
        );
    }

    #[test]
    fn scrape_merges_comma_lists() {
        assert_eq!(
            normalize_screen_scrape("R2 * CD , DVD*,JCD"),
            vec!["R2", "*", "CD,DVD*,JCD"]
        );
    }

    #[test]
    fn table_skips_comments_and_bad_lines() {
        let content = "# library EPLMNA\n\nR1|*|*|*|*|FIC*|*|*|*\nR2|*|*\nR3|*|*|*|*|*|*|BOOK|*\n";
        let (rules, skipped) = parse_table(content);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].line, Some(3));
        assert_eq!(rules[1].line, Some(5));
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line, 4);
    }
}
