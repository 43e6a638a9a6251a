//! Coverage report for a compilation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::bins::BinLayout;

/// A record whose bin column was not a usable bin number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedBin {
    pub row: usize,
    pub value: String,
    pub count: u64,
}

/// An input row that could not be read as a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationReport {
    pub rule_count: usize,
    /// Records folded into a rule (including deny-list records).
    pub handled_records: usize,
    pub handled_items: u64,
    /// Records left without a bin.
    pub unhandled_records: usize,
    pub unhandled_items: u64,
    pub malformed: Vec<MalformedBin>,
    pub malformed_items: u64,
    /// Items routed to the exception bin by the deny-list rule.
    pub denied_items: u64,
    /// Records per identified bin.
    pub bins: BTreeMap<u32, usize>,
    pub layout: BinLayout,
    pub gaps: Vec<u32>,
    /// Rows the reader skipped; their items are not in any count above.
    pub rejected_rows: Vec<RejectedRow>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl CompilationReport {
    /// Sum of every input record's count.
    pub fn total_items(&self) -> u64 {
        self.handled_items + self.unhandled_items + self.malformed_items
    }

    /// Share of catalog items routed by a rule, to one decimal place.
    pub fn percent_covered(&self) -> f64 {
        match self.total_items() {
            0 => 0.0,
            total => round1(self.handled_items as f64 / total as f64 * 100.0),
        }
    }

    /// Share left without a rule (unassigned or malformed).
    pub fn percent_exception(&self) -> f64 {
        match self.total_items() {
            0 => 0.0,
            _ => round1(100.0 - self.percent_covered()),
        }
    }

    /// Share sent to the exception bin by the deny-list rule.
    pub fn percent_denied(&self) -> f64 {
        self.share(self.denied_items)
    }

    /// Items the exception bin receives: unruled items plus deny-listed ones.
    pub fn exception_bin_items(&self) -> u64 {
        self.unhandled_items + self.malformed_items + self.denied_items
    }

    pub fn percent_exception_bin(&self) -> f64 {
        self.share(self.exception_bin_items())
    }

    fn share(&self, items: u64) -> f64 {
        match self.total_items() {
            0 => 0.0,
            total => round1(items as f64 / total as f64 * 100.0),
        }
    }
}

impl fmt::Display for CompilationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bin, count) in &self.bins {
            writeln!(f, "bin {bin}: identified {count} times")?;
        }
        writeln!(
            f,
            "highest bin: {}, last bin: {}, exception bin: {}",
            self.layout.highest, self.layout.last, self.layout.exception
        )?;
        if !self.gaps.is_empty() {
            let gaps: Vec<String> = self.gaps.iter().map(u32::to_string).collect();
            writeln!(f, "bins without rules: {}", gaps.join(", "))?;
        }
        writeln!(
            f,
            "defined: {} rules from {} records covering {} items or {:.1}% of the catalog",
            self.rule_count,
            self.handled_records,
            self.handled_items,
            self.percent_covered()
        )?;
        if self.denied_items > 0 {
            writeln!(
                f,
                "deny-list: {} items or {:.1}% of the catalog routed to exception bin {}",
                self.denied_items,
                self.percent_denied(),
                self.layout.exception
            )?;
        }
        writeln!(
            f,
            "ignored: {} records leaving {} items or {:.1}% of items to fall into the exception bin",
            self.unhandled_records + self.malformed.len(),
            self.unhandled_items + self.malformed_items,
            self.percent_exception()
        )?;
        writeln!(
            f,
            "exception bin {} receives {} items or {:.1}% of the catalog",
            self.layout.exception,
            self.exception_bin_items(),
            self.percent_exception_bin()
        )?;
        for m in &self.malformed {
            writeln!(
                f,
                "malformed bin '{}' on row {} ({} items)",
                m.value, m.row, m.count
            )?;
        }
        for r in &self.rejected_rows {
            writeln!(f, "unreadable row {}: {}", r.row, r.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(handled: u64, unhandled: u64, malformed: u64) -> CompilationReport {
        CompilationReport {
            rule_count: 3,
            handled_records: 3,
            handled_items: handled,
            unhandled_records: 1,
            unhandled_items: unhandled,
            malformed: Vec::new(),
            malformed_items: malformed,
            denied_items: 0,
            bins: BTreeMap::new(),
            layout: BinLayout {
                highest: 3,
                last: 2,
                exception: 3,
            },
            gaps: Vec::new(),
            rejected_rows: Vec::new(),
        }
    }

    #[test]
    fn percentages_round_to_one_place() {
        let r = report(2, 1, 0);
        assert_eq!(r.percent_covered(), 66.7);
        assert_eq!(r.percent_exception(), 33.3);
    }

    #[test]
    fn empty_catalog_is_zero() {
        let r = report(0, 0, 0);
        assert_eq!(r.percent_covered(), 0.0);
        assert_eq!(r.percent_exception(), 0.0);
    }

    #[test]
    fn denied_items_load_the_exception_bin() {
        let mut r = report(90, 10, 0);
        r.denied_items = 20;
        assert_eq!(r.percent_exception(), 10.0);
        assert_eq!(r.percent_denied(), 20.0);
        assert_eq!(r.exception_bin_items(), 30);
        assert_eq!(r.percent_exception_bin(), 30.0);
        let text = r.to_string();
        assert!(text.contains("deny-list: 20 items or 20.0% of the catalog routed to exception bin 3"));
        assert!(text.contains("exception bin 3 receives 30 items or 30.0% of the catalog"));
    }

    #[test]
    fn display_lists_unreadable_rows() {
        let mut r = report(10, 0, 0);
        r.rejected_rows.push(RejectedRow {
            row: 7,
            reason: "invalid item count 'many'".to_string(),
        });
        assert!(r.to_string().contains("unreadable row 7: invalid item count 'many'"));
    }

    #[test]
    fn display_mentions_layout() {
        let text = report(10, 0, 0).to_string();
        assert!(text.contains("highest bin: 3, last bin: 2, exception bin: 3"));
        assert!(text.contains("100.0% of the catalog"));
    }
}
