//! Plain-text rendering of validation reports.

use std::io::{self, Write};

use sortmatrix_rules::validate::{CoverageFinding, RuleRef};
use sortmatrix_rules::{CoverageKind, LimitScope, OrderingKind, ValidationReport};

fn at(rule: &RuleRef) -> String {
    format!("{} (line {})", rule.name, rule.display_line())
}

fn coverage_line(f: &CoverageFinding) -> String {
    let extra = if f.occurrences > 1 {
        format!(" ({} combinations)", f.occurrences)
    } else {
        String::new()
    };
    match f.kind {
        CoverageKind::Duplicate => format!(
            "duplicate: {} and {} both cover {}{extra}",
            at(&f.first),
            at(&f.second),
            f.first_fingerprint
        ),
        CoverageKind::Conflict => format!(
            "conflict: {} {} overlaps {} {}{extra}",
            at(&f.first),
            f.first_fingerprint,
            at(&f.second),
            f.second_fingerprint
        ),
    }
}

/// Write every section of `report`.
pub fn write_report<W: Write>(out: &mut W, report: &ValidationReport) -> io::Result<()> {
    writeln!(out, "testing bins.")?;
    for reject in &report.reject_routes {
        writeln!(
            out,
            "* WARNING: sort route #{} is set up to reject materials.",
            reject.position + 1
        )?;
    }
    writeln!(out, "found {} bins with routing rules.", report.bins.len())?;
    for (name, count) in &report.bins {
        writeln!(out, "  {name}: {count} rule(s)")?;
    }

    writeln!(out, "testing for redundant rules.")?;
    for finding in &report.coverage {
        writeln!(out, "  {}", coverage_line(finding))?;
    }
    for limit in &report.expansion_limits {
        let cap = match limit.scope {
            LimitScope::Rule => "rule limit",
            LimitScope::Table => "table budget",
        };
        writeln!(
            out,
            "  skipped: {} expands to {} combinations ({cap} {})",
            at(&limit.rule),
            limit.combinations,
            limit.limit
        )?;
    }
    if report.coverage.is_empty() {
        writeln!(out, "  none found.")?;
    }

    writeln!(out, "rule order:")?;
    for v in &report.ordering {
        match &v.violation {
            OrderingKind::RankInversion {
                rank,
                previous_rank,
            } => writeln!(
                out,
                "  {} has rank {rank} but follows a rule of rank {previous_rank}",
                at(&v.rule)
            )?,
            OrderingKind::Shadowed { by } => writeln!(
                out,
                "  {} is unreachable behind {}",
                at(&v.rule),
                at(by)
            )?,
        }
    }
    if report.is_ordered() {
        writeln!(out, "  pass.")?;
    }

    match &report.invalid_tokens {
        None => writeln!(out, "reference check: not run, no registry configured.")?,
        Some(tokens) if tokens.is_empty() => writeln!(out, "reference check: pass.")?,
        Some(tokens) => {
            writeln!(out, "reference check:")?;
            for t in tokens {
                writeln!(
                    out,
                    "  unknown {} '{}' in {}",
                    t.column,
                    t.token,
                    at(&t.rule)
                )?;
            }
        }
    }
    Ok(())
}
