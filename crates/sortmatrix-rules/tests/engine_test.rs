//! Integration tests for loading, matching and validating rule tables.
#![allow(clippy::tests_outside_test_module)]

use std::io::Write;

use sortmatrix_rules::{
    Column, CoverageKind, FileProvider, ItemError, MatchOptions, MatchOutcome, OrderingKind,
    ReferenceRegistry, RuleEngineBuilder,
};

const SCRAPED: &str = "\
Submit\t \tSubmit\tSubmit\tREJECT\tY\t02\t*\t*\t*\t*\t*\t*\t*\t*\t*\t*\t*\t*
Submit\t \tSubmit\tSubmit\tR2\t*\t*\t*\t*\t*\t*\tCD, DVD*, JCD, VIDGAME, BLU-RAY*\t*\t*\t*\t*\t*\t*\t*
Submit\t \tSubmit\tSubmit\tR5\t*\t*\t*\t*\t*\tEPLCLV\tPERIODICAL\t*\t*\t*\t*\t*\t*\t*
Submit\t \tSubmit\tSubmit\tR3\t*\t*\t*\t*\tGENERAL, FIC*, PBK*, LARGE*\t*\tBOOK, LARGEPRINT, PBK, PAPERBACK\t*\t*\t*\t*\t*\t*\t*
";

fn write_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn scraped_table_routes_items_from_file() {
    let table = write_file(SCRAPED);
    let items = write_file("31221115689585  |PBKMYS|EPLSTR|BOOK|870.44|\n\n31221000000000|CLVMAIN|EPLMNA|PERIODICAL|\n");

    let engine = FileProvider::load_table(table.path()).unwrap().build().unwrap();
    assert_eq!(engine.rule_count(), 4);

    let lines = FileProvider::load_items(items.path()).unwrap();
    let results = engine.match_batch(lines.iter().map(String::as_str), MatchOptions::default());
    assert_eq!(results.len(), 2);

    let first = results[0].as_ref().unwrap();
    assert_eq!(first.item, "31221115689585");
    assert_eq!(first.rule_name(), Some("R3"));
    assert_eq!(first.summary(), "31221115689585 -> bin 3 (R3, line 4) matched on [PermanentLocation=PBK*, CollectionCode=BOOK]");

    let second = results[1].as_ref().unwrap();
    assert!(second.is_exception(), "destination EPLMNA is not EPLCLV");
}

#[test]
fn destination_column_is_matched() {
    let mut builder = RuleEngineBuilder::new();
    builder.load_table("R5|*|*|*|*|*|EPLCLV|PERIODICAL|*\n");
    let engine = builder.build().unwrap();
    let result = engine
        .match_line("1|ANY|EPLCLV|PERIODICAL|", MatchOptions::default())
        .unwrap();
    assert!(matches!(result.outcome, MatchOutcome::Rule { bin: Some(5), .. }));
    assert_eq!(result.matched[0].column, Column::DestinationLocation);
}

#[test]
fn mismatched_item_does_not_abort_batch() {
    let mut builder = RuleEngineBuilder::new();
    builder.load_table("R1|*|*|*|*|*|*|BOOK|*\n");
    let engine = builder.build().unwrap();
    let wide = format!("7{}", "|BOOK".repeat(12));
    let results = engine.match_batch(
        ["1|A|B|BOOK|", wide.as_str(), "2|A|B|BOOK|"],
        MatchOptions::default(),
    );
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err(),
        &ItemError::ColumnMismatch {
            item: "7".into(),
            found: 17,
            expected: 15
        }
    );
    assert!(results[2].is_ok());
}

#[test]
fn validation_report_covers_all_checks() {
    let mut builder = RuleEngineBuilder::new();
    builder.load_table(
        "\
R1|*|*|*|*|FIC*|*|*|*
R2|*|*|*|*|FICGENERAL|*|*|*
R6|*|*|*|*|*|*|DVD*|*
R2|*|*|*|*|*|*|DVD21|*
R4|*|*|*|*|NONFICTION|*|BOOK|*
",
    );
    builder.set_reference(ReferenceRegistry::new(
        ["FICGENERAL", "NONFICTION"].map(String::from),
        ["BOOK", "DVD21"].map(String::from),
    ));
    let engine = builder.build().unwrap();
    let report = engine.validate();

    assert_eq!(report.bins.get("R2"), Some(&2));

    let shadowed: Vec<&str> = report
        .ordering
        .iter()
        .filter(|v| matches!(v.violation, OrderingKind::Shadowed { .. }))
        .map(|v| v.rule.name.as_str())
        .collect();
    assert!(shadowed.contains(&"R2"));

    let conflict = report
        .coverage
        .iter()
        .find(|f| f.kind == CoverageKind::Conflict && f.first.name == "R6")
        .unwrap();
    assert_eq!(conflict.first_fingerprint, "7=DVD*");
    assert_eq!(conflict.second.name, "R2");

    assert!(report
        .ordering
        .iter()
        .any(|v| v.rule.name == "R4" && matches!(v.violation, OrderingKind::RankInversion { .. })));

    assert!(report.invalid_tokens.as_ref().unwrap().is_empty());
    assert!(!report.is_clean());
}
