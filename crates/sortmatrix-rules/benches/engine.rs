//! Benchmarks for item matching and duplicate detection.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sortmatrix_rules::validate::check_coverage;
use sortmatrix_rules::{Column, ColumnConstraint, MatchOptions, Rule, RuleEngine, RuleEngineBuilder};

const TABLE: &str = "\
REJECT|Y|01|*|*|*|*|*|*|*|*|*|*|*|*
REJECT|Y|02|*|*|*|*|*|*|*|*|*|*|*|*
R4|*|*|*|*|ABORIGINAL, JUVPIC, JPBK, JUVNONF, JUVOTHLANG, NONFICTION, YRCA|*|JPBK, JPAPERBACK, JBOOK, JOTHLANGBK|*|*|*|*|*|*|*
R6|*|*|*|*|EMOVIE, JUV*, COMICBOOK|*|JBOOK, JDVD*, JBLU-RAY*, JPBK, COMIC|*|*|*|*|*|*|*
R1|*|*|*|*|TEENFIC, TEENGRAPHC, TPBK, TPBKSER, EASYENGL|*|JBOOK, JPBK, BOOK|*|*|*|*|*|*|*
R3|*|*|*|*|GENERAL, FIC*, PBK*, LARGE*|*|BOOK, LARGEPRINT, PBK, PAPERBACK|*|*|*|*|*|*|*
R5|*|*|*|*|EPLCLV|*|PERIODICAL|*|*|*|*|*|*|*
R2|*|*|*|*|*|*|CD, DVD*, JCD, VIDGAME, BLU-RAY*|*|*|*|*|*|*|*
R1|*|*|*|*|*|*|OTHLANGBK|*|*|*|*|*|*|*
R5|*|*|*|*|*|*|BOOK, MUSICSCORE, PAPERBACK|*|*|*|*|*|*|*
";

fn engine() -> RuleEngine {
    let mut builder = RuleEngineBuilder::new();
    builder.load_table(TABLE);
    builder.build().unwrap()
}

fn bench_match_hit(c: &mut Criterion) {
    let engine = engine();
    c.bench_function("match_line_hit", |b| {
        b.iter(|| engine.match_line(black_box("31221|PBKMYS|EPLSTR|PAPERBACK|870.44|"), MatchOptions::default()))
    });
}

fn bench_match_exception(c: &mut Criterion) {
    let engine = engine();
    c.bench_function("match_line_exception", |b| {
        b.iter(|| engine.match_line(black_box("31221|UNKNOWN|EPLSTR|MAGAZINE|"), MatchOptions::default()))
    });
}

fn bench_validate(c: &mut Criterion) {
    let engine = engine();
    c.bench_function("validate_table", |b| b.iter(|| black_box(engine.validate())));
}

/// Twelve routes, each 100 prefix locations by 80 item types.
fn wide_rules() -> Vec<Rule> {
    (0..12)
        .map(|route| {
            let locations = (0..100).map(|i| format!("LOC{route:02}{i:03}*")).collect();
            let types = (0..80).map(|i| format!("TYPE{i:02}")).collect();
            Rule::new(format!("R{route}"))
                .with_column(Column::PermanentLocation, ColumnConstraint::new(locations))
                .with_column(Column::CollectionCode, ColumnConstraint::new(types))
        })
        .collect()
}

fn bench_coverage_wide(c: &mut Criterion) {
    let rules = wide_rules();
    let mut group = c.benchmark_group("coverage");
    group.sample_size(10);
    group.bench_function("wide_table", |b| {
        b.iter(|| black_box(check_coverage(&rules, 10_000)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_match_hit,
    bench_match_exception,
    bench_validate,
    bench_coverage_wide
);
criterion_main!(benches);
