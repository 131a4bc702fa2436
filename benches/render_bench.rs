//! Benchmarks for termwriter hot paths.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use termwriter::cells::{display_width, has_wide_chars};
use termwriter::prelude::*;

fn benchmark_display_width(c: &mut Criterion) {
    let ascii = "tests/test_writer.py::test_sep_with_title PASSED";
    let cjk = "テスト結果: 合格 テスト結果: 合格";
    let decomposed = "e\u{0301}e\u{0301}e\u{0301}e\u{0301}e\u{0301}e\u{0301}";

    c.bench_function("display_width_ascii", |b| {
        b.iter(|| black_box(display_width(black_box(ascii))));
    });

    c.bench_function("display_width_cjk", |b| {
        b.iter(|| black_box(display_width(black_box(cjk))));
    });

    c.bench_function("display_width_decomposed", |b| {
        b.iter(|| black_box(display_width(black_box(decomposed))));
    });

    c.bench_function("has_wide_chars", |b| {
        b.iter(|| black_box(has_wide_chars(black_box(cjk))));
    });
}

fn bench_writer(markup: bool) -> TerminalWriter {
    TerminalWriter::builder()
        .writer(std::io::sink())
        .config(WriterConfig::default().translate_ansi(false))
        .markup(markup)
        .width(120)
        .build()
}

fn benchmark_rule_line(c: &mut Criterion) {
    let tw = bench_writer(false);

    c.bench_function("rule_line_plain", |b| {
        b.iter(|| black_box(tw.rule_line("=", None, None)));
    });

    c.bench_function("rule_line_title", |b| {
        b.iter(|| black_box(tw.rule_line("_ ", Some("FAILURES"), None)));
    });
}

fn benchmark_write(c: &mut Criterion) {
    let mut plain = bench_writer(false);
    let mut styled = bench_writer(true);

    c.bench_function("write_plain", |b| {
        b.iter(|| plain.write(black_box("collected 42 items\n")));
    });

    c.bench_function("write_styled", |b| {
        b.iter(|| styled.write_styled(black_box("FAILED"), &[("red", true), ("bold", true)]));
    });

    c.bench_function("sep_styled", |b| {
        b.iter(|| styled.sep("=", Some("short test summary info"), None, &[("bold", true)]));
    });
}

criterion_group!(
    benches,
    benchmark_display_width,
    benchmark_rule_line,
    benchmark_write,
);
criterion_main!(benches);
