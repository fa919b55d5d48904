//! Criterion benchmarks for the Mildew front-end.
//!
//! Run with: `cargo bench --package mildew_core`

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use mildew_core::parser::lexer::Lexer;
use mildew_core::parser::parser::Parser;

const SAMPLE_PROGRAM: &str = r#"
function fib(n) {
    if (n < 2) return n;
    return fib(n - 1) + fib(n - 2);
}
let cache = {memo: 1};
for (let i = 0; i < 32; i += 1) {
    cache[i] = fib(i) * 0x10 + 0b101;
}
class Counter {
    constructor(start) { }
    get value() { }
    tick() { }
}
let sum = (a, b = 1) => a + b;
switch (cache.memo) {
    case 1: sum(1, 2); break;
    case 2: sum(3, 4); break;
    default: sum(5, 6);
}
let banner = `count ${cache.memo} of ${32}`;
"#;

// ---------------------------------------------------------------------------
// Lexing throughput
// ---------------------------------------------------------------------------

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("lexer_tokenize_sample", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(SAMPLE_PROGRAM));
            black_box(lexer.tokenize());
        });
    });
}

// ---------------------------------------------------------------------------
// Parsing throughput
// ---------------------------------------------------------------------------

fn bench_parse_program(c: &mut Criterion) {
    let mut lexer = Lexer::new(SAMPLE_PROGRAM);
    let tokens = lexer.tokenize();
    assert!(!lexer.has_errors());
    c.bench_function("parser_parse_sample", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(tokens.clone()));
            black_box(parser.parse_program().expect("sample program parses"));
        });
    });
}

// ---------------------------------------------------------------------------
// Expression-only fast path
// ---------------------------------------------------------------------------

fn bench_parse_expression(c: &mut Criterion) {
    let mut lexer = Lexer::new("a + b * c ** d - e[0].f(g, h) ?? i");
    let tokens = lexer.tokenize();
    assert!(!lexer.has_errors());
    c.bench_function("parser_parse_expression", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(tokens.clone()));
            black_box(parser.parse_expression().expect("expression parses"));
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse_program,
    bench_parse_expression
);
criterion_main!(benches);
