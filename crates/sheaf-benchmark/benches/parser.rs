use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use sheaf_parse::{ParseOptions, parse};

static SIMPLE: &str = "a { color: red }";

static MEDIUM: &str = r#"
@charset "utf-8";
@import url(base.css) screen;

.nav > li a:hover, .nav > li a:focus {
    color: #3ee;
    background: url("bg.png") no-repeat 0 0;
    font: 12px/1.5 "Helvetica Neue", arial, sans-serif !important;
}

@media screen and (max-width: 600px) {
    .nav li:nth-child(2n+1) { width: calc(100% - 10px); }
    input:not([type=text], .wide) { margin: -1px\9; *zoom: 1; }
}

@font-face { font-family: x; src: url(x.woff) format("woff"); }
"#;

fn benchmark_parser(c: &mut Criterion) {
    let inputs = [("Simple", SIMPLE), ("Medium", MEDIUM)];
    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in inputs {
        group.throughput(Throughput::Bytes(text.len() as u64));

        for positions in [false, true] {
            let options = ParseOptions::default().positions(positions);
            let id = if positions { "parse_with_positions" } else { "parse" };

            group.bench_with_input(BenchmarkId::new(id, name), &text, |b, &text| {
                b.iter(|| {
                    let ast = parse(text, &options);
                    black_box(ast)
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
