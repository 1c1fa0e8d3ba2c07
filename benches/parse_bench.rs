use criterion::{criterion_group, criterion_main, Criterion};
use tally::Ledger;

fn criterion_benchmark(c: &mut Criterion) {
    let input = std::env::var("TALLY_BENCH_INPUT").unwrap();
    let text = std::fs::read_to_string(&input).unwrap();
    c.bench_function("Parse text", |b| {
        b.iter(|| Ledger::from_text(&text).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
