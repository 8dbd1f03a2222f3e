//! Weight table benchmarks
//!
//! Measures draw and probability query cost as the number of entries grows.
//! Draws scan entries linearly, so cost should grow roughly with table size.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use weighttable::WeightTable;

fn populated(entries: usize) -> WeightTable<usize> {
    let table = WeightTable::new();
    for i in 0..entries {
        table.add(&format!("key-{}", i), Some(i), (i % 100 + 1) as i64);
    }
    table
}

/// Benchmark a single weighted draw
fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw");

    for entries in [10, 100, 1_000, 10_000] {
        let table = populated(entries);
        group.bench_with_input(BenchmarkId::from_parameter(entries), &table, |b, table| {
            b.iter(|| black_box(table.get()));
        });
    }

    group.finish();
}

/// Benchmark probability queries (single key and whole table)
fn bench_probabilities(c: &mut Criterion) {
    let mut group = c.benchmark_group("probabilities");

    for entries in [10, 1_000] {
        let table = populated(entries);
        group.bench_with_input(BenchmarkId::new("single", entries), &table, |b, table| {
            b.iter(|| black_box(table.get_probability("key-5")));
        });
        group.bench_with_input(BenchmarkId::new("all", entries), &table, |b, table| {
            b.iter(|| black_box(table.get_all_probabilities()));
        });
    }

    group.finish();
}

/// Benchmark accumulating weight on an existing key
fn bench_add(c: &mut Criterion) {
    let table = populated(100);
    c.bench_function("add_existing", |b| {
        b.iter(|| black_box(table.add("key-1", None, 1)));
    });
}

criterion_group!(benches, bench_draw, bench_probabilities, bench_add);
criterion_main!(benches);
