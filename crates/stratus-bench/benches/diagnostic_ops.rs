//! Criterion benchmarks for diagnostic computation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use stratus_bench::ExnerProfile;

/// Benchmark: Exner on 218 columns x 72 levels, serial and threaded.
fn bench_exner(c: &mut Criterion) {
    let mut group = c.benchmark_group("exner_218x72");
    for threads in [Some(1), None] {
        let mut profile = ExnerProfile::new(218, 72, threads).unwrap();
        let label = match threads {
            Some(n) => format!("{n}_threads"),
            None => "all_threads".to_string(),
        };
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter(|| profile.diagnostic.compute_diagnostic().unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_exner);
criterion_main!(benches);
