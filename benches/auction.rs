//! Benchmarks for the double-auction engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- single_round
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::time::Duration;

use double_auction::{
    AuctionConfig, AuctionEngine, GeneratorConfig, OrderSource, Participant, RandomOrderSource,
};

// ============================================================================
// HELPER FUNCTIONS - Deterministic round generation
// ============================================================================

/// One seeded round with `sellers + buyers` participants
fn make_round(sellers: usize, buyers: usize, seed: u64) -> Vec<Participant> {
    let config = GeneratorConfig::default().with_participants(sellers, buyers);
    RandomOrderSource::seeded(seed, config).next_round()
}

// ============================================================================
// BENCHMARK: Single Round
// ============================================================================

fn bench_single_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_round");
    group.measurement_time(Duration::from_secs(5));

    for &size in &[10usize, 100, 1_000] {
        let round = make_round(size / 2, size / 2, 42);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("participants", size), &round, |b, round| {
            let mut engine = AuctionEngine::new();
            b.iter_batched(
                || round.clone(),
                |round| black_box(engine.run_round(round)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Invariant Checks
// ============================================================================

fn bench_invariant_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("invariant_checks");
    let round = make_round(500, 500, 7);

    for verify in [true, false] {
        let config = AuctionConfig::default().with_invariant_checks(verify);
        group.bench_with_input(BenchmarkId::new("verify", verify), &round, |b, round| {
            let mut engine = AuctionEngine::with_config(config);
            b.iter_batched(
                || round.clone(),
                |round| black_box(engine.run_round(round)),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Batch of Rounds
// ============================================================================

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    const ROUNDS: usize = 800;
    group.throughput(Throughput::Elements(ROUNDS as u64));
    group.bench_function("800_rounds", |b| {
        b.iter(|| {
            let mut source = RandomOrderSource::seeded(42, GeneratorConfig::default());
            let mut engine = AuctionEngine::new();
            black_box(engine.run_batch(&mut source, ROUNDS))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_single_round, bench_invariant_overhead, bench_batch);
criterion_main!(benches);
