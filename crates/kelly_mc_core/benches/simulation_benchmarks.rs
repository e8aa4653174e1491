//! Criterion benchmarks for kelly_mc_core
//!
//! Run with: cargo bench -p kelly_mc_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kelly_mc_core::optimization::optimize_all;
use kelly_mc_core::{
    FractionPolicy, SimulationConfig, analyze, optimize_kelly, resolve_fractions, simulate,
};

fn reference_config(paths: usize, periods: usize) -> SimulationConfig {
    SimulationConfig {
        num_simulations: paths,
        num_periods: periods,
        ..SimulationConfig::default_two_regime()
    }
}

fn bench_kelly(c: &mut Criterion) {
    let config = SimulationConfig::default_two_regime();

    c.bench_function("optimize_kelly", |b| {
        b.iter(|| optimize_kelly(black_box(&config.setups[0])))
    });

    c.bench_function("optimize_all", |b| {
        b.iter(|| optimize_all(black_box(&config.setups), black_box(&config.kelly)))
    });
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");

    for paths in [1_000, 10_000, 50_000].iter() {
        let config = reference_config(*paths, 100);
        let fractions = resolve_fractions(&config, &FractionPolicy::Configured).unwrap();

        group.bench_with_input(BenchmarkId::new("paths", paths), paths, |b, _| {
            b.iter(|| simulate(black_box(&config), black_box(&fractions), Some(42)))
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for paths in [1_000, 10_000].iter() {
        let config = reference_config(*paths, 100);
        let fractions = resolve_fractions(&config, &FractionPolicy::Configured).unwrap();
        let ensemble = simulate(&config, &fractions, Some(42)).unwrap();

        group.bench_with_input(BenchmarkId::new("paths", paths), paths, |b, _| {
            b.iter(|| analyze(black_box(&ensemble), black_box(&config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kelly, bench_simulate, bench_analyze);
criterion_main!(benches);
