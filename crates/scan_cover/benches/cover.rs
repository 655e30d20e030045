mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scan_cover::cover::cache::NoCache;
use scan_cover::cover::config::CoverConfig;
use scan_cover::cover::coverage::{CoverageMatrix, SpatialIndex};
use scan_cover::cover::engine::CoverEngine;
use scan_cover::cover::greedy::select_cover;
use scan_cover::sampling::{sample_candidates, UniformDiskSampling};

const SIZES: [usize; 3] = [1_000, 5_000, 20_000];

fn coverage_build_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("cover/coverage_build");

    for &n in &SIZES {
        let points = common::clustered_points(n, 12, 0xC0FFEE ^ n as u64);
        let sampler = UniformDiskSampling::new(5, 5.0);
        let mut rng = StdRng::seed_from_u64(0xA11CE ^ n as u64);
        let candidates = sample_candidates(&sampler, &points, 70.0, &mut rng).positions();
        group.throughput(common::elements_throughput(candidates.len()));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let index = SpatialIndex::build(&points);
                let matrix = CoverageMatrix::build(&index, &candidates, 70.0, usize::MAX)
                    .expect("cap is unbounded");
                black_box(matrix.nnz());
            });
        });
    }

    group.finish();
}

fn greedy_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("cover/greedy");

    for &n in &SIZES {
        let points = common::clustered_points(n, 12, 0xBEEF ^ n as u64);
        let sampler = UniformDiskSampling::new(5, 5.0);
        let mut rng = StdRng::seed_from_u64(0xE57 ^ n as u64);
        let candidates = sample_candidates(&sampler, &points, 70.0, &mut rng).positions();
        let index = SpatialIndex::build(&points);
        let matrix = CoverageMatrix::build(&index, &candidates, 70.0, usize::MAX)
            .expect("cap is unbounded");
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let outcome = select_cover(matrix.clone());
                black_box(outcome.rows.len());
            });
        });
    }

    group.finish();
}

fn engine_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("cover/engine");

    for &n in &SIZES {
        let points = common::clustered_points(n, 12, 0xF00D ^ n as u64);
        let config = CoverConfig::new(common::region()).with_grid(2, 2);
        group.throughput(common::elements_throughput(n));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut cache = NoCache;
                let mut engine =
                    CoverEngine::try_new(config.clone(), &mut cache).expect("valid config");
                let mut rng = StdRng::seed_from_u64(7);
                let result = engine.compute(&points, &mut rng).expect("cover");
                black_box(result.cover.len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = coverage_build_benches, greedy_benches, engine_benches
}
criterion_main!(benches);
