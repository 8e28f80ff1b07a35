//! Mutual-reachability and dense Prim benchmarks.
//!
//! Distances are computed once during setup so each group isolates one
//! stage of the HDBSCAN graph construction.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use densitree_benches::{
    error::BenchSetupError,
    params::PipelineBenchParams,
    source::{GaussianBlobConfig, SyntheticSource},
};
use densitree_core::{DistanceMatrix, core_distances, mutual_reachability, prim_mst};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Vector dimensionality for all benchmark datasets.
const DIMENSIONS: usize = 8;

/// Dataset sizes to benchmark.
const POINT_COUNTS: &[usize] = &[100, 500, 1_000];

/// Neighbourhood size used for core distances.
const MIN_SAMPLES: usize = 5;

fn distances(point_count: usize) -> Result<DistanceMatrix, BenchSetupError> {
    let source = SyntheticSource::generate_gaussian_blobs(&GaussianBlobConfig {
        point_count,
        dimensions: DIMENSIONS,
        cluster_count: 4,
        separation: 8.0,
        std_dev: 1.0,
        seed: SEED,
    })?;
    Ok(DistanceMatrix::from_source(&source.to_feature_matrix()?)?)
}

fn register_mst(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let min_samples = NonZeroUsize::new(MIN_SAMPLES).ok_or(BenchSetupError::ZeroValue {
        context: "min_samples",
    })?;

    let mut reachability_group = c.benchmark_group("mutual_reachability");
    reachability_group.sample_size(20);
    let mut prepared = Vec::with_capacity(POINT_COUNTS.len());
    for &point_count in POINT_COUNTS {
        let matrix = distances(point_count)?;
        let bench_params = PipelineBenchParams { point_count };
        reachability_group.bench_with_input(
            BenchmarkId::from_parameter(&bench_params),
            &matrix,
            |b, matrix| {
                b.iter(|| {
                    core_distances(matrix, min_samples)
                        .and_then(|core| mutual_reachability(matrix, &core))
                });
            },
        );
        let core = core_distances(&matrix, min_samples)?;
        prepared.push((bench_params, mutual_reachability(&matrix, &core)?));
    }
    reachability_group.finish();

    let mut prim_group = c.benchmark_group("prim_mst");
    prim_group.sample_size(20);
    for (bench_params, reachability) in &prepared {
        prim_group.bench_with_input(
            BenchmarkId::from_parameter(bench_params),
            reachability,
            |b, reachability| {
                b.iter(|| prim_mst(reachability));
            },
        );
    }
    prim_group.finish();
    Ok(())
}

fn mst(c: &mut Criterion) {
    register_mst(c).unwrap_or_else(|err| panic!("could not prepare mst: {err}"));
}

criterion_group!(benches, mst);
criterion_main!(benches);
