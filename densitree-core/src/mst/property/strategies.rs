//! Strategy builders for MST property-based tests.
//!
//! Fixtures are symmetric matrices with a zero diagonal. Weights are small
//! multiples of one eighth so sums stay exact in `f64`.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::DistanceMatrix;

const MIN_NODES: usize = 2;
const MAX_NODES: usize = 40;

/// Weight distribution strategy for generated matrices.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum WeightDistribution {
    /// Weights drawn from a wide range, so ties are rare.
    Unique,
    /// Weights drawn from a handful of values, so ties dominate.
    ManyIdentical,
    /// Distances between points on a line, including repeated points.
    Line,
}

/// Generates fixtures across every distribution.
pub(super) fn matrix_strategy() -> impl Strategy<Value = (WeightDistribution, DistanceMatrix)> {
    (
        prop_oneof![
            Just(WeightDistribution::Unique),
            Just(WeightDistribution::ManyIdentical),
            Just(WeightDistribution::Line),
        ],
        any::<u64>(),
    )
        .prop_map(|(distribution, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (distribution, generate_matrix(distribution, &mut rng))
        })
}

/// Generates a matrix for a specific distribution.
pub(super) fn generate_matrix(distribution: WeightDistribution, rng: &mut SmallRng) -> DistanceMatrix {
    let node_count = rng.gen_range(MIN_NODES..=MAX_NODES);
    let mut rows = vec![vec![0.0_f32; node_count]; node_count];
    match distribution {
        WeightDistribution::Unique => fill_symmetric(&mut rows, || eighths(rng, 1..4096)),
        WeightDistribution::ManyIdentical => fill_symmetric(&mut rows, || eighths(rng, 1..4)),
        WeightDistribution::Line => {
            let coords: Vec<f32> = (0..node_count).map(|_| eighths(rng, 0..64)).collect();
            for (left, row) in rows.iter_mut().enumerate() {
                for (right, value) in row.iter_mut().enumerate() {
                    *value = (coords[left] - coords[right]).abs();
                }
            }
        }
    }
    DistanceMatrix::from_rows("generated", &rows).expect("generated matrix must be valid")
}

fn fill_symmetric(rows: &mut [Vec<f32>], mut sample: impl FnMut() -> f32) {
    let node_count = rows.len();
    for left in 0..node_count {
        for right in (left + 1)..node_count {
            let weight = sample();
            rows[left][right] = weight;
            rows[right][left] = weight;
        }
    }
}

fn eighths(rng: &mut SmallRng, range: std::ops::Range<u16>) -> f32 {
    f32::from(rng.gen_range(range)) / 8.0
}
