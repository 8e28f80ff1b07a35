use std::f32::consts::PI;

use densitree_core::{DataSource, DataSourceError};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Scalar points measured by absolute difference.
#[derive(Clone)]
pub struct Line {
    data: Vec<f32>,
}

impl Line {
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }
}

impl DataSource for Line {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        "line"
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        let a = self
            .data
            .get(i)
            .ok_or(DataSourceError::OutOfBounds { index: i })?;
        let b = self
            .data
            .get(j)
            .ok_or(DataSourceError::OutOfBounds { index: j })?;
        Ok((a - b).abs())
    }
}

/// Isotropic 2D Gaussian blobs, one block of `per_blob` rows per centre.
#[must_use]
pub fn gaussian_blobs(centres: &[(f32, f32)], per_blob: usize, std_dev: f32, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    centres
        .iter()
        .flat_map(|&(x, y)| {
            (0..per_blob)
                .map(|_| {
                    vec![
                        x + std_dev * standard_normal(&mut rng),
                        y + std_dev * standard_normal(&mut rng),
                    ]
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Points drawn uniformly from the unit square.
#[must_use]
pub fn uniform_square(count: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| vec![rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
        .collect()
}

/// Full Euclidean distance matrix of `rows`, computed outside the library
/// with the same `f64` accumulation.
#[must_use]
pub fn euclidean_rows(rows: &[Vec<f32>]) -> Vec<Vec<f32>> {
    rows.iter()
        .map(|a| {
            rows.iter()
                .map(|b| {
                    let sum: f64 = a
                        .iter()
                        .zip(b)
                        .map(|(&x, &y)| {
                            let diff = f64::from(x) - f64::from(y);
                            diff * diff
                        })
                        .sum();
                    sum.sqrt() as f32
                })
                .collect()
        })
        .collect()
}

fn standard_normal(rng: &mut SmallRng) -> f32 {
    // Box-Muller; `1 - u` keeps the logarithm finite.
    let u1: f32 = 1.0 - rng.gen_range(0.0..1.0);
    let u2: f32 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
