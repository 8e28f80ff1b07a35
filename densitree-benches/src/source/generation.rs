//! Config checks, centroid layout and normal sampling.

use std::f32::consts::PI;

use rand::{Rng, rngs::SmallRng};

use super::{GaussianBlobConfig, SyntheticError};

pub(super) const fn validate_shape(
    point_count: usize,
    dimensions: usize,
) -> Result<(), SyntheticError> {
    match (point_count, dimensions) {
        (0, _) => Err(SyntheticError::ZeroPoints),
        (_, 0) => Err(SyntheticError::ZeroDimensions),
        _ => Ok(()),
    }
}

pub(super) fn validate_blob_config(config: &GaussianBlobConfig) -> Result<(), SyntheticError> {
    match config.cluster_count {
        0 => return Err(SyntheticError::ZeroClusters),
        clusters if clusters > config.point_count => {
            return Err(SyntheticError::ClusterCountExceedsPointCount {
                cluster_count: clusters,
                point_count: config.point_count,
            });
        }
        _ => {}
    }
    require_positive("separation", config.separation)?;
    require_positive("std_dev", config.std_dev)
}

fn require_positive(parameter: &'static str, value: f32) -> Result<(), SyntheticError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SyntheticError::InvalidFloatParameter { parameter })
    }
}

/// Places centroids on a circle in the first two axes so neighbours sit
/// `separation` apart. Remaining axes carry a small uniform offset.
#[expect(
    clippy::cast_precision_loss,
    reason = "centroid angles derive from small cluster indices"
)]
#[expect(
    clippy::float_arithmetic,
    reason = "centroid placement uses trigonometric expressions"
)]
pub(super) fn blob_centroids(config: &GaussianBlobConfig, rng: &mut SmallRng) -> Vec<Vec<f32>> {
    let count = config.cluster_count as f32;
    let radius = if config.cluster_count < 2 {
        0.0
    } else {
        config.separation / (2.0 * (PI / count).sin())
    };
    let jitter = 0.1 * config.separation;

    (0..config.cluster_count)
        .map(|index| {
            let angle = 2.0 * PI * (index as f32) / count;
            let planar = [radius * angle.cos(), radius * angle.sin()];
            (0..config.dimensions)
                .map(|axis| {
                    planar
                        .get(axis)
                        .copied()
                        .unwrap_or_else(|| rng.gen_range(-jitter..jitter))
                })
                .collect()
        })
        .collect()
}

/// Draws one standard normal sample with the Box-Muller transform.
#[expect(
    clippy::float_arithmetic,
    reason = "Box-Muller sampling is floating-point arithmetic"
)]
pub(super) fn standard_normal_sample(rng: &mut SmallRng) -> Result<f32, SyntheticError> {
    let u1 = rng.gen_range(f32::EPSILON..1.0_f32);
    let u2 = rng.gen_range(0.0_f32..1.0_f32);
    let sample = (-2.0_f32 * u1.ln()).sqrt() * (2.0_f32 * PI * u2).cos();
    if sample.is_finite() {
        Ok(sample)
    } else {
        Err(SyntheticError::InvalidFloatParameter {
            parameter: "standard_normal_sample",
        })
    }
}
