//! Seeded point clouds used as benchmark inputs.

mod generation;

use densitree_core::{DataSourceError, FeatureMatrix};
use generation::{blob_centroids, standard_normal_sample, validate_blob_config, validate_shape};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Rejected generator configurations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntheticError {
    /// `point_count` was zero.
    #[error("cannot generate zero points")]
    ZeroPoints,
    /// `dimensions` was zero.
    #[error("points need at least one dimension")]
    ZeroDimensions,
    /// `cluster_count` was zero.
    #[error("at least one blob is required")]
    ZeroClusters,
    /// More blobs than points were requested.
    #[error("{cluster_count} blobs cannot share {point_count} points")]
    ClusterCountExceedsPointCount {
        /// Requested blobs.
        cluster_count: usize,
        /// Requested points.
        point_count: usize,
    },
    /// A float parameter was non-finite or not positive.
    #[error("`{parameter}` must be finite and positive")]
    InvalidFloatParameter {
        /// Field name.
        parameter: &'static str,
    },
}

/// Uniform random vectors in the unit hypercube.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Rows to produce.
    pub point_count: usize,
    /// Columns per row.
    pub dimensions: usize,
    /// Seed for `SmallRng`.
    pub seed: u64,
}

/// Isotropic Gaussian blobs with centroids spaced around a ring.
#[derive(Clone, Debug)]
pub struct GaussianBlobConfig {
    /// Rows to produce.
    pub point_count: usize,
    /// Columns per row.
    pub dimensions: usize,
    /// Blobs to place on the ring.
    pub cluster_count: usize,
    /// Distance between neighbouring centroids.
    pub separation: f32,
    /// Standard deviation of every blob along every axis.
    pub std_dev: f32,
    /// Seed for `SmallRng`.
    pub seed: u64,
}

/// Generated feature vectors, one row per point.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    name: &'static str,
    rows: Vec<Vec<f32>>,
    dimensions: usize,
}

impl SyntheticSource {
    /// Generates uniform random vectors in `[0.0, 1.0)`.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is invalid.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        validate_shape(config.point_count, config.dimensions)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let rows = (0..config.point_count)
            .map(|_| {
                (0..config.dimensions)
                    .map(|_| rng.gen_range(0.0_f32..1.0_f32))
                    .collect()
            })
            .collect();
        Ok(Self {
            name: "synthetic-uniform",
            rows,
            dimensions: config.dimensions,
        })
    }

    /// Generates Gaussian blobs.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is invalid.
    pub fn generate_gaussian_blobs(config: &GaussianBlobConfig) -> Result<Self, SyntheticError> {
        Self::generate_gaussian_blobs_with_labels(config).map(|(source, _labels)| source)
    }

    /// Generates Gaussian blobs together with the blob index of every point.
    ///
    /// Points are assigned to blobs round-robin, so point `i` belongs to blob
    /// `i % cluster_count`.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is invalid.
    #[expect(
        clippy::float_arithmetic,
        reason = "Gaussian sampling offsets centroids by scaled normal draws"
    )]
    pub fn generate_gaussian_blobs_with_labels(
        config: &GaussianBlobConfig,
    ) -> Result<(Self, Vec<usize>), SyntheticError> {
        validate_shape(config.point_count, config.dimensions)?;
        validate_blob_config(config)?;

        let centroids = blob_centroids(config, &mut SmallRng::seed_from_u64(config.seed));
        let mut rng = SmallRng::seed_from_u64(config.seed.rotate_left(17) ^ 0x5DEE_CE66_D1CE_4E5B);
        let mut rows = Vec::with_capacity(config.point_count);
        let mut labels = Vec::with_capacity(config.point_count);
        for (label, centroid) in centroids
            .iter()
            .enumerate()
            .cycle()
            .take(config.point_count)
        {
            let row = centroid
                .iter()
                .map(|centre| Ok(centre + standard_normal_sample(&mut rng)? * config.std_dev))
                .collect::<Result<Vec<f32>, SyntheticError>>()?;
            rows.push(row);
            labels.push(label);
        }

        Ok((
            Self {
                name: "synthetic-gaussian-blobs",
                rows,
                dimensions: config.dimensions,
            },
            labels,
        ))
    }

    /// Returns the generated rows.
    #[must_use]
    pub const fn rows(&self) -> &[Vec<f32>] {
        self.rows.as_slice()
    }

    /// Returns the data source name.
    #[must_use]
    #[rustfmt::skip]
    pub const fn name(&self) -> &'static str { self.name }

    /// Returns the dimensionality of each row.
    #[must_use]
    #[rustfmt::skip]
    pub const fn dimensions(&self) -> usize { self.dimensions }

    /// Returns the number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether no points were generated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies the rows into a [`FeatureMatrix`] measured with Euclidean
    /// distance.
    ///
    /// # Errors
    /// Returns [`DataSourceError`] when the rows are not valid features.
    pub fn to_feature_matrix(&self) -> Result<FeatureMatrix, DataSourceError> {
        FeatureMatrix::from_rows(self.name, &self.rows)
    }
}
