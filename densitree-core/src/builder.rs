//! Builder utilities for configuring the estimators.
//!
//! Exposes the metric selection surface and the validation applied before
//! constructing [`Hdbscan`] and [`SingleLinkage`] instances.

use std::{convert::Infallible, fmt, num::NonZeroUsize, str::FromStr};

use tracing::warn;

use crate::{
    Result,
    error::DensitreeError,
    hdbscan::Hdbscan,
    linkage::SingleLinkage,
    matrix::{DistanceMatrix, FeatureMatrix},
};

const DEFAULT_MIN_SAMPLES: usize = 10;
const DEFAULT_N_CLUSTERS: usize = 2;
/// Smallest minimum cluster size that can ever split.
const MIN_SPLITTABLE_CLUSTER_SIZE: usize = 2;

/// How estimator input rows are interpreted.
///
/// # Examples
/// ```
/// use densitree_core::Metric;
///
/// assert_eq!(Metric::parse("precomputed"), Metric::Precomputed);
/// assert_eq!(Metric::parse("Euclidean"), Metric::Euclidean);
/// assert_eq!(Metric::parse("manhattan"), Metric::Euclidean);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    /// Rows are feature vectors compared with the Euclidean distance.
    #[default]
    Euclidean,
    /// Rows form a square matrix of pairwise distances.
    Precomputed,
}

impl Metric {
    /// Parses a metric name case-insensitively.
    ///
    /// Unrecognised names fall back to [`Metric::Euclidean`] with a warning.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("precomputed") {
            Self::Precomputed
        } else if trimmed.eq_ignore_ascii_case("euclidean") {
            Self::Euclidean
        } else {
            warn!(metric = name, "unknown metric, falling back to euclidean");
            Self::Euclidean
        }
    }

    /// Turns input rows into the pairwise distances this metric describes.
    ///
    /// # Examples
    /// ```
    /// use densitree_core::Metric;
    ///
    /// let rows = [vec![0.0, 0.0], vec![3.0, 4.0]];
    /// let matrix = Metric::Euclidean.distances("points", &rows)?;
    /// assert_eq!(matrix.get(0, 1), Some(5.0));
    ///
    /// let err = Metric::Precomputed.distances("points", &rows[..1]).unwrap_err();
    /// assert_eq!(err.data_source_code().map(|code| code.as_str()), Some("DATA_SOURCE_NOT_SQUARE"));
    /// # Ok::<(), densitree_core::DensitreeError>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`DensitreeError::EmptySource`] when `rows` is empty and
    /// [`DensitreeError::DataSource`] when the rows are not valid feature
    /// vectors or, for [`Metric::Precomputed`], not a square matrix of
    /// non-negative distances.
    pub fn distances(self, name: &str, rows: &[Vec<f32>]) -> Result<DistanceMatrix> {
        if rows.is_empty() {
            warn!(data_source = name, "input contains no rows, returning error");
            return Err(DensitreeError::empty_source(name));
        }
        let wrap = |error| DensitreeError::data_source(name, error);
        match self {
            Self::Precomputed => DistanceMatrix::from_rows(name, rows).map_err(wrap),
            Self::Euclidean => {
                let features = FeatureMatrix::from_rows(name, rows).map_err(wrap)?;
                DistanceMatrix::from_source(&features).map_err(wrap)
            }
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Precomputed => "precomputed",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Configures and constructs [`Hdbscan`] instances.
///
/// `min_cluster_size` defaults to `min_samples` when left unset.
///
/// # Examples
/// ```
/// use densitree_core::{HdbscanBuilder, Metric};
///
/// let hdbscan = HdbscanBuilder::new()
///     .with_min_samples(4)
///     .with_metric(Metric::Precomputed)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(hdbscan.min_samples().get(), 4);
/// assert_eq!(hdbscan.min_cluster_size().get(), 4);
/// assert_eq!(hdbscan.metric(), Metric::Precomputed);
/// ```
#[derive(Debug, Clone)]
pub struct HdbscanBuilder {
    min_samples: usize,
    min_cluster_size: Option<usize>,
    metric: Metric,
}

impl Default for HdbscanBuilder {
    fn default() -> Self {
        Self {
            min_samples: DEFAULT_MIN_SAMPLES,
            min_cluster_size: None,
            metric: Metric::Euclidean,
        }
    }
}

impl HdbscanBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use densitree_core::{HdbscanBuilder, Metric};
    ///
    /// let builder = HdbscanBuilder::new();
    /// assert_eq!(builder.min_samples(), 10);
    /// assert_eq!(builder.min_cluster_size(), 10);
    /// assert_eq!(builder.metric(), Metric::Euclidean);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the neighbour rank used for core distances.
    #[must_use]
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Overrides the minimum cluster size.
    ///
    /// # Examples
    /// ```
    /// use densitree_core::HdbscanBuilder;
    ///
    /// let builder = HdbscanBuilder::new().with_min_samples(3).with_min_cluster_size(8);
    /// assert_eq!(builder.min_samples(), 3);
    /// assert_eq!(builder.min_cluster_size(), 8);
    /// ```
    #[must_use]
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = Some(size);
        self
    }

    /// Sets how input rows are interpreted.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the configured `min_samples`.
    #[must_use]
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Returns the configured minimum cluster size, or `min_samples` when unset.
    #[must_use]
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size.unwrap_or(self.min_samples)
    }

    /// Returns the configured metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Validates the configuration and constructs an [`Hdbscan`] instance.
    ///
    /// A minimum cluster size of `1` is raised to `2`, since a single point
    /// can never split, and a warning is logged.
    ///
    /// # Examples
    /// ```
    /// use densitree_core::HdbscanBuilder;
    ///
    /// let hdbscan = HdbscanBuilder::new().with_min_cluster_size(1).build()?;
    /// assert_eq!(hdbscan.min_cluster_size().get(), 2);
    ///
    /// let err = HdbscanBuilder::new().with_min_samples(0).build().unwrap_err();
    /// assert_eq!(err.code().as_str(), "DENSITREE_INVALID_MIN_SAMPLES");
    /// # Ok::<(), densitree_core::DensitreeError>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`DensitreeError::InvalidMinSamples`] when `min_samples` is
    /// zero and [`DensitreeError::InvalidMinClusterSize`] when the minimum
    /// cluster size is zero.
    pub fn build(self) -> Result<Hdbscan> {
        let min_samples = NonZeroUsize::new(self.min_samples).ok_or(
            DensitreeError::InvalidMinSamples {
                got: self.min_samples,
            },
        )?;
        let requested = self.min_cluster_size();
        let mut min_cluster_size = NonZeroUsize::new(requested)
            .ok_or(DensitreeError::InvalidMinClusterSize { got: requested })?;
        if min_cluster_size.get() < MIN_SPLITTABLE_CLUSTER_SIZE {
            warn!(
                requested,
                used = MIN_SPLITTABLE_CLUSTER_SIZE,
                "min_cluster_size below the smallest splittable size, raising it"
            );
            min_cluster_size = min_cluster_size.saturating_add(1);
        }

        Ok(Hdbscan::new(min_samples, min_cluster_size, self.metric))
    }
}

/// Configures and constructs [`SingleLinkage`] instances.
///
/// # Examples
/// ```
/// use densitree_core::SingleLinkageBuilder;
///
/// let linkage = SingleLinkageBuilder::new()
///     .with_n_clusters(3)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(linkage.n_clusters().get(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SingleLinkageBuilder {
    n_clusters: usize,
    metric: Metric,
}

impl Default for SingleLinkageBuilder {
    fn default() -> Self {
        Self {
            n_clusters: DEFAULT_N_CLUSTERS,
            metric: Metric::Euclidean,
        }
    }
}

impl SingleLinkageBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of clusters to cut the hierarchy into.
    #[must_use]
    pub fn with_n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    /// Sets how input rows are interpreted.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the configured cluster count.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Returns the configured metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Validates the configuration and constructs a [`SingleLinkage`] instance.
    ///
    /// # Errors
    /// Returns [`DensitreeError::InvalidClusterCount`] when `n_clusters` is zero.
    pub fn build(self) -> Result<SingleLinkage> {
        let n_clusters = NonZeroUsize::new(self.n_clusters).ok_or(
            DensitreeError::InvalidClusterCount {
                got: self.n_clusters,
            },
        )?;
        Ok(SingleLinkage::new(n_clusters, self.metric))
    }
}
