//! HDBSCAN estimator.
//!
//! Ties the pipeline together: core distances, mutual reachability, the
//! minimum spanning tree, the single-linkage hierarchy, condensation,
//! stability scoring, cluster selection and labelling.

use std::{
    collections::{BTreeMap, BTreeSet},
    num::NonZeroUsize,
    sync::Arc,
    time::Instant,
};

use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    builder::Metric,
    datasource::DataSource,
    error::DensitreeError,
    hierarchy::{CondensedTree, Dendrogram, compute_stability, label_points, select_clusters},
    matrix::DistanceMatrix,
    mst::{prim_mst, total_weight},
    observe,
    reachability::{core_distances, mutual_reachability},
    result::ClusterLabels,
};

const INPUT_NAME: &str = "input";

/// Hierarchical density-based clustering.
///
/// # Examples
/// ```
/// use densitree_core::HdbscanBuilder;
///
/// let rows: Vec<Vec<f32>> = [0.0, 1.0, 2.0, 3.0, 20.0, 21.0, 22.0, 23.0]
///     .into_iter()
///     .map(|x| vec![x])
///     .collect();
/// let hdbscan = HdbscanBuilder::new()
///     .with_min_samples(2)
///     .with_min_cluster_size(3)
///     .build()?;
/// let labels = hdbscan.fit_predict(&rows)?;
/// assert_eq!(labels.as_slice(), &[0, 0, 0, 0, 1, 1, 1, 1]);
/// # Ok::<(), densitree_core::DensitreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Hdbscan {
    min_samples: NonZeroUsize,
    min_cluster_size: NonZeroUsize,
    metric: Metric,
}

impl Hdbscan {
    pub(crate) fn new(
        min_samples: NonZeroUsize,
        min_cluster_size: NonZeroUsize,
        metric: Metric,
    ) -> Self {
        Self {
            min_samples,
            min_cluster_size,
            metric,
        }
    }

    /// Returns the neighbour rank used for core distances.
    #[must_use]
    pub fn min_samples(&self) -> NonZeroUsize {
        self.min_samples
    }

    /// Returns the smallest group of points treated as a cluster.
    #[must_use]
    pub fn min_cluster_size(&self) -> NonZeroUsize {
        self.min_cluster_size
    }

    /// Returns how [`Self::fit`] interprets its rows.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Clusters `rows`, read as feature vectors or as a precomputed distance
    /// matrix depending on [`Self::metric`].
    ///
    /// # Errors
    /// Returns the input errors of [`Metric::distances`] and the fitting
    /// errors of [`Self::fit_distances`].
    pub fn fit(&self, rows: &[Vec<f32>]) -> Result<HdbscanModel> {
        let matrix = self.metric.distances(INPUT_NAME, rows)?;
        self.fit_distances(&matrix)
    }

    /// Clusters `rows` and returns only the labels.
    ///
    /// # Errors
    /// Same as [`Self::fit`].
    pub fn fit_predict(&self, rows: &[Vec<f32>]) -> Result<ClusterLabels> {
        self.fit(rows).map(HdbscanModel::into_labels)
    }

    /// Clusters the items of any [`DataSource`].
    ///
    /// # Errors
    /// Returns [`DensitreeError::EmptySource`] for an empty source,
    /// [`DensitreeError::DataSource`] when the source fails to produce a
    /// valid distance, and the fitting errors of [`Self::fit_distances`].
    pub fn fit_source<D: DataSource + Sync>(&self, source: &D) -> Result<HdbscanModel> {
        if source.is_empty() {
            warn!(
                data_source = source.name(),
                "data source is empty, returning error"
            );
            return Err(DensitreeError::empty_source(source.name()));
        }
        let matrix = DistanceMatrix::from_source(source)
            .map_err(|error| DensitreeError::data_source(source.name(), error))?;
        self.fit_distances(&matrix)
    }

    /// Clusters the points described by a pairwise distance matrix.
    ///
    /// # Errors
    /// Returns [`DensitreeError::EmptySource`] for an empty matrix,
    /// [`DensitreeError::InsufficientItems`] unless the matrix has more items
    /// than `min_samples`, [`DensitreeError::Mst`] when some points are
    /// infinitely far from the rest, and [`DensitreeError::Hierarchy`] or
    /// [`DensitreeError::Labels`] if an intermediate structure is malformed.
    #[instrument(
        name = "core.hdbscan.fit",
        err,
        skip(self, matrix),
        fields(
            data_source = %matrix.name(),
            items = matrix.size(),
            min_samples = %self.min_samples,
            min_cluster_size = %self.min_cluster_size,
            metric = %self.metric,
        ),
    )]
    pub fn fit_distances(&self, matrix: &DistanceMatrix) -> Result<HdbscanModel> {
        let started = Instant::now();
        let items = matrix.size();
        if items == 0 {
            warn!(
                data_source = matrix.name(),
                "data source is empty, returning error"
            );
            return Err(DensitreeError::empty_source(matrix.name()));
        }
        if self.min_samples.get() >= items {
            return Err(DensitreeError::InsufficientItems {
                data_source: Arc::from(matrix.name()),
                items,
                min_samples: self.min_samples.get(),
            });
        }

        let core = core_distances(matrix, self.min_samples)?;
        let reachability = mutual_reachability(matrix, &core)?;
        let mst = prim_mst(&reachability)?;
        debug!(
            edges = mst.len(),
            total_weight = total_weight(&mst),
            "built mutual-reachability spanning tree"
        );

        let hierarchy = Dendrogram::from_mst(items, &mst)?;
        let condensed_tree = CondensedTree::from_dendrogram(&hierarchy, self.min_cluster_size);
        let stabilities = compute_stability(&condensed_tree);
        let selected = select_clusters(&condensed_tree, &stabilities);
        debug!(
            condensed_nodes = condensed_tree.nodes().len(),
            candidates = stabilities.len(),
            selected = selected.len(),
            "selected clusters"
        );

        let labels = ClusterLabels::try_from_assignments(label_points(&condensed_tree, &selected))?;
        info!(
            clusters = labels.cluster_count(),
            noise = labels.noise_count(),
            "hdbscan fit complete"
        );
        observe::record_fit("hdbscan", labels.cluster_count(), started.elapsed());

        Ok(HdbscanModel {
            labels,
            core_distances: core,
            hierarchy,
            condensed_tree,
            stabilities,
            selected,
        })
    }
}

/// Result of [`Hdbscan::fit`]: labels plus the structures they came from.
#[derive(Debug, Clone)]
pub struct HdbscanModel {
    labels: ClusterLabels,
    core_distances: Vec<f32>,
    hierarchy: Dendrogram,
    condensed_tree: CondensedTree,
    stabilities: BTreeMap<usize, f32>,
    selected: BTreeSet<usize>,
}

impl HdbscanModel {
    /// Returns one label per point, `-1` marking noise.
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> &ClusterLabels { &self.labels }

    /// Returns each point's distance to its `min_samples`-th nearest neighbour.
    #[must_use]
    #[rustfmt::skip]
    pub fn core_distances(&self) -> &[f32] { &self.core_distances }

    /// Returns the single-linkage dendrogram over mutual-reachability distances.
    #[must_use]
    #[rustfmt::skip]
    pub fn hierarchy(&self) -> &Dendrogram { &self.hierarchy }

    /// Returns the condensed cluster tree.
    #[must_use]
    #[rustfmt::skip]
    pub fn condensed_tree(&self) -> &CondensedTree { &self.condensed_tree }

    /// Returns the stability of every non-root condensed cluster.
    #[must_use]
    #[rustfmt::skip]
    pub fn stabilities(&self) -> &BTreeMap<usize, f32> { &self.stabilities }

    /// Returns the condensed cluster ids behind the labels, in label order.
    #[must_use]
    #[rustfmt::skip]
    pub fn selected_clusters(&self) -> &BTreeSet<usize> { &self.selected }

    /// Consumes the model, keeping only the labels.
    #[must_use]
    pub fn into_labels(self) -> ClusterLabels {
        self.labels
    }
}
