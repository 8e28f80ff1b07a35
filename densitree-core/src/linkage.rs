//! Single-linkage agglomerative clustering into a fixed number of clusters.

use std::{num::NonZeroUsize, time::Instant};

use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    builder::Metric,
    datasource::DataSource,
    error::DensitreeError,
    hierarchy::Dendrogram,
    matrix::DistanceMatrix,
    mst::{prim_mst, total_weight},
    observe,
    result::ClusterLabels,
};

const INPUT_NAME: &str = "input";

/// Single-linkage clustering cut at `n_clusters`.
///
/// Single linkage never produces noise; every point receives a label.
///
/// # Examples
/// ```
/// use densitree_core::SingleLinkageBuilder;
///
/// let rows = [vec![0.0], vec![1.0], vec![3.0], vec![6.0]];
/// let linkage = SingleLinkageBuilder::new().with_n_clusters(3).build()?;
/// let labels = linkage.fit_predict(&rows)?;
/// assert_eq!(labels.as_slice(), &[0, 0, 1, 2]);
/// # Ok::<(), densitree_core::DensitreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SingleLinkage {
    n_clusters: NonZeroUsize,
    metric: Metric,
}

impl SingleLinkage {
    pub(crate) fn new(n_clusters: NonZeroUsize, metric: Metric) -> Self {
        Self { n_clusters, metric }
    }

    /// Returns the number of clusters requested.
    #[must_use]
    pub fn n_clusters(&self) -> NonZeroUsize {
        self.n_clusters
    }

    /// Returns how [`Self::fit`] interprets its rows.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Clusters `rows`, read according to [`Self::metric`].
    ///
    /// # Errors
    /// Returns the input errors of [`Metric::distances`] and the fitting
    /// errors of [`Self::fit_distances`].
    pub fn fit(&self, rows: &[Vec<f32>]) -> Result<SingleLinkageModel> {
        let matrix = self.metric.distances(INPUT_NAME, rows)?;
        self.fit_distances(&matrix)
    }

    /// Clusters `rows` and returns only the labels.
    ///
    /// # Errors
    /// Same as [`Self::fit`].
    pub fn fit_predict(&self, rows: &[Vec<f32>]) -> Result<ClusterLabels> {
        self.fit(rows).map(SingleLinkageModel::into_labels)
    }

    /// Clusters the items of any [`DataSource`].
    ///
    /// # Errors
    /// Returns [`DensitreeError::EmptySource`] for an empty source,
    /// [`DensitreeError::DataSource`] when the source fails to produce a
    /// valid distance, and the fitting errors of [`Self::fit_distances`].
    pub fn fit_source<D: DataSource + Sync>(&self, source: &D) -> Result<SingleLinkageModel> {
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
    /// When `n_clusters` exceeds the number of points every point becomes its
    /// own cluster.
    ///
    /// # Errors
    /// Returns [`DensitreeError::EmptySource`] for an empty matrix and
    /// [`DensitreeError::Mst`] when some points are infinitely far from the
    /// rest.
    #[instrument(
        name = "core.single_linkage.fit",
        err,
        skip(self, matrix),
        fields(
            data_source = %matrix.name(),
            items = matrix.size(),
            n_clusters = %self.n_clusters,
            metric = %self.metric,
        ),
    )]
    pub fn fit_distances(&self, matrix: &DistanceMatrix) -> Result<SingleLinkageModel> {
        let started = Instant::now();
        let items = matrix.size();
        if items == 0 {
            warn!(
                data_source = matrix.name(),
                "data source is empty, returning error"
            );
            return Err(DensitreeError::empty_source(matrix.name()));
        }

        let mst = prim_mst(matrix)?;
        debug!(
            edges = mst.len(),
            total_weight = total_weight(&mst),
            "built distance spanning tree"
        );
        let hierarchy = Dendrogram::from_mst(items, &mst)?;
        let assignments = hierarchy.cut(self.n_clusters.get());
        let labels = ClusterLabels::try_from_assignments(assignments.into_iter().map(Some))?;
        info!(
            clusters = labels.cluster_count(),
            "single-linkage fit complete"
        );
        observe::record_fit("single_linkage", labels.cluster_count(), started.elapsed());

        Ok(SingleLinkageModel { labels, hierarchy })
    }
}

/// Result of [`SingleLinkage::fit`].
#[derive(Debug, Clone)]
pub struct SingleLinkageModel {
    labels: ClusterLabels,
    hierarchy: Dendrogram,
}

impl SingleLinkageModel {
    /// Returns one label per point.
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> &ClusterLabels { &self.labels }

    /// Returns the full single-linkage dendrogram.
    #[must_use]
    #[rustfmt::skip]
    pub fn hierarchy(&self) -> &Dendrogram { &self.hierarchy }

    /// Consumes the model, keeping only the labels.
    #[must_use]
    pub fn into_labels(self) -> ClusterLabels {
        self.labels
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        builder::SingleLinkageBuilder,
        error::DensitreeErrorCode,
        test_utils::{CountingSource, line_matrix},
    };

    fn linkage(n_clusters: usize) -> SingleLinkage {
        SingleLinkageBuilder::new()
            .with_n_clusters(n_clusters)
            .build()
            .expect("test configuration must be valid")
    }

    #[rstest]
    #[case(1, vec![0, 0, 0, 0])]
    #[case(2, vec![0, 0, 0, 1])]
    #[case(3, vec![0, 0, 1, 2])]
    #[case(4, vec![0, 1, 2, 3])]
    #[case(9, vec![0, 1, 2, 3])]
    fn cuts_line_into_requested_clusters(#[case] n_clusters: usize, #[case] expected: Vec<i32>) {
        let model = linkage(n_clusters)
            .fit_distances(&line_matrix(&[0.0, 1.0, 3.0, 6.0]))
            .expect("fit must succeed");
        assert_eq!(model.labels().as_slice(), expected.as_slice());
        assert_eq!(model.labels().noise_count(), 0);
        assert_eq!(model.hierarchy().merges().len(), 3);
    }

    #[rstest]
    fn single_point_is_one_cluster() {
        let labels = linkage(2)
            .fit_predict(&[vec![4.0, 2.0]])
            .expect("fit must succeed");
        assert_eq!(labels.as_slice(), &[0]);
        assert_eq!(labels.cluster_count(), 1);
    }

    #[rstest]
    fn source_and_rows_agree() {
        let points = vec![0.0, 1.0, 3.0, 6.0, 6.5];
        let source = CountingSource::from_points(&points);
        let rows: Vec<Vec<f32>> = points.iter().map(|&x| vec![x]).collect();
        let from_source = linkage(2)
            .fit_source(&source)
            .expect("fit must succeed")
            .into_labels();
        assert_eq!(from_source, linkage(2).fit_predict(&rows).expect("fit must succeed"));
    }

    #[rstest]
    fn rejects_empty_input() {
        let err = linkage(2).fit(&[]).expect_err("empty input must be rejected");
        assert_eq!(err.code(), DensitreeErrorCode::EmptySource);
    }
}
