//! Benchmark inputs, rendered as Criterion parameter labels.

use std::fmt;

/// Size of a spanning-tree or end-to-end fit case.
#[derive(Clone, Debug)]
pub struct PipelineBenchParams {
    /// Points generated for the case.
    pub point_count: usize,
}

impl fmt::Display for PipelineBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.point_count)
    }
}

/// Size and cluster floor of a label-extraction case.
#[derive(Clone, Debug)]
pub struct ExtractionBenchParams {
    /// Points generated for the case.
    pub point_count: usize,
    /// `min_cluster_size` passed to the condensing step.
    pub min_cluster_size: usize,
}

impl fmt::Display for ExtractionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},min={}", self.point_count, self.min_cluster_size)
    }
}

/// Size and requested cluster count of a dendrogram cut case.
#[derive(Clone, Debug)]
pub struct CutBenchParams {
    /// Points generated for the case.
    pub point_count: usize,
    /// `k` passed to `Dendrogram::cut`.
    pub n_clusters: usize,
}

impl fmt::Display for CutBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.point_count, self.n_clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn identifiers_name_every_parameter() {
        assert_eq!(PipelineBenchParams { point_count: 500 }.to_string(), "n=500");
        assert_eq!(
            ExtractionBenchParams {
                point_count: 100,
                min_cluster_size: 5,
            }
            .to_string(),
            "n=100,min=5"
        );
        assert_eq!(
            CutBenchParams {
                point_count: 1_000,
                n_clusters: 8,
            }
            .to_string(),
            "n=1000,k=8"
        );
    }
}
