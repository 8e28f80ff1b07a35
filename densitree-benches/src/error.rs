//! Failures raised while preparing benchmark inputs.
//!
//! Fixture builders return these through `?`. The Criterion entry points are
//! the only place they become panics.

use densitree_core::{DataSourceError, DensitreeError, HierarchyError, MstError, ReachabilityError};

use crate::source::SyntheticError;

/// Why a benchmark fixture could not be built.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The point generator rejected its configuration.
    #[error("could not generate points: {0}")]
    Synthetic(#[from] SyntheticError),
    /// The dense distance matrix could not be built.
    #[error("could not build distances: {0}")]
    DataSource(#[from] DataSourceError),
    /// Core or mutual-reachability distances were rejected.
    #[error("could not derive reachability: {0}")]
    Reachability(#[from] ReachabilityError),
    /// Prim's algorithm failed on the fixture graph.
    #[error("could not span the graph: {0}")]
    Mst(#[from] MstError),
    /// The dendrogram or condensed tree could not be built.
    #[error("could not build the hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),
    /// An estimator builder refused the benchmark parameters.
    #[error("estimator rejected parameters: {0}")]
    Estimator(#[from] DensitreeError),
    /// A constant meant to be positive was zero.
    #[error("`{context}` must be positive")]
    ZeroValue {
        /// Name of the offending constant.
        context: &'static str,
    },
}
