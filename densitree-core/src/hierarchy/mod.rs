//! Hierarchy extraction from a minimum spanning tree.
//!
//! This module turns an MST into flat clusters in four steps:
//!
//! - [`Dendrogram::from_mst`] merges MST edges in ascending weight order into
//!   a single-linkage dendrogram whose internal nodes carry synthetic ids.
//! - [`CondensedTree::from_dendrogram`] condenses the dendrogram with
//!   `min_cluster_size`, letting a cluster continue when one branch is too
//!   small.
//! - [`compute_stability`] scores each cluster by its excess of mass and
//!   [`select_clusters`] picks the most persistent ones.
//! - [`label_points`] assigns each point to the selected cluster containing
//!   it, or to noise.
//!
//! [`Dendrogram::cut`] flattens the dendrogram directly into a fixed number
//! of clusters for plain single-linkage clustering.
//!
//! Everything here is sequential and deterministic.

mod condense;
mod dendrogram;
mod select;
mod stability;
mod union_find;

pub use self::{
    condense::{CondensedNode, CondensedTree},
    dendrogram::{Dendrogram, Merge},
    select::{label_points, select_clusters},
    stability::compute_stability,
};

/// Reasons an edge list cannot be turned into a hierarchy.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum HierarchyError {
    /// No points were supplied.
    #[error("hierarchy needs at least one point")]
    EmptyDataset,
    /// The edge list is not the size of a spanning tree.
    #[error("spanning tree needs {expected} edges, got {actual}")]
    EdgeCountMismatch {
        /// `point_count - 1`.
        expected: usize,
        /// Edges actually passed in.
        actual: usize,
    },
    /// An endpoint lies outside `0..node_count`.
    #[error("node {node} is out of range for {node_count} points")]
    InvalidNodeId {
        /// Offending endpoint.
        node: usize,
        /// Points in the hierarchy.
        node_count: usize,
    },
    /// A weight was NaN or negative.
    #[error("edge ({left}, {right}) has unusable weight {weight}")]
    InvalidEdgeWeight {
        /// First endpoint of the offending edge.
        left: usize,
        /// Second endpoint of the offending edge.
        right: usize,
        /// The rejected weight.
        weight: f32,
    },
    /// Both endpoints were already in one component.
    #[error("edge ({left}, {right}) closes a cycle")]
    CycleDetected {
        /// First endpoint of the offending edge.
        left: usize,
        /// Second endpoint of the offending edge.
        right: usize,
    },
}

impl HierarchyError {
    /// Stable code for logs and tests.
    #[must_use]
    pub const fn code(&self) -> HierarchyErrorCode {
        match self {
            Self::EmptyDataset => HierarchyErrorCode::EmptyDataset,
            Self::EdgeCountMismatch { .. } => HierarchyErrorCode::EdgeCountMismatch,
            Self::InvalidNodeId { .. } => HierarchyErrorCode::InvalidNodeId,
            Self::InvalidEdgeWeight { .. } => HierarchyErrorCode::InvalidEdgeWeight,
            Self::CycleDetected { .. } => HierarchyErrorCode::CycleDetected,
        }
    }
}

/// Machine-readable error codes for [`HierarchyError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HierarchyErrorCode {
    /// The caller requested hierarchy extraction for an empty dataset.
    EmptyDataset,
    /// The edge count did not match the node count.
    EdgeCountMismatch,
    /// An edge referenced a node outside the graph.
    InvalidNodeId,
    /// An input edge weight was invalid for hierarchy extraction.
    InvalidEdgeWeight,
    /// The edges contained a cycle.
    CycleDetected,
}

impl HierarchyErrorCode {
    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::EdgeCountMismatch => "EDGE_COUNT_MISMATCH",
            Self::InvalidNodeId => "INVALID_NODE_ID",
            Self::InvalidEdgeWeight => "INVALID_EDGE_WEIGHT",
            Self::CycleDetected => "CYCLE_DETECTED",
        }
    }
}

#[cfg(test)]
mod property;
