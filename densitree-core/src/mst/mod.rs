//! Dense minimum spanning tree (MST) construction.
//!
//! [`prim_mst`] runs Prim's algorithm over a complete graph given as a
//! [`DistanceMatrix`]. It needs no edge list and runs in `O(n²)` time with
//! `O(n)` working memory, which suits the dense mutual-reachability graph.

use tracing::debug;

use crate::matrix::DistanceMatrix;

/// Errors returned while computing a minimum spanning tree.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum MstError {
    /// The caller requested an MST for an empty graph.
    #[error("cannot compute an MST for an empty graph")]
    EmptyGraph,
    /// No finite edge connects the tree built so far to the remaining nodes.
    #[error("graph is disconnected: node {right} is unreachable from node {left}")]
    DisconnectedGraph {
        /// The most recently added tree node when growth stalled.
        left: usize,
        /// The first node that could not be reached.
        right: usize,
    },
}

impl MstError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> MstErrorCode {
        match self {
            Self::EmptyGraph => MstErrorCode::EmptyGraph,
            Self::DisconnectedGraph { .. } => MstErrorCode::DisconnectedGraph,
        }
    }
}

/// Machine-readable error codes for [`MstError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MstErrorCode {
    /// The caller requested an MST for an empty graph.
    EmptyGraph,
    /// No finite edge reaches the remaining nodes.
    DisconnectedGraph,
}

impl MstErrorCode {
    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyGraph => "EMPTY_GRAPH",
            Self::DisconnectedGraph => "DISCONNECTED_GRAPH",
        }
    }
}

/// A single MST edge. Endpoints keep the order in which Prim discovered them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MstEdge {
    source: usize,
    target: usize,
    weight: f32,
}

impl MstEdge {
    /// Creates an edge between `source` and `target`.
    #[must_use]
    pub fn new(source: usize, target: usize, weight: f32) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the node added to the tree in the previous step.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the endpoint the edge brought into the tree.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f32 { self.weight }
}

/// Computes the minimum spanning tree of the complete graph described by
/// `matrix`.
///
/// Growth starts at node `0`. Each step brings in the node outside the tree
/// with the cheapest connection to it and records an edge from the node added
/// in the previous step, weighted by that cheapest connection. The edges form
/// a spanning path whose weights are exactly the MST weights, which is all the
/// single-linkage hierarchy needs. Ties resolve to the lowest node index, so
/// the output is deterministic. A single-node graph yields no edges.
///
/// # Examples
/// ```
/// use densitree_core::{DistanceMatrix, prim_mst};
///
/// let matrix = DistanceMatrix::from_rows(
///     "triangle",
///     &[vec![0.0, 1.0, 4.0], vec![1.0, 0.0, 2.0], vec![4.0, 2.0, 0.0]],
/// )?;
/// let edges = prim_mst(&matrix)?;
/// let pairs: Vec<_> = edges.iter().map(|e| (e.source(), e.target(), e.weight())).collect();
/// assert_eq!(pairs, [(0, 1, 1.0), (1, 2, 2.0)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] when the matrix has no rows and
/// [`MstError::DisconnectedGraph`] when the cheapest way to grow the tree is
/// an infinite edge.
pub fn prim_mst(matrix: &DistanceMatrix) -> Result<Vec<MstEdge>, MstError> {
    let node_count = matrix.size();
    if node_count == 0 {
        return Err(MstError::EmptyGraph);
    }

    let mut in_tree = vec![false; node_count];
    let mut best = vec![f32::INFINITY; node_count];
    let mut edges = Vec::with_capacity(node_count - 1);
    let mut current = 0;

    for _ in 1..node_count {
        in_tree[current] = true;
        let Some(row) = matrix.row(current) else {
            return Err(MstError::EmptyGraph);
        };

        let mut next: Option<usize> = None;
        for (node, &distance) in row.iter().enumerate() {
            if in_tree[node] {
                continue;
            }
            if distance < best[node] {
                best[node] = distance;
            }
            match next {
                Some(chosen) if best[node] >= best[chosen] => {}
                _ => next = Some(node),
            }
        }

        let Some(chosen) = next else { break };
        let weight = best[chosen];
        if weight == f32::INFINITY {
            return Err(MstError::DisconnectedGraph {
                left: current,
                right: chosen,
            });
        }
        edges.push(MstEdge::new(current, chosen, weight));
        current = chosen;
    }

    debug!(nodes = node_count, edges = edges.len(), "minimum spanning tree built");
    Ok(edges)
}

/// Sorts edges by ascending weight.
///
/// The sort is stable: edges of equal weight keep their relative order.
pub fn sort_edges(edges: &mut [MstEdge]) {
    edges.sort_by(|left, right| left.weight.total_cmp(&right.weight));
}

/// Returns the summed weight of `edges`, accumulated in `f64`.
#[must_use]
pub fn total_weight(edges: &[MstEdge]) -> f64 {
    edges.iter().map(|edge| f64::from(edge.weight)).sum()
}

#[cfg(test)]
mod property;
#[cfg(test)]
mod tests;
