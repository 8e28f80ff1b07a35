//! Single-linkage dendrogram built from a minimum spanning tree.

use std::collections::{BinaryHeap, HashMap, VecDeque};

use crate::mst::{MstEdge, sort_edges};

use super::{HierarchyError, union_find::LinkageUnionFind};

/// One merge of the single-linkage hierarchy.
///
/// The `i`-th merge of a dendrogram over `n` points creates node `n + i`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Merge {
    left: usize,
    right: usize,
    weight: f32,
    size: usize,
}

impl Merge {
    /// Returns the smaller of the two merged node ids.
    #[must_use]
    #[rustfmt::skip]
    pub fn left(&self) -> usize { self.left }

    /// Returns the larger of the two merged node ids.
    #[must_use]
    #[rustfmt::skip]
    pub fn right(&self) -> usize { self.right }

    /// Returns the distance at which the merge happened.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f32 { self.weight }

    /// Returns the number of points under the merged node.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.size }
}

/// Strict binary merge tree over `n` points with `n - 1` merges.
///
/// # Examples
/// ```
/// use densitree_core::{Dendrogram, MstEdge};
///
/// let edges = [MstEdge::new(0, 1, 1.0), MstEdge::new(1, 2, 3.0), MstEdge::new(2, 3, 1.0)];
/// let dendrogram = Dendrogram::from_mst(4, &edges)?;
///
/// assert_eq!(dendrogram.root(), 6);
/// assert_eq!(dendrogram.children(4), Some((0, 1)));
/// assert_eq!(dendrogram.children(5), Some((2, 3)));
/// assert_eq!(dendrogram.size_of(6), 4);
/// assert_eq!(dendrogram.cut(2), [0, 0, 1, 1]);
/// # Ok::<(), densitree_core::HierarchyError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dendrogram {
    node_count: usize,
    merges: Vec<Merge>,
}

impl Dendrogram {
    /// Builds the dendrogram by merging MST edges in ascending weight order.
    ///
    /// Edges of equal weight are merged in their input order. Each merge
    /// records its two roots with the smaller id on the left.
    ///
    /// # Errors
    /// Returns [`HierarchyError::EmptyDataset`] when `node_count == 0`,
    /// [`HierarchyError::EdgeCountMismatch`] unless exactly `node_count - 1`
    /// edges are given, [`HierarchyError::InvalidNodeId`] or
    /// [`HierarchyError::InvalidEdgeWeight`] for malformed edges, and
    /// [`HierarchyError::CycleDetected`] when the edges do not form a tree.
    pub fn from_mst(node_count: usize, edges: &[MstEdge]) -> Result<Self, HierarchyError> {
        if node_count == 0 {
            return Err(HierarchyError::EmptyDataset);
        }
        if edges.len() != node_count - 1 {
            return Err(HierarchyError::EdgeCountMismatch {
                expected: node_count - 1,
                actual: edges.len(),
            });
        }
        for edge in edges {
            validate_edge(node_count, edge)?;
        }

        let mut sorted = edges.to_vec();
        sort_edges(&mut sorted);

        let mut components = LinkageUnionFind::new(node_count);
        let mut merges = Vec::with_capacity(sorted.len());
        for edge in &sorted {
            let a = components.find(edge.source());
            let b = components.find(edge.target());
            if a == b {
                return Err(HierarchyError::CycleDetected {
                    left: edge.source(),
                    right: edge.target(),
                });
            }
            let (left, right) = if a < b { (a, b) } else { (b, a) };
            let size = components.union(left, right);
            merges.push(Merge {
                left,
                right,
                weight: edge.weight(),
                size,
            });
        }

        Ok(Self { node_count, merges })
    }

    /// Returns the number of original points.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Returns the merges in creation order.
    #[must_use]
    #[rustfmt::skip]
    pub fn merges(&self) -> &[Merge] { &self.merges }

    /// Returns the id of the root node, `2 * (n - 1)`. For a single point the
    /// root is the point itself.
    #[must_use]
    pub fn root(&self) -> usize {
        self.node_count + self.merges.len() - 1
    }

    /// Returns the merge that created synthetic node `id`, if any.
    #[must_use]
    pub fn merge(&self, id: usize) -> Option<&Merge> {
        id.checked_sub(self.node_count)
            .and_then(|index| self.merges.get(index))
    }

    /// Returns the children of `id`, or `None` for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: usize) -> Option<(usize, usize)> {
        self.merge(id).map(|merge| (merge.left, merge.right))
    }

    /// Returns the number of points under `id`: `1` for a leaf, `0` for an
    /// unknown id.
    #[must_use]
    pub fn size_of(&self, id: usize) -> usize {
        if id < self.node_count {
            1
        } else {
            self.merge(id).map_or(0, Merge::size)
        }
    }

    /// Returns `id` followed by all of its descendants in breadth-first order.
    pub(crate) fn breadth_first(&self, id: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            if let Some((left, right)) = self.children(node) {
                queue.push_back(left);
                queue.push_back(right);
            }
        }
        order
    }

    /// Flattens the hierarchy into `n_clusters` clusters.
    ///
    /// Starting from the root, the frontier node with the largest id (the
    /// most recent merge) is split into its two children until `n_clusters`
    /// subtrees remain. Clusters are numbered in order of their lowest point
    /// index, so point `0` is always in cluster `0`.
    /// `n_clusters < 2` puts every point in cluster `0`; values above the
    /// point count are clamped to it.
    #[must_use]
    pub fn cut(&self, n_clusters: usize) -> Vec<usize> {
        let mut labels = vec![0; self.node_count];
        if n_clusters < 2 || self.node_count < 2 {
            return labels;
        }

        let target = n_clusters.min(self.node_count);
        let mut frontier = BinaryHeap::from([self.root()]);
        while frontier.len() < target {
            let Some(node) = frontier.pop() else { break };
            match self.children(node) {
                Some((left, right)) => {
                    frontier.push(left);
                    frontier.push(right);
                }
                None => {
                    frontier.push(node);
                    break;
                }
            }
        }

        let mut owner = vec![0; self.node_count];
        for root in frontier {
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                match self.children(node) {
                    Some((left, right)) => {
                        stack.push(left);
                        stack.push(right);
                    }
                    None => {
                        if let Some(slot) = owner.get_mut(node) {
                            *slot = root;
                        }
                    }
                }
            }
        }

        let mut numbering = HashMap::with_capacity(target);
        for (slot, root) in labels.iter_mut().zip(owner) {
            let next = numbering.len();
            *slot = *numbering.entry(root).or_insert(next);
        }
        labels
    }
}

fn validate_edge(node_count: usize, edge: &MstEdge) -> Result<(), HierarchyError> {
    for node in [edge.source(), edge.target()] {
        if node >= node_count {
            return Err(HierarchyError::InvalidNodeId { node, node_count });
        }
    }
    let weight = edge.weight();
    if !weight.is_finite() || weight < 0.0 {
        return Err(HierarchyError::InvalidEdgeWeight {
            left: edge.source(),
            right: edge.target(),
            weight,
        });
    }
    Ok(())
}
