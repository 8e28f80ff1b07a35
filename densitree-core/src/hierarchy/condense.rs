//! Condensation of a single-linkage dendrogram.
//!
//! The condensed tree follows the HDBSCAN procedure: a cluster only splits
//! when both children hold at least `min_cluster_size` points. A smaller
//! child sheds its points one by one as the density rises, while the larger
//! child continues under its parent's id.

use std::{collections::BTreeSet, num::NonZeroUsize};

use super::dendrogram::Dendrogram;

/// One entry of the condensed tree.
///
/// `child` is a point id (`< n`) when `size == 1` and a cluster id (`>= n`)
/// otherwise. `lambda` is the density `1 / distance` at which the child left
/// `parent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CondensedNode {
    parent: usize,
    child: usize,
    lambda: f32,
    size: usize,
}

impl CondensedNode {
    /// Returns the cluster the child departed from.
    #[must_use]
    #[rustfmt::skip]
    pub fn parent(&self) -> usize { self.parent }

    /// Returns the departing point or cluster id.
    #[must_use]
    #[rustfmt::skip]
    pub fn child(&self) -> usize { self.child }

    /// Returns the density at which the child departed.
    #[must_use]
    #[rustfmt::skip]
    pub fn lambda(&self) -> f32 { self.lambda }

    /// Returns the number of points carried by the child.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.size }

    /// Returns `true` when the child is a cluster rather than a single point.
    #[must_use]
    pub fn is_cluster(&self) -> bool {
        self.size > 1
    }
}

/// Condensed cluster tree over `n` points.
///
/// The root cluster has id `n`; new clusters are numbered `n + 1, n + 2, ...`
/// in the breadth-first order in which they are created.
#[derive(Clone, Debug, PartialEq)]
pub struct CondensedTree {
    point_count: usize,
    nodes: Vec<CondensedNode>,
}

impl CondensedTree {
    /// Condenses `dendrogram` with the given minimum cluster size.
    ///
    /// Sizes below two behave as two: a single point never forms a cluster.
    ///
    /// # Examples
    /// ```
    /// use std::num::NonZeroUsize;
    /// use densitree_core::{CondensedTree, Dendrogram, MstEdge};
    ///
    /// let edges = [
    ///     MstEdge::new(0, 1, 1.0),
    ///     MstEdge::new(1, 2, 4.0),
    ///     MstEdge::new(2, 3, 1.0),
    /// ];
    /// let dendrogram = Dendrogram::from_mst(4, &edges)?;
    /// let tree = CondensedTree::from_dendrogram(&dendrogram, NonZeroUsize::new(2).unwrap());
    ///
    /// assert_eq!(tree.root(), 4);
    /// assert_eq!(tree.cluster_ids(), [4, 5, 6]);
    /// assert_eq!(tree.nodes().len(), 6);
    /// # Ok::<(), densitree_core::HierarchyError>(())
    /// ```
    #[must_use]
    pub fn from_dendrogram(dendrogram: &Dendrogram, min_cluster_size: NonZeroUsize) -> Self {
        CondenseBuilder::new(dendrogram, min_cluster_size.get().max(2)).build()
    }

    /// Returns the number of original points.
    #[must_use]
    #[rustfmt::skip]
    pub fn point_count(&self) -> usize { self.point_count }

    /// Returns the entries in emission order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[CondensedNode] { &self.nodes }

    /// Returns the root cluster id, which equals the point count.
    #[must_use]
    #[rustfmt::skip]
    pub fn root(&self) -> usize { self.point_count }

    /// Returns `true` when the tree has no entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns every cluster id in ascending order, including the root.
    #[must_use]
    pub fn cluster_ids(&self) -> Vec<usize> {
        let mut ids: BTreeSet<usize> = self.nodes.iter().map(CondensedNode::parent).collect();
        ids.extend(
            self.nodes
                .iter()
                .filter(|node| node.is_cluster())
                .map(CondensedNode::child),
        );
        ids.into_iter().collect()
    }
}

struct CondenseBuilder<'a> {
    dendrogram: &'a Dendrogram,
    min_cluster_size: usize,
    relabel: Vec<usize>,
    ignore: Vec<bool>,
    next_label: usize,
    nodes: Vec<CondensedNode>,
}

impl<'a> CondenseBuilder<'a> {
    fn new(dendrogram: &'a Dendrogram, min_cluster_size: usize) -> Self {
        let point_count = dendrogram.node_count();
        let slots = dendrogram.root() + 1;
        Self {
            dendrogram,
            min_cluster_size,
            relabel: vec![point_count; slots],
            ignore: vec![false; slots],
            next_label: point_count + 1,
            nodes: Vec::new(),
        }
    }

    fn build(mut self) -> CondensedTree {
        let point_count = self.dendrogram.node_count();
        for node in self.dendrogram.breadth_first(self.dendrogram.root()) {
            if node < point_count || self.ignore[node] {
                continue;
            }
            self.condense_node(node);
        }
        CondensedTree {
            point_count,
            nodes: self.nodes,
        }
    }

    fn condense_node(&mut self, node: usize) {
        let Some(merge) = self.dendrogram.merge(node) else {
            return;
        };
        let (left, right) = (merge.left(), merge.right());
        let lambda = weight_to_lambda(merge.weight());
        let label = self.relabel[node];
        let left_size = self.dendrogram.size_of(left);
        let right_size = self.dendrogram.size_of(right);
        let left_big = left_size >= self.min_cluster_size;
        let right_big = right_size >= self.min_cluster_size;

        match (left_big, right_big) {
            (true, true) => {
                self.promote(label, left, lambda, left_size);
                self.promote(label, right, lambda, right_size);
            }
            (true, false) => {
                self.relabel[left] = label;
                self.emit_pruned_points(right, label, lambda);
            }
            (false, true) => {
                self.relabel[right] = label;
                self.emit_pruned_points(left, label, lambda);
            }
            (false, false) => {
                self.emit_pruned_points(left, label, lambda);
                self.emit_pruned_points(right, label, lambda);
            }
        }
    }

    fn promote(&mut self, parent: usize, child: usize, lambda: f32, size: usize) {
        let cluster = self.next_label;
        self.next_label += 1;
        self.relabel[child] = cluster;
        self.nodes.push(CondensedNode {
            parent,
            child: cluster,
            lambda,
            size,
        });
    }

    fn emit_pruned_points(&mut self, subtree: usize, parent: usize, lambda: f32) {
        let point_count = self.dendrogram.node_count();
        for node in self.dendrogram.breadth_first(subtree) {
            self.ignore[node] = true;
            if node < point_count {
                self.nodes.push(CondensedNode {
                    parent,
                    child: node,
                    lambda,
                    size: 1,
                });
            }
        }
    }
}

fn weight_to_lambda(weight: f32) -> f32 {
    if weight > 0.0 {
        1.0 / weight
    } else {
        f32::INFINITY
    }
}
