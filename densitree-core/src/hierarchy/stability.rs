//! Cluster stability ("excess of mass") scoring.

use std::collections::BTreeMap;

use super::condense::{CondensedNode, CondensedTree};

/// Computes the stability of every non-root cluster of `tree`.
///
/// A cluster's birth density is the smallest `lambda` at which it appears as
/// a child; the root is born at `0`. Each entry contributes
/// `(lambda - birth(parent)) * size` to its parent. Clusters that shed
/// nothing report a stability of `0`.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use densitree_core::{CondensedTree, Dendrogram, MstEdge, compute_stability};
///
/// let edges = [
///     MstEdge::new(0, 1, 1.0),
///     MstEdge::new(1, 2, 4.0),
///     MstEdge::new(2, 3, 1.0),
/// ];
/// let dendrogram = Dendrogram::from_mst(4, &edges)?;
/// let tree = CondensedTree::from_dendrogram(&dendrogram, NonZeroUsize::new(2).unwrap());
/// let stability = compute_stability(&tree);
///
/// assert_eq!(stability.keys().copied().collect::<Vec<_>>(), [5, 6]);
/// assert_eq!(stability[&5], 1.5);
/// # Ok::<(), densitree_core::HierarchyError>(())
/// ```
#[must_use]
pub fn compute_stability(tree: &CondensedTree) -> BTreeMap<usize, f32> {
    let Some(root) = tree.nodes().iter().map(CondensedNode::parent).min() else {
        return BTreeMap::new();
    };

    let births = birth_densities(tree.nodes(), root);
    let mut stability: BTreeMap<usize, f32> = births
        .keys()
        .filter(|&&id| id != root)
        .map(|&id| (id, 0.0))
        .collect();

    for node in tree.nodes() {
        if node.parent() == root {
            continue;
        }
        let birth = births.get(&node.parent()).copied().unwrap_or(0.0);
        *stability.entry(node.parent()).or_insert(0.0) +=
            excess(node.lambda(), birth) * node.size() as f32;
    }
    stability
}

/// Returns the birth density of every cluster, keyed by id.
///
/// Entries are scanned sorted by child id so each cluster's appearances form
/// one contiguous run.
fn birth_densities(nodes: &[CondensedNode], root: usize) -> BTreeMap<usize, f32> {
    let mut by_child: Vec<&CondensedNode> = nodes.iter().collect();
    by_child.sort_by(|a, b| {
        a.child()
            .cmp(&b.child())
            .then(a.lambda().total_cmp(&b.lambda()))
    });

    let mut births = BTreeMap::from([(root, 0.0)]);
    let mut current: Option<(usize, f32)> = None;
    for node in by_child.into_iter().filter(|node| node.child() >= root) {
        current = match current {
            Some((child, lambda)) if child == node.child() => Some((child, lambda.min(node.lambda()))),
            Some((child, lambda)) => {
                births.insert(child, lambda);
                Some((node.child(), node.lambda()))
            }
            None => Some((node.child(), node.lambda())),
        };
    }
    if let Some((child, lambda)) = current {
        births.insert(child, lambda);
    }
    births
}

/// Density gained between birth and departure. Departures at the birth
/// density, including both being infinite, contribute nothing.
fn excess(lambda: f32, birth: f32) -> f32 {
    if lambda > birth { lambda - birth } else { 0.0 }
}
