//! Excess-of-mass cluster selection and point labelling.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{
    condense::{CondensedNode, CondensedTree},
    union_find::DisjointSet,
};

/// Selects the clusters that maximise total stability.
///
/// Clusters are visited from the highest id down. A cluster whose children
/// are together more stable than itself is dropped and inherits their summed
/// stability; otherwise it is kept and every cluster below it is dropped.
/// The root is never selected.
#[must_use]
pub fn select_clusters(tree: &CondensedTree, stability: &BTreeMap<usize, f32>) -> BTreeSet<usize> {
    let mut children: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for node in cluster_entries(tree) {
        children.entry(node.parent()).or_default().push(node.child());
    }

    let mut scores = stability.clone();
    let mut selected: BTreeMap<usize, bool> = stability.keys().map(|&id| (id, true)).collect();

    for &cluster in stability.keys().rev() {
        let own = scores.get(&cluster).copied().unwrap_or(0.0);
        let subtree: f32 = children
            .get(&cluster)
            .into_iter()
            .flatten()
            .map(|child| scores.get(child).copied().unwrap_or(0.0))
            .sum();

        if subtree > own {
            selected.insert(cluster, false);
            scores.insert(cluster, subtree);
        } else {
            for descendant in cluster_descendants(&children, cluster) {
                selected.insert(descendant, false);
            }
        }
    }

    selected
        .into_iter()
        .filter_map(|(id, keep)| keep.then_some(id))
        .collect()
}

fn cluster_descendants(children: &BTreeMap<usize, Vec<usize>>, cluster: usize) -> Vec<usize> {
    let mut found = Vec::new();
    let mut queue: VecDeque<usize> = children.get(&cluster).into_iter().flatten().copied().collect();
    while let Some(next) = queue.pop_front() {
        found.push(next);
        queue.extend(children.get(&next).into_iter().flatten().copied());
    }
    found
}

/// Assigns every point to the selected cluster containing it.
///
/// Returns one entry per point: `Some(label)` with labels numbered densely in
/// ascending cluster-id order, or `None` for noise.
#[must_use]
pub fn label_points(tree: &CondensedTree, selected: &BTreeSet<usize>) -> Vec<Option<usize>> {
    let point_count = tree.point_count();
    let root = tree.root();
    let Some(max_id) = tree
        .nodes()
        .iter()
        .map(|node| node.parent().max(node.child()))
        .max()
    else {
        return vec![None; point_count];
    };

    let dense: BTreeMap<usize, usize> = selected
        .iter()
        .enumerate()
        .map(|(label, &cluster)| (cluster, label))
        .collect();

    let mut sets = DisjointSet::new(max_id + 1);
    for node in tree.nodes() {
        if !selected.contains(&node.child()) {
            sets.union(node.parent(), node.child());
        }
    }

    (0..point_count)
        .map(|point| {
            let owner = sets.find(point);
            if owner <= root {
                None
            } else {
                dense.get(&owner).copied()
            }
        })
        .collect()
}

fn cluster_entries(tree: &CondensedTree) -> impl Iterator<Item = &CondensedNode> {
    tree.nodes().iter().filter(|node| node.is_cluster())
}
