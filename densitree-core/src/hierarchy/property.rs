//! Property-based tests for hierarchy extraction.
//!
//! Inputs are random points on a line turned into mutual-reachability
//! matrices, so every stage runs on realistic, tie-heavy data.

use std::{collections::BTreeSet, num::NonZeroUsize};

use proptest::prelude::*;

use crate::{
    mst::prim_mst,
    reachability::{core_distances, mutual_reachability},
    test_utils::{line_matrix, suite_proptest_config},
};

use super::{CondensedTree, Dendrogram, compute_stability, label_points, select_clusters};

fn dendrogram_strategy() -> impl Strategy<Value = (Dendrogram, NonZeroUsize)> {
    (
        prop::collection::vec(0_u16..256, 3..48),
        1_usize..4,
        2_usize..6,
    )
        .prop_map(|(coords, min_samples, min_cluster_size)| {
            let points: Vec<f32> = coords.iter().map(|&c| f32::from(c) / 4.0).collect();
            let matrix = line_matrix(&points);
            let samples = NonZeroUsize::new(min_samples.min(points.len() - 1))
                .expect("min_samples stays positive");
            let core = core_distances(&matrix, samples).expect("core distances");
            let reach = mutual_reachability(&matrix, &core).expect("mutual reachability");
            let mst = prim_mst(&reach).expect("mst");
            let dendrogram = Dendrogram::from_mst(points.len(), &mst).expect("dendrogram");
            let size = NonZeroUsize::new(min_cluster_size).expect("positive");
            (dendrogram, size)
        })
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn dendrogram_is_a_strict_binary_tree((dendrogram, _size) in dendrogram_strategy()) {
        let n = dendrogram.node_count();
        prop_assert_eq!(dendrogram.root(), 2 * (n - 1));
        prop_assert_eq!(dendrogram.size_of(dendrogram.root()), n);
        let merges = dendrogram.merges();
        prop_assert!(merges.windows(2).all(|pair| pair[0].weight() <= pair[1].weight()));

        let mut seen = BTreeSet::new();
        for (index, merge) in merges.iter().enumerate() {
            prop_assert!(merge.left() < merge.right());
            prop_assert!(merge.right() < n + index);
            prop_assert!(seen.insert(merge.left()));
            prop_assert!(seen.insert(merge.right()));
        }
        prop_assert_eq!(seen.len(), 2 * n - 2);
    }

    #[test]
    fn condensed_tree_drops_every_point_once((dendrogram, size) in dendrogram_strategy()) {
        let tree = CondensedTree::from_dendrogram(&dendrogram, size);
        let mut points: Vec<usize> = tree
            .nodes()
            .iter()
            .filter(|node| !node.is_cluster())
            .map(|node| node.child())
            .collect();
        points.sort_unstable();
        prop_assert_eq!(points, (0..dendrogram.node_count()).collect::<Vec<_>>());
        for node in tree.nodes() {
            prop_assert!(node.parent() >= tree.root());
            prop_assert!(node.lambda() >= 0.0);
            if node.is_cluster() {
                prop_assert!(node.size() >= size.get());
            }
        }
    }

    #[test]
    fn selection_labels_are_dense((dendrogram, size) in dendrogram_strategy()) {
        let tree = CondensedTree::from_dendrogram(&dendrogram, size);
        let stability = compute_stability(&tree);
        prop_assert!(stability.values().all(|value| !value.is_nan() && *value >= 0.0));

        let selected = select_clusters(&tree, &stability);
        prop_assert!(!selected.contains(&tree.root()));
        let labels = label_points(&tree, &selected);
        prop_assert_eq!(labels.len(), dendrogram.node_count());

        let used: BTreeSet<usize> = labels.iter().flatten().copied().collect();
        prop_assert_eq!(used, (0..selected.len()).collect::<BTreeSet<_>>());
    }
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn cut_yields_the_requested_cluster_count(
        (dendrogram, _size) in dendrogram_strategy(),
        requested in 0_usize..64,
    ) {
        let n = dendrogram.node_count();
        let labels = dendrogram.cut(requested);
        prop_assert_eq!(labels.len(), n);

        let distinct: BTreeSet<usize> = labels.iter().copied().collect();
        let expected = requested.clamp(1, n);
        prop_assert_eq!(distinct, (0..expected).collect::<BTreeSet<_>>());
        let mut next_new = 0;
        for &label in &labels {
            prop_assert!(label <= next_new, "label {} opened out of order", label);
            if label == next_new {
                next_new += 1;
            }
        }
        prop_assert!(dendrogram.cut(1).iter().all(|&label| label == 0));
        prop_assert_eq!(
            dendrogram.cut(n).iter().copied().collect::<BTreeSet<_>>().len(),
            n
        );
    }

    #[test]
    fn larger_min_cluster_size_never_adds_clusters((dendrogram, _size) in dendrogram_strategy()) {
        let promoted = |size: usize| {
            let size = NonZeroUsize::new(size).expect("positive");
            CondensedTree::from_dendrogram(&dendrogram, size)
                .nodes()
                .iter()
                .filter(|node| node.is_cluster())
                .count()
        };
        let counts: Vec<usize> = (2..=dendrogram.node_count()).map(promoted).collect();
        prop_assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]), "{counts:?}");
    }
}
