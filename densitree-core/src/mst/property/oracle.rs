//! Sequential Kruskal oracle for MST property verification.
//!
//! Provides a simple, trusted implementation of Kruskal's algorithm over
//! every pair of a dense matrix for use as a reference in property tests.

use crate::DistanceMatrix;

/// Returns the accepted MST weights in ascending order.
pub(super) fn kruskal_weights(matrix: &DistanceMatrix) -> Vec<f32> {
    let node_count = matrix.size();
    let mut pairs = Vec::with_capacity(node_count * node_count / 2);
    for left in 0..node_count {
        for right in (left + 1)..node_count {
            if let Some(weight) = matrix.get(left, right) {
                pairs.push((weight, left, right));
            }
        }
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut parent: Vec<usize> = (0..node_count).collect();
    let mut accepted = Vec::with_capacity(node_count.saturating_sub(1));
    for (weight, left, right) in pairs {
        let left_root = find_root(&mut parent, left);
        let right_root = find_root(&mut parent, right);
        if left_root != right_root {
            parent[right_root] = left_root;
            accepted.push(weight);
        }
    }
    accepted
}

fn find_root(parent: &mut [usize], node: usize) -> usize {
    let mut current = node;
    while parent[current] != current {
        parent[current] = parent[parent[current]];
        current = parent[current];
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::line_matrix;

    #[test]
    fn oracle_accepts_adjacent_gaps_on_a_line() {
        assert_eq!(
            kruskal_weights(&line_matrix(&[0.0, 4.0, 5.0, 7.0])),
            [1.0, 2.0, 4.0]
        );
    }
}
