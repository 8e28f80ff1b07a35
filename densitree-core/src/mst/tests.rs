//! Unit tests for the dense Prim MST implementation.

use rstest::rstest;

use crate::{DistanceMatrix, test_utils::line_matrix};

use super::{MstEdge, MstError, prim_mst, sort_edges, total_weight};

fn matrix(rows: &[&[f32]]) -> DistanceMatrix {
    let rows: Vec<Vec<f32>> = rows.iter().map(|row| row.to_vec()).collect();
    DistanceMatrix::from_rows("fixture", &rows).expect("fixture matrix must be valid")
}

/// Asserts the edges connect all nodes without cycles.
pub(super) fn check_spanning(node_count: usize, edges: &[MstEdge]) {
    let mut parent: Vec<usize> = (0..node_count).collect();

    fn find(parent: &mut [usize], node: usize) -> usize {
        let mut current = node;
        while parent[current] != current {
            let grandparent = parent[parent[current]];
            parent[current] = grandparent;
            current = parent[current];
        }
        current
    }

    assert_eq!(edges.len(), node_count.saturating_sub(1));
    for edge in edges {
        assert!(edge.source() < node_count);
        assert!(edge.target() < node_count);
        assert!(edge.weight().is_finite());
        let left = find(&mut parent, edge.source());
        let right = find(&mut parent, edge.target());
        assert_ne!(left, right, "edge {edge:?} closes a cycle");
        parent[right] = left;
    }
}

#[test]
fn rejects_empty_graph() {
    let empty = DistanceMatrix::from_parts("empty".to_owned(), 0, Vec::new());
    assert_eq!(prim_mst(&empty), Err(MstError::EmptyGraph));
}

#[test]
fn single_node_has_no_edges() {
    let edges = prim_mst(&matrix(&[&[0.0]])).expect("single node must succeed");
    assert!(edges.is_empty());
}

#[rstest]
fn line_produces_adjacent_edges() {
    let edges = prim_mst(&line_matrix(&[0.0, 1.0, 3.0, 6.0])).expect("mst must succeed");
    let triples: Vec<_> = edges
        .iter()
        .map(|edge| (edge.source(), edge.target(), edge.weight()))
        .collect();
    assert_eq!(triples, [(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0)]);
    assert_eq!(total_weight(&edges), 6.0);
}

#[rstest]
fn records_previous_node_as_source() {
    // Node 2 is cheapest to reach from node 0, not from node 1.
    let edges = prim_mst(&matrix(&[
        &[0.0, 1.0, 2.0],
        &[1.0, 0.0, 5.0],
        &[2.0, 5.0, 0.0],
    ]))
    .expect("mst must succeed");
    assert_eq!(
        edges,
        [MstEdge::new(0, 1, 1.0), MstEdge::new(1, 2, 2.0)]
    );
    check_spanning(3, &edges);
}

#[rstest]
fn ties_prefer_lowest_index() {
    let edges = prim_mst(&matrix(&[
        &[0.0, 1.0, 1.0, 1.0],
        &[1.0, 0.0, 1.0, 1.0],
        &[1.0, 1.0, 0.0, 1.0],
        &[1.0, 1.0, 1.0, 0.0],
    ]))
    .expect("mst must succeed");
    let targets: Vec<_> = edges.iter().map(MstEdge::target).collect();
    assert_eq!(targets, [1, 2, 3]);
}

#[rstest]
fn rejects_disconnected_graph() {
    let inf = f32::INFINITY;
    let result = prim_mst(&matrix(&[
        &[0.0, 1.0, inf],
        &[1.0, 0.0, inf],
        &[inf, inf, 0.0],
    ]));
    assert_eq!(
        result,
        Err(MstError::DisconnectedGraph { left: 1, right: 2 })
    );
    assert_eq!(
        MstError::DisconnectedGraph { left: 1, right: 2 }
            .code()
            .as_str(),
        "DISCONNECTED_GRAPH"
    );
}

#[rstest]
fn sort_edges_is_stable() {
    let mut edges = vec![
        MstEdge::new(0, 1, 2.0),
        MstEdge::new(1, 2, 1.0),
        MstEdge::new(2, 3, 2.0),
        MstEdge::new(3, 4, 1.0),
    ];
    sort_edges(&mut edges);
    let order: Vec<_> = edges.iter().map(MstEdge::source).collect();
    assert_eq!(order, [1, 3, 0, 2]);
}
