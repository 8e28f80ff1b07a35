//! Union-find (disjoint set union) utilities used during hierarchy extraction.
//!
//! [`LinkageUnionFind`] allocates a fresh synthetic id for every merge, which
//! is how the dendrogram numbers its internal nodes. [`DisjointSet`] is a
//! plain rank-based structure used when labelling points against the
//! condensed tree.

/// Union-find over the `2n - 1` dendrogram slots.
///
/// Leaves occupy ids `0..n`; the `i`-th merge creates id `n + i` and becomes
/// the parent of both merged roots.
#[derive(Clone, Debug)]
pub(crate) struct LinkageUnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    next_label: usize,
}

impl LinkageUnionFind {
    pub(crate) fn new(node_count: usize) -> Self {
        let slots = (2 * node_count).saturating_sub(1);
        let mut size = vec![0; slots];
        size[..node_count].fill(1);
        Self {
            parent: (0..slots).collect(),
            size,
            next_label: node_count,
        }
    }

    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Merges two roots under the next synthetic id and returns the combined
    /// size. Callers pass roots obtained from [`Self::find`].
    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let label = self.next_label;
        let size = self.size[left] + self.size[right];
        self.parent[left] = label;
        self.parent[right] = label;
        self.size[label] = size;
        self.next_label += 1;
        size
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Joins the sets of `left` and `right`. On equal rank the root of
    /// `left` stays the root.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        left
    }
}
