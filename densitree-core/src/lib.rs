//! Densitree core library.
//!
//! HDBSCAN and single-linkage clustering over dense distance matrices.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod datasource;
mod distance;
mod error;
mod hdbscan;
mod hierarchy;
mod linkage;
mod matrix;
mod mst;
mod observe;
mod reachability;
mod result;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{HdbscanBuilder, Metric, SingleLinkageBuilder},
    datasource::DataSource,
    distance::{DistanceError, VectorKind, euclidean_distance},
    error::{DataSourceError, DataSourceErrorCode, DensitreeError, DensitreeErrorCode, Result},
    hdbscan::{Hdbscan, HdbscanModel},
    hierarchy::{
        CondensedNode, CondensedTree, Dendrogram, HierarchyError, HierarchyErrorCode, Merge,
        compute_stability, label_points, select_clusters,
    },
    linkage::{SingleLinkage, SingleLinkageModel},
    matrix::{DistanceMatrix, FeatureMatrix},
    mst::{MstEdge, MstError, MstErrorCode, prim_mst, sort_edges, total_weight},
    reachability::{ReachabilityError, ReachabilityErrorCode, core_distances, mutual_reachability},
    result::{ClusterLabels, NOISE, NonContiguousClusterIds},
};
