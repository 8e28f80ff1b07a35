//! Error types for the densitree core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{
    distance::DistanceError, hierarchy::HierarchyError, mst::MstError,
    reachability::ReachabilityError, result::NonContiguousClusterIds,
};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DataSource`] operations and matrix ingestion.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested row that exceeded the source bounds.
        index: usize,
    },
    /// A feature row had a different width from the first row.
    #[error("row {row} has {actual} columns but {expected} were expected")]
    RaggedRows {
        /// Offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A precomputed distance matrix was not square.
    #[error("distance matrix row {row} has {actual} columns but the matrix has {expected} rows")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Number of rows in the matrix.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A feature value was NaN or infinite.
    #[error("feature at row {row}, column {column} is not finite")]
    NonFiniteFeature {
        /// Row holding the value.
        row: usize,
        /// Column holding the value.
        column: usize,
    },
    /// A precomputed distance was NaN or negative.
    #[error("distance at row {row}, column {column} must be a non-negative number")]
    InvalidDistance {
        /// Row holding the value.
        row: usize,
        /// Column holding the value.
        column: usize,
    },
    /// Data source contained no rows.
    #[error("data source contains no rows")]
    EmptyData,
    /// Data source rows must have positive dimension.
    #[error("data source vectors must have positive dimension")]
    ZeroDimension,
    /// A distance kernel rejected its inputs.
    #[error(transparent)]
    Distance(#[from] DistanceError),
}

define_error_codes! {
    /// Stable codes describing [`DataSourceError`] variants.
    enum DataSourceErrorCode for DataSourceError {
        /// Requested index was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATA_SOURCE_OUT_OF_BOUNDS",
        /// A feature row had a different width from the first row.
        RaggedRows => RaggedRows { .. } => "DATA_SOURCE_RAGGED_ROWS",
        /// A precomputed distance matrix was not square.
        NotSquare => NotSquare { .. } => "DATA_SOURCE_NOT_SQUARE",
        /// A feature value was NaN or infinite.
        NonFiniteFeature => NonFiniteFeature { .. } => "DATA_SOURCE_NON_FINITE_FEATURE",
        /// A precomputed distance was NaN or negative.
        InvalidDistance => InvalidDistance { .. } => "DATA_SOURCE_INVALID_DISTANCE",
        /// Data source contained no rows.
        EmptyData => EmptyData => "DATA_SOURCE_EMPTY",
        /// Data source rows must have positive dimension.
        ZeroDimension => ZeroDimension => "DATA_SOURCE_ZERO_DIMENSION",
        /// A distance kernel rejected its inputs.
        Distance => Distance(..) => "DATA_SOURCE_DISTANCE",
    }
}

/// Error type produced when configuring or fitting an estimator.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DensitreeError {
    /// `min_samples` must be greater than zero.
    #[error("min_samples must be at least 1 (got {got})")]
    InvalidMinSamples {
        /// The invalid value supplied by the caller.
        got: usize,
    },
    /// `min_cluster_size` must be greater than zero.
    #[error("min_cluster_size must be at least 1 (got {got})")]
    InvalidMinClusterSize {
        /// The invalid value supplied by the caller.
        got: usize,
    },
    /// `n_clusters` must be greater than zero.
    #[error("n_clusters must be at least 1 (got {got})")]
    InvalidClusterCount {
        /// The invalid value supplied by the caller.
        got: usize,
    },
    /// The supplied data contained no items.
    #[error("data source `{data_source}` contains no items")]
    EmptySource {
        /// Identifier for the empty data source.
        data_source: Arc<str>,
    },
    /// The data did not contain more items than `min_samples`.
    #[error(
        "data source `{data_source}` has {items} items but min_samples {min_samples} requires more"
    )]
    InsufficientItems {
        /// Identifier for the data source that lacked sufficient items.
        data_source: Arc<str>,
        /// Number of items available in the data source.
        items: usize,
        /// Configured `min_samples`.
        min_samples: usize,
    },
    /// Reading or validating the input data failed.
    #[error("data source `{data_source}` failed: {error}")]
    DataSource {
        /// Identifier for the data source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying data source error.
        error: DataSourceError,
    },
    /// Core-distance or mutual-reachability computation failed.
    #[error("mutual reachability failed: {0}")]
    Reachability(#[source] ReachabilityError),
    /// Minimum spanning tree construction failed.
    #[error("minimum spanning tree construction failed: {0}")]
    Mst(#[source] MstError),
    /// Building or condensing the hierarchy failed.
    #[error("hierarchy construction failed: {0}")]
    Hierarchy(#[source] HierarchyError),
    /// The produced labels could not be represented.
    #[error("cluster labels are invalid: {0}")]
    Labels(#[source] NonContiguousClusterIds),
}

define_error_codes! {
    /// Stable codes describing [`DensitreeError`] variants.
    enum DensitreeErrorCode for DensitreeError {
        /// `min_samples` must be greater than zero.
        InvalidMinSamples => InvalidMinSamples { .. } => "DENSITREE_INVALID_MIN_SAMPLES",
        /// `min_cluster_size` must be greater than zero.
        InvalidMinClusterSize => InvalidMinClusterSize { .. } => "DENSITREE_INVALID_MIN_CLUSTER_SIZE",
        /// `n_clusters` must be greater than zero.
        InvalidClusterCount => InvalidClusterCount { .. } => "DENSITREE_INVALID_CLUSTER_COUNT",
        /// The supplied data contained no items.
        EmptySource => EmptySource { .. } => "DENSITREE_EMPTY_SOURCE",
        /// The data did not contain more items than `min_samples`.
        InsufficientItems => InsufficientItems { .. } => "DENSITREE_INSUFFICIENT_ITEMS",
        /// Reading or validating the input data failed.
        DataSourceFailure => DataSource { .. } => "DENSITREE_DATA_SOURCE_FAILURE",
        /// Core-distance or mutual-reachability computation failed.
        ReachabilityFailure => Reachability(..) => "DENSITREE_REACHABILITY_FAILURE",
        /// Minimum spanning tree construction failed.
        MstFailure => Mst(..) => "DENSITREE_MST_FAILURE",
        /// Building or condensing the hierarchy failed.
        HierarchyFailure => Hierarchy(..) => "DENSITREE_HIERARCHY_FAILURE",
        /// The produced labels could not be represented.
        LabelFailure => Labels(..) => "DENSITREE_LABEL_FAILURE",
    }
}

impl DensitreeError {
    pub(crate) fn empty_source(data_source: &str) -> Self {
        Self::EmptySource {
            data_source: Arc::from(data_source),
        }
    }

    pub(crate) fn data_source(data_source: &str, error: DataSourceError) -> Self {
        Self::DataSource {
            data_source: Arc::from(data_source),
            error,
        }
    }

    /// Retrieve the inner [`DataSourceErrorCode`] when the error originated in
    /// a [`crate::DataSource`] or matrix validation.
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::DataSource { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

impl From<ReachabilityError> for DensitreeError {
    fn from(error: ReachabilityError) -> Self {
        Self::Reachability(error)
    }
}

impl From<MstError> for DensitreeError {
    fn from(error: MstError) -> Self {
        Self::Mst(error)
    }
}

impl From<HierarchyError> for DensitreeError {
    fn from(error: HierarchyError) -> Self {
        Self::Hierarchy(error)
    }
}

impl From<NonContiguousClusterIds> for DensitreeError {
    fn from(error: NonContiguousClusterIds) -> Self {
        Self::Labels(error)
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, DensitreeError>;
