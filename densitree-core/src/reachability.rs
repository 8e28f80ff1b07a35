//! Core distances and mutual-reachability distances.
//!
//! The core distance of a point is the distance to its `min_samples`-th
//! nearest neighbour, counting the point itself at index zero of its sorted
//! distance row. The mutual-reachability distance between two points is the
//! largest of their raw distance and both core distances.

use std::num::NonZeroUsize;

use crate::matrix::DistanceMatrix;

/// Errors returned while computing core or mutual-reachability distances.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum ReachabilityError {
    /// The distance matrix had no rows.
    #[error("cannot compute core distances for an empty matrix")]
    EmptyMatrix,
    /// `min_samples` selected a neighbour beyond the last point.
    #[error("min_samples {min_samples} must be smaller than the item count {items}")]
    InsufficientSamples {
        /// Configured `min_samples`.
        min_samples: usize,
        /// Number of points in the matrix.
        items: usize,
    },
    /// The number of core distances did not match the matrix size.
    #[error("expected {expected} core distances but received {actual}")]
    CoreDistanceMismatch {
        /// Matrix size.
        expected: usize,
        /// Number of core distances supplied.
        actual: usize,
    },
}

impl ReachabilityError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> ReachabilityErrorCode {
        match self {
            Self::EmptyMatrix => ReachabilityErrorCode::EmptyMatrix,
            Self::InsufficientSamples { .. } => ReachabilityErrorCode::InsufficientSamples,
            Self::CoreDistanceMismatch { .. } => ReachabilityErrorCode::CoreDistanceMismatch,
        }
    }
}

/// Machine-readable error codes for [`ReachabilityError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReachabilityErrorCode {
    /// The distance matrix had no rows.
    EmptyMatrix,
    /// `min_samples` selected a neighbour beyond the last point.
    InsufficientSamples,
    /// The number of core distances did not match the matrix size.
    CoreDistanceMismatch,
}

impl ReachabilityErrorCode {
    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyMatrix => "EMPTY_MATRIX",
            Self::InsufficientSamples => "INSUFFICIENT_SAMPLES",
            Self::CoreDistanceMismatch => "CORE_DISTANCE_MISMATCH",
        }
    }
}

/// Computes the core distance of every point.
///
/// For each row the `min_samples`-th smallest entry (zero-based, so the point
/// itself occupies index zero) is selected without fully sorting the row.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use densitree_core::{DistanceMatrix, core_distances};
///
/// let matrix = DistanceMatrix::from_rows(
///     "line",
///     &[vec![0.0, 1.0, 3.0], vec![1.0, 0.0, 2.0], vec![3.0, 2.0, 0.0]],
/// )?;
/// let core = core_distances(&matrix, NonZeroUsize::MIN)?;
/// assert_eq!(core, [1.0, 1.0, 2.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
/// Returns [`ReachabilityError::EmptyMatrix`] for an empty matrix and
/// [`ReachabilityError::InsufficientSamples`] when `min_samples >= size`.
pub fn core_distances(
    matrix: &DistanceMatrix,
    min_samples: NonZeroUsize,
) -> Result<Vec<f32>, ReachabilityError> {
    let items = matrix.size();
    if items == 0 {
        return Err(ReachabilityError::EmptyMatrix);
    }
    let k = min_samples.get();
    if k >= items {
        return Err(ReachabilityError::InsufficientSamples {
            min_samples: k,
            items,
        });
    }

    let mut scratch = Vec::with_capacity(items);
    Ok(matrix
        .rows()
        .map(|row| {
            scratch.clear();
            scratch.extend_from_slice(row);
            let (_, kth, _) = scratch.select_nth_unstable_by(k, f32::total_cmp);
            *kth
        })
        .collect())
}

/// Builds the mutual-reachability matrix from raw distances and core distances.
///
/// Entry `(i, j)` becomes `max(d(i, j), core[i], core[j])`.
///
/// # Errors
/// Returns [`ReachabilityError::CoreDistanceMismatch`] when
/// `core_distances.len() != matrix.size()`.
pub fn mutual_reachability(
    matrix: &DistanceMatrix,
    core_distances: &[f32],
) -> Result<DistanceMatrix, ReachabilityError> {
    let items = matrix.size();
    if core_distances.len() != items {
        return Err(ReachabilityError::CoreDistanceMismatch {
            expected: items,
            actual: core_distances.len(),
        });
    }

    let mut values = Vec::with_capacity(items * items);
    for (row, &core_row) in matrix.rows().zip(core_distances) {
        values.extend(
            row.iter()
                .zip(core_distances)
                .map(|(&dist, &core_col)| dist.max(core_row).max(core_col)),
        );
    }

    Ok(DistanceMatrix::from_parts(
        matrix.name().to_owned(),
        items,
        values,
    ))
}
