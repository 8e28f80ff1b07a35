//! Result types for clustering operations.
//!
//! Provides the flat label vector returned by every estimator together with
//! validation of the cluster identifier constraints.

use std::collections::BTreeSet;

use thiserror::Error;

/// Label assigned to points that belong to no cluster.
pub const NOISE: i32 = -1;

/// Flat cluster labels, one per input point.
///
/// Labels are `-1` for noise and otherwise dense in `0..cluster_count()`.
///
/// # Examples
/// ```
/// use densitree_core::ClusterLabels;
///
/// let labels = ClusterLabels::try_from_labels(vec![0, 0, -1, 1])?;
/// assert_eq!(labels.cluster_count(), 2);
/// assert_eq!(labels.noise_count(), 1);
/// assert_eq!(labels.as_slice(), &[0, 0, -1, 1]);
/// # Ok::<(), densitree_core::NonContiguousClusterIds>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterLabels {
    labels: Vec<i32>,
    cluster_count: usize,
}

/// Error returned when cluster labels are not contiguous starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NonContiguousClusterIds {
    /// The labels assign clusters but never use label `0`.
    #[error("cluster labels must include 0")]
    MissingZero,
    /// The labels skip identifiers.
    #[error("cluster labels must be contiguous without gaps")]
    Gap,
    /// A label below the noise marker was supplied.
    #[error("cluster label {label} is below the noise label -1")]
    InvalidLabel {
        /// The offending label.
        label: i32,
    },
    /// The labels require identifiers beyond what an `i32` can represent.
    #[error("cluster identifiers exceed the i32 label range")]
    Overflow,
}

impl ClusterLabels {
    /// Attempts to build labels from raw `i32` values.
    ///
    /// An empty or all-noise vector is accepted and yields `cluster_count == 0`.
    ///
    /// # Errors
    /// Returns [`NonContiguousClusterIds::InvalidLabel`] for values below `-1`,
    /// [`NonContiguousClusterIds::MissingZero`] when clusters exist but `0` is
    /// absent, and [`NonContiguousClusterIds::Gap`] when identifiers skip values.
    pub fn try_from_labels(labels: Vec<i32>) -> Result<Self, NonContiguousClusterIds> {
        let mut seen = BTreeSet::new();
        for &label in &labels {
            match label {
                NOISE => {}
                value if value < NOISE => {
                    return Err(NonContiguousClusterIds::InvalidLabel { label: value });
                }
                value => {
                    seen.insert(value);
                }
            }
        }

        let cluster_count = match seen.last() {
            None => 0,
            Some(&max) => {
                if seen.first() != Some(&0) {
                    return Err(NonContiguousClusterIds::MissingZero);
                }
                let count = usize::try_from(max)
                    .map_err(|_| NonContiguousClusterIds::Overflow)?
                    .checked_add(1)
                    .ok_or(NonContiguousClusterIds::Overflow)?;
                if count != seen.len() {
                    return Err(NonContiguousClusterIds::Gap);
                }
                count
            }
        };

        Ok(Self {
            labels,
            cluster_count,
        })
    }

    /// Builds labels from per-point cluster indices where `None` marks noise.
    ///
    /// # Errors
    /// Returns [`NonContiguousClusterIds::Overflow`] when an index does not fit
    /// in an `i32`, otherwise the errors of [`Self::try_from_labels`].
    pub fn try_from_assignments(
        assignments: impl IntoIterator<Item = Option<usize>>,
    ) -> Result<Self, NonContiguousClusterIds> {
        let labels = assignments
            .into_iter()
            .map(|assignment| match assignment {
                None => Ok(NOISE),
                Some(index) => {
                    i32::try_from(index).map_err(|_| NonContiguousClusterIds::Overflow)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_labels(labels)
    }

    /// Returns the labels as a slice.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_slice(&self) -> &[i32] { &self.labels }

    /// Returns the number of distinct clusters, excluding noise.
    #[must_use]
    #[rustfmt::skip]
    pub fn cluster_count(&self) -> usize { self.cluster_count }

    /// Returns the number of points labelled as noise.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|&&label| label == NOISE).count()
    }

    /// Returns the number of labelled points.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.labels.len() }

    /// Returns `true` when no points were labelled.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Returns the label of `point`, if present.
    #[must_use]
    pub fn get(&self, point: usize) -> Option<i32> {
        self.labels.get(point).copied()
    }

    /// Consumes the wrapper and returns the raw labels.
    #[must_use]
    pub fn into_inner(self) -> Vec<i32> {
        self.labels
    }
}

impl AsRef<[i32]> for ClusterLabels {
    fn as_ref(&self) -> &[i32] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![-1, -1], 0)]
    #[case(vec![0, 0, 0], 1)]
    #[case(vec![1, -1, 0, 2, 1], 3)]
    fn accepts_contiguous_labels(#[case] labels: Vec<i32>, #[case] expected: usize) {
        let result = ClusterLabels::try_from_labels(labels).expect("labels should be valid");
        assert_eq!(result.cluster_count(), expected);
    }

    #[rstest]
    #[case(vec![1, 2], NonContiguousClusterIds::MissingZero)]
    #[case(vec![0, 2], NonContiguousClusterIds::Gap)]
    #[case(vec![0, -3], NonContiguousClusterIds::InvalidLabel { label: -3 })]
    fn rejects_invalid_labels(#[case] labels: Vec<i32>, #[case] expected: NonContiguousClusterIds) {
        assert_eq!(ClusterLabels::try_from_labels(labels), Err(expected));
    }

    #[rstest]
    fn assignments_map_none_to_noise() {
        let labels = ClusterLabels::try_from_assignments([Some(0), None, Some(1)])
            .expect("assignments should be valid");
        assert_eq!(labels.as_slice(), &[0, NOISE, 1]);
        assert_eq!(labels.noise_count(), 1);
        assert_eq!(labels.get(1), Some(NOISE));
        assert_eq!(labels.get(3), None);
    }

    #[rstest]
    fn assignments_reject_overflowing_indices() {
        let oversized = usize::try_from(i32::MAX).expect("i32::MAX fits in usize") + 1;
        assert_eq!(
            ClusterLabels::try_from_assignments([Some(oversized)]),
            Err(NonContiguousClusterIds::Overflow)
        );
    }
}
