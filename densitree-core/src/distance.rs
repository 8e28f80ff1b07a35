//! Euclidean distance over `f32` feature vectors.
//!
//! Inputs are checked for shape and finiteness on every call, so bad rows are
//! caught while the distance matrix is being filled.

use core::fmt;

use thiserror::Error;

/// Which argument of a distance call held the offending value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VectorKind {
    /// The first argument.
    Left,
    /// The second argument.
    Right,
}

impl VectorKind {
    /// Lower-case name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pair of vectors has no defined distance.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DistanceError {
    /// At least one vector was empty.
    #[error("cannot measure empty vectors")]
    ZeroLength,
    /// The vectors disagree on dimensionality.
    #[error("vectors have {left} and {right} components")]
    DimensionMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },
    /// A component was NaN or infinite.
    #[error("{which} vector holds {value} at component {index}")]
    NonFinite {
        /// Argument holding the value.
        which: VectorKind,
        /// Component position.
        index: usize,
        /// The rejected value.
        value: f32,
    },
}

/// Computes the Euclidean distance between `left` and `right`.
///
/// The sum of squares is kept in `f64` and only narrowed after the root.
///
/// # Examples
///
/// ```
/// use densitree_core::{euclidean_distance, DistanceError};
///
/// fn main() -> Result<(), DistanceError> {
///     assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0])?, 5.0);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// Returns [`DistanceError::ZeroLength`] for empty input,
/// [`DistanceError::DimensionMismatch`] for unequal lengths, and
/// [`DistanceError::NonFinite`] for NaN or infinite components. Left
/// components are checked before right ones at the same index.
pub fn euclidean_distance(left: &[f32], right: &[f32]) -> Result<f32, DistanceError> {
    if left.is_empty() || right.is_empty() {
        return Err(DistanceError::ZeroLength);
    }
    if left.len() != right.len() {
        return Err(DistanceError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let squared = left
        .iter()
        .zip(right)
        .enumerate()
        .try_fold(0.0_f64, |acc, (index, (&l, &r))| {
            let l = finite(l, VectorKind::Left, index)?;
            let r = finite(r, VectorKind::Right, index)?;
            let delta = l - r;
            Ok(delta.mul_add(delta, acc))
        })?;

    Ok(squared.sqrt() as f32)
}

fn finite(value: f32, which: VectorKind, index: usize) -> Result<f64, DistanceError> {
    if value.is_finite() {
        Ok(f64::from(value))
    } else {
        Err(DistanceError::NonFinite {
            which,
            index,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0.0], &[0.0], 0.0)]
    #[case(&[0.0, 0.0], &[3.0, 4.0], 5.0)]
    #[case(&[-1.0, 2.0, 0.5], &[-1.0, 2.0, 0.5], 0.0)]
    fn euclidean_matches_known_values(
        #[case] left: &[f32],
        #[case] right: &[f32],
        #[case] expected: f32,
    ) {
        let distance = euclidean_distance(left, right).expect("distance must succeed");
        assert!((distance - expected).abs() < 1e-6, "got {distance}");
    }

    #[rstest]
    fn euclidean_is_symmetric() {
        let a = [0.25, -3.5, 8.0];
        let b = [1.0, 1.0, -2.0];
        assert_eq!(
            euclidean_distance(&a, &b).expect("forward"),
            euclidean_distance(&b, &a).expect("reverse")
        );
    }

    #[rstest]
    #[case(&[], &[1.0], DistanceError::ZeroLength)]
    #[case(&[1.0, 2.0], &[1.0], DistanceError::DimensionMismatch { left: 2, right: 1 })]
    fn euclidean_rejects_bad_shapes(
        #[case] left: &[f32],
        #[case] right: &[f32],
        #[case] expected: DistanceError,
    ) {
        assert_eq!(euclidean_distance(left, right), Err(expected));
    }

    #[rstest]
    fn non_finite_message_names_the_side() {
        let err = euclidean_distance(&[f32::NAN], &[0.0]).expect_err("NaN must be rejected");
        assert_eq!(err.to_string(), "left vector holds NaN at component 0");
    }

    #[rstest]
    fn euclidean_reports_non_finite_side() {
        let err = euclidean_distance(&[0.0, 1.0], &[0.0, f32::INFINITY])
            .expect_err("infinity must be rejected");
        assert!(matches!(
            err,
            DistanceError::NonFinite {
                which: VectorKind::Right,
                index: 1,
                ..
            }
        ));
    }
}
