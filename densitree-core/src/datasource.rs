//! The distance interface consumed by the estimators.

use crate::error::DataSourceError;

/// A finite set of items with a pairwise distance.
///
/// Estimators read a source exactly once, row by row, through
/// [`DataSource::distances_from`] while building a
/// [`DistanceMatrix`](crate::DistanceMatrix). Distances must be non-negative
/// and never NaN; infinity marks pairs that are unreachable.
///
/// # Examples
/// ```
/// use densitree_core::{DataSource, DataSourceError};
///
/// struct Line(Vec<f32>);
///
/// impl DataSource for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
///         let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let line = Line(vec![1.0, 2.0, 4.0]);
/// assert_eq!(line.distance(0, 2)?, 3.0);
/// assert_eq!(line.distances_from(1)?, [1.0, 0.0, 2.0]);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Number of items.
    fn len(&self) -> usize;

    /// Whether the source has no items.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Distance between items `i` and `j`.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutOfBounds`] for an index `>= len()`, or
    /// whatever the source reports for items it cannot compare.
    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError>;

    /// Distances from `query` to every item, in index order.
    ///
    /// The default calls [`DataSource::distance`] once per item; sources
    /// with a cheaper row access should override it.
    ///
    /// # Errors
    /// Returns the first error produced by [`DataSource::distance`].
    fn distances_from(&self, query: usize) -> Result<Vec<f32>, DataSourceError> {
        (0..self.len())
            .map(|item| self.distance(query, item))
            .collect()
    }
}
