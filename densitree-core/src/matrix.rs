//! Dense row-major matrices used as estimator input.
//!
//! [`FeatureMatrix`] holds validated feature vectors and measures distances
//! with [`euclidean_distance`]. [`DistanceMatrix`] holds a square matrix of
//! pairwise distances, either supplied by the caller or computed from any
//! [`DataSource`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{datasource::DataSource, distance::euclidean_distance, error::DataSourceError};

/// Validated feature vectors of equal, positive dimension.
///
/// # Examples
/// ```
/// use densitree_core::{DataSource, FeatureMatrix};
///
/// let features = FeatureMatrix::from_rows("points", &[vec![0.0, 0.0], vec![3.0, 4.0]])?;
/// assert_eq!(features.len(), 2);
/// assert_eq!(features.dimension(), 2);
/// assert_eq!(features.distance(0, 1)?, 5.0);
/// # Ok::<(), densitree_core::DataSourceError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    name: String,
    rows: usize,
    dimension: usize,
    values: Vec<f32>,
}

impl FeatureMatrix {
    /// Builds a feature matrix from rows of values.
    ///
    /// # Errors
    /// - [`DataSourceError::EmptyData`] when `rows` is empty.
    /// - [`DataSourceError::ZeroDimension`] when the first row is empty.
    /// - [`DataSourceError::RaggedRows`] when a row differs in width from the first.
    /// - [`DataSourceError::NonFiniteFeature`] when a value is NaN or infinite.
    pub fn from_rows(name: impl Into<String>, rows: &[Vec<f32>]) -> Result<Self, DataSourceError> {
        let first = rows.first().ok_or(DataSourceError::EmptyData)?;
        let dimension = first.len();
        if dimension == 0 {
            return Err(DataSourceError::ZeroDimension);
        }

        let mut values = Vec::with_capacity(rows.len() * dimension);
        for (row, data) in rows.iter().enumerate() {
            if data.len() != dimension {
                return Err(DataSourceError::RaggedRows {
                    row,
                    expected: dimension,
                    actual: data.len(),
                });
            }
            if let Some(column) = data.iter().position(|value| !value.is_finite()) {
                return Err(DataSourceError::NonFiniteFeature { row, column });
            }
            values.extend_from_slice(data);
        }

        Ok(Self {
            name: name.into(),
            rows: rows.len(),
            dimension,
            values,
        })
    }

    /// Returns the shared dimension of every row.
    #[must_use]
    #[rustfmt::skip]
    pub fn dimension(&self) -> usize { self.dimension }

    /// Returns the feature vector stored at `index`.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutOfBounds`] when `index >= len()`.
    pub fn row(&self, index: usize) -> Result<&[f32], DataSourceError> {
        if index >= self.rows {
            return Err(DataSourceError::OutOfBounds { index });
        }
        let start = index * self.dimension;
        Ok(&self.values[start..start + self.dimension])
    }
}

impl DataSource for FeatureMatrix {
    fn len(&self) -> usize {
        self.rows
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        Ok(euclidean_distance(self.row(i)?, self.row(j)?)?)
    }
}

/// Square matrix of pairwise distances in row-major order.
///
/// Entries are non-negative and never NaN. Infinite entries are allowed and
/// mark pairs with no finite path between them.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    name: String,
    size: usize,
    values: Vec<f32>,
}

impl DistanceMatrix {
    /// Builds a distance matrix from caller-supplied rows.
    ///
    /// The matrix is taken as given: symmetry is not enforced and the
    /// diagonal is not rewritten.
    ///
    /// # Examples
    /// ```
    /// use densitree_core::{DataSourceError, DistanceMatrix};
    ///
    /// let matrix = DistanceMatrix::from_rows("pair", &[vec![0.0, 1.5], vec![1.5, 0.0]])?;
    /// assert_eq!(matrix.size(), 2);
    /// assert_eq!(matrix.get(0, 1), Some(1.5));
    ///
    /// let err = DistanceMatrix::from_rows("ragged", &[vec![0.0, 1.0], vec![1.0]])
    ///     .expect_err("ragged rows are not square");
    /// assert!(matches!(err, DataSourceError::NotSquare { row: 1, .. }));
    /// # Ok::<(), DataSourceError>(())
    /// ```
    ///
    /// # Errors
    /// - [`DataSourceError::EmptyData`] when `rows` is empty.
    /// - [`DataSourceError::NotSquare`] when any row length differs from the row count.
    /// - [`DataSourceError::InvalidDistance`] when an entry is NaN or negative.
    pub fn from_rows(name: impl Into<String>, rows: &[Vec<f32>]) -> Result<Self, DataSourceError> {
        let size = rows.len();
        if size == 0 {
            return Err(DataSourceError::EmptyData);
        }
        if let Some((row, data)) = rows.iter().enumerate().find(|(_, data)| data.len() != size) {
            return Err(DataSourceError::NotSquare {
                row,
                expected: size,
                actual: data.len(),
            });
        }

        let mut values = Vec::with_capacity(size * size);
        for (row, data) in rows.iter().enumerate() {
            if let Some(column) = data.iter().position(|value| value.is_nan() || *value < 0.0) {
                return Err(DataSourceError::InvalidDistance { row, column });
            }
            values.extend_from_slice(data);
        }

        Ok(Self {
            name: name.into(),
            size,
            values,
        })
    }

    /// Computes every pairwise distance of `source`.
    ///
    /// Rows are computed in parallel when the `parallel` feature is enabled.
    /// The diagonal is fixed at zero.
    ///
    /// # Errors
    /// Returns [`DataSourceError::EmptyData`] for an empty source, any error
    /// surfaced by [`DataSource::distances_from`], and
    /// [`DataSourceError::InvalidDistance`] when the source yields a NaN or
    /// negative distance.
    pub fn from_source<D: DataSource + Sync>(source: &D) -> Result<Self, DataSourceError> {
        let size = source.len();
        if size == 0 {
            return Err(DataSourceError::EmptyData);
        }
        #[cfg(feature = "parallel")]
        let rows = (0..size)
            .into_par_iter()
            .map(|row| distance_row(source, row))
            .collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let rows = (0..size)
            .map(|row| distance_row(source, row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: source.name().to_owned(),
            size,
            values: rows.concat(),
        })
    }

    /// Builds a matrix from already validated row-major values.
    pub(crate) fn from_parts(name: String, size: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), size * size);
        Self { name, size, values }
    }

    /// Returns the number of rows (and columns).
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.size }

    /// Returns the matrix name used in diagnostics.
    #[must_use]
    #[rustfmt::skip]
    pub fn name(&self) -> &str { &self.name }

    /// Returns the distance between `i` and `j`, if both are in range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.values.get(i * self.size + j).copied()
    }

    /// Returns row `i`, if in range.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.size {
            return None;
        }
        let start = i * self.size;
        self.values.get(start..start + self.size)
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f32]> {
        self.values.chunks_exact(self.size.max(1))
    }
}

impl DataSource for DistanceMatrix {
    fn len(&self) -> usize {
        self.size
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        self.get(i, j).ok_or(DataSourceError::OutOfBounds {
            index: if i >= self.size { i } else { j },
        })
    }

    fn distances_from(&self, query: usize) -> Result<Vec<f32>, DataSourceError> {
        self.row(query)
            .map(<[f32]>::to_vec)
            .ok_or(DataSourceError::OutOfBounds { index: query })
    }
}

fn distance_row<D: DataSource>(source: &D, row: usize) -> Result<Vec<f32>, DataSourceError> {
    let mut distances = source.distances_from(row)?;
    if let Some(column) = distances
        .iter()
        .position(|value| value.is_nan() || *value < 0.0)
    {
        return Err(DataSourceError::InvalidDistance { row, column });
    }
    if let Some(diagonal) = distances.get_mut(row) {
        *diagonal = 0.0;
    }
    Ok(distances)
}
