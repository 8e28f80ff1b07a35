//! Fixtures shared by the unit and property tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use densitree_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{DistanceMatrix, datasource::DataSource, error::DataSourceError};

/// Proptest configuration scaled by `PROGTEST_CASES` and `DENSITREE_PBT_FORK`.
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Points on a line that count how often a distance is requested.
#[derive(Debug, Default)]
pub(crate) struct CountingSource {
    points: Vec<f32>,
    calls: AtomicUsize,
}

impl CountingSource {
    pub(crate) fn from_points(points: &[f32]) -> Self {
        Self {
            points: points.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl DataSource for CountingSource {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn name(&self) -> &str {
        "counting"
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let point = |index: usize| {
            self.points
                .get(index)
                .copied()
                .ok_or(DataSourceError::OutOfBounds { index })
        };
        Ok((point(i)? - point(j)?).abs())
    }
}

/// Absolute-difference distances between scalar points.
pub(crate) fn line_matrix(points: &[f32]) -> DistanceMatrix {
    let rows: Vec<Vec<f32>> = points
        .iter()
        .map(|a| points.iter().map(|b| (a - b).abs()).collect())
        .collect();
    DistanceMatrix::from_rows("line", &rows).expect("line matrix must be valid")
}
