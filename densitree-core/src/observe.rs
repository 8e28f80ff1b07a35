//! Fit metrics published through the `metrics` facade.
//!
//! Without the `metrics` feature these hooks compile to nothing.

use std::time::Duration;

#[cfg(feature = "metrics")]
pub(crate) fn record_fit(estimator: &'static str, clusters: usize, elapsed: Duration) {
    metrics::counter!("densitree_fit_total", "estimator" => estimator).increment(1);
    metrics::histogram!("densitree_fit_clusters", "estimator" => estimator)
        .record(clusters as f64);
    metrics::histogram!("densitree_fit_duration_seconds", "estimator" => estimator)
        .record(elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn record_fit(_estimator: &'static str, _clusters: usize, _elapsed: Duration) {}
