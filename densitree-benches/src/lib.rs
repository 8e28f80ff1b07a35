//! Benchmark support crate for densitree.
//!
//! Provides synthetic Gaussian-blob datasets and parameter types shared by
//! the Criterion benchmarks of the spanning-tree and extraction stages and of
//! whole estimator fits.

pub mod error;
pub mod params;
pub mod source;
