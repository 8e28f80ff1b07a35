//! Shared test utilities used across densitree crates.

pub mod ci;
pub mod tracing;
