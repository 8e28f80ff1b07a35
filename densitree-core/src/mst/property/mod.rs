//! Property-based tests for the dense Prim MST implementation.
//!
//! Verifies Prim against a sequential Kruskal oracle and validates the
//! spanning structure of its output across matrices with varied weight
//! distributions.

mod oracle;
mod strategies;
