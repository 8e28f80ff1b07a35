//! Command-line interface orchestration for densitree.
//!
//! Two commands read a CSV file of feature vectors (or of pairwise distances
//! with `--metric precomputed`) and print one label per row.

mod commands;
mod input;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, HdbscanArgs, InputArgs, SingleLinkageArgs,
    render_summary, run_cli,
};
pub use input::read_rows;

#[cfg(test)]
mod test_helpers;
