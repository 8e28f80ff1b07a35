//! Fixtures shared by the CLI unit tests.

use std::fs;
use std::io;
use std::path::PathBuf;

use densitree_core::Metric;
use tempfile::TempDir;

use super::{Cli, CliError, InputArgs, run_cli};

pub(super) fn scratch_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|err| panic!("scratch directory unavailable: {err}"))
}

/// Writes `contents` to `name` inside `dir` and returns the full path.
pub(super) fn write_csv(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn input(path: PathBuf, metric: Metric) -> InputArgs {
    InputArgs {
        path,
        metric,
        name: None,
    }
}

pub(super) fn expect_failure(cli: Cli, context: &str) -> CliError {
    run_cli(cli).map_or_else(|err| err, |summary| panic!("{context}: got {summary:?}"))
}
