//! `densitree` binary: clusters a CSV file and prints one label per row.
//!
//! Logging comes up first so warnings raised while coercing arguments are
//! captured. Failures are logged with their stable error codes and turned
//! into a non-zero exit status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use densitree_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{LoggingError, init_logging},
};
use densitree_core::{DataSourceErrorCode, DensitreeError};

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        logging_unavailable(&err);
        return ExitCode::FAILURE;
    }

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let summary = run_cli(cli).context("clustering failed")?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut out).context("could not write labels")?;
    out.flush().context("could not flush stdout")
}

fn core_error(err: &anyhow::Error) -> Option<&DensitreeError> {
    match err.downcast_ref::<CliError>()? {
        CliError::Core(core) => Some(core),
        CliError::Io { .. } | CliError::Csv { .. } | CliError::Parse { .. } => None,
    }
}

fn log_failure(err: &anyhow::Error) {
    let Some(core) = core_error(err) else {
        tracing::error!(error = %format_args!("{err:#}"), "densitree failed");
        return;
    };
    tracing::error!(
        error = %format_args!("{err:#}"),
        code = core.code().as_str(),
        data_source_code = core.data_source_code().map(DataSourceErrorCode::as_str),
        "densitree failed"
    );
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists to receive this diagnostic"
)]
fn logging_unavailable(err: &LoggingError) {
    eprintln!("densitree: logging unavailable: {err}");
}
