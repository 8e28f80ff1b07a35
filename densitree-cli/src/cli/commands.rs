//! Command implementations and argument parsing for the densitree CLI.

use std::convert::Infallible;
use std::io::{self, Write};
use std::num::ParseFloatError;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use densitree_core::{ClusterLabels, DensitreeError, HdbscanBuilder, Metric, SingleLinkageBuilder};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::read_rows;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "densitree",
    about = "Cluster CSV rows with HDBSCAN or single linkage."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Density-based clustering; sparse points are labelled `-1`.
    Hdbscan(HdbscanArgs),
    /// Single-linkage clustering into a fixed number of clusters.
    SingleLinkage(SingleLinkageArgs),
}

/// Input options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// CSV file with one row per point.
    pub path: PathBuf,

    /// How rows are read: `euclidean` feature vectors or a `precomputed`
    /// distance matrix. Unknown names fall back to `euclidean`.
    #[arg(long, default_value = "euclidean", value_parser = parse_metric)]
    pub metric: Metric,

    /// Override name for the data source (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,
}

/// Options accepted by the `hdbscan` command.
#[derive(Debug, Args, Clone)]
pub struct HdbscanArgs {
    /// Neighbourhood size used for core distances; the point itself counts.
    #[arg(long = "min-samples", default_value_t = HdbscanBuilder::default().min_samples())]
    pub min_samples: usize,

    /// Smallest group reported as a cluster (defaults to `min-samples`).
    #[arg(long = "min-cluster-size")]
    pub min_cluster_size: Option<usize>,

    /// Input file options.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Options accepted by the `single-linkage` command.
#[derive(Debug, Args, Clone)]
pub struct SingleLinkageArgs {
    /// Number of clusters to cut the hierarchy into.
    #[arg(long = "n-clusters", default_value_t = SingleLinkageBuilder::default().n_clusters())]
    pub n_clusters: usize,

    /// Input file options.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading the input.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The CSV reader rejected the contents, for example invalid UTF-8.
    #[error("malformed csv in `{path}`: {source}")]
    Csv {
        /// Path being read.
        path: PathBuf,
        /// Reader failure, including its position.
        #[source]
        source: csv::Error,
    },
    /// A CSV cell was not a number.
    #[error("line {line}, column {column}: `{value}` is not a number")]
    Parse {
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
        /// Offending cell, trimmed.
        value: String,
        /// Parser failure.
        #[source]
        source: ParseFloatError,
    },
    /// Clustering failed.
    #[error(transparent)]
    Core(#[from] DensitreeError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the clustered data source.
    pub data_source: String,
    /// One label per input row.
    pub labels: ClusterLabels,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the input or clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use densitree_cli::cli::{Cli, Command, InputArgs, SingleLinkageArgs, run_cli};
/// # use densitree_core::Metric;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0\n1\n10\n11\n")?;
/// let cli = Cli {
///     command: Command::SingleLinkage(SingleLinkageArgs {
///         n_clusters: 2,
///         input: InputArgs {
///             path: file.path().to_path_buf(),
///             metric: Metric::Euclidean,
///             name: None,
///         },
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.labels.as_slice(), &[0, 0, 1, 1]);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    let summary = match cli.command {
        Command::Hdbscan(args) => {
            span.record("command", field::display("hdbscan"));
            run_hdbscan(args)?
        }
        Command::SingleLinkage(args) => {
            span.record("command", field::display("single-linkage"));
            run_single_linkage(args)?
        }
    };

    info!(
        data_source = summary.data_source.as_str(),
        clusters = summary.labels.cluster_count(),
        noise = summary.labels.noise_count(),
        "command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.hdbscan",
    err,
    skip(args),
    fields(
        min_samples = args.min_samples,
        min_cluster_size = field::Empty,
        path = %args.input.path.display(),
    ),
)]
pub(super) fn run_hdbscan(args: HdbscanArgs) -> Result<ExecutionSummary, CliError> {
    let HdbscanArgs {
        min_samples,
        min_cluster_size,
        input,
    } = args;
    let mut builder = HdbscanBuilder::new()
        .with_min_samples(min_samples)
        .with_metric(input.metric);
    if let Some(size) = min_cluster_size {
        builder = builder.with_min_cluster_size(size);
    }
    let estimator = builder.build()?;
    Span::current().record(
        "min_cluster_size",
        field::display(estimator.min_cluster_size()),
    );

    let (data_source, rows) = load(&input)?;
    let matrix = input.metric.distances(&data_source, &rows)?;
    let labels = estimator.fit_distances(&matrix)?.into_labels();
    Ok(ExecutionSummary {
        data_source,
        labels,
    })
}

#[instrument(
    name = "cli.single_linkage",
    err,
    skip(args),
    fields(n_clusters = args.n_clusters, path = %args.input.path.display()),
)]
pub(super) fn run_single_linkage(args: SingleLinkageArgs) -> Result<ExecutionSummary, CliError> {
    let SingleLinkageArgs { n_clusters, input } = args;
    let estimator = SingleLinkageBuilder::new()
        .with_n_clusters(n_clusters)
        .with_metric(input.metric)
        .build()?;

    let (data_source, rows) = load(&input)?;
    let matrix = input.metric.distances(&data_source, &rows)?;
    let labels = estimator.fit_distances(&matrix)?.into_labels();
    Ok(ExecutionSummary {
        data_source,
        labels,
    })
}

fn load(input: &InputArgs) -> Result<(String, Vec<Vec<f32>>), CliError> {
    let name = derive_data_source_name(&input.path, input.name.as_deref());
    let rows = read_rows(&input.path)?;
    Ok((name, rows))
}

fn parse_metric(raw: &str) -> Result<Metric, Infallible> {
    Ok(Metric::parse(raw))
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "data_source".to_owned())
}

/// Renders `summary` to `writer` as a header followed by one
/// `index<TAB>label` line per point.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use densitree_cli::cli::{ExecutionSummary, render_summary};
/// # use densitree_core::ClusterLabels;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     labels: ClusterLabels::try_from_labels(vec![0, -1, 0])?,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "data source: demo\nclusters: 1\nnoise: 1\n0\t0\n1\t-1\n2\t0\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "clusters: {}", summary.labels.cluster_count())?;
    writeln!(writer, "noise: {}", summary.labels.noise_count())?;
    for (index, label) in summary.labels.as_slice().iter().enumerate() {
        writeln!(writer, "{index}\t{label}")?;
    }
    Ok(())
}
