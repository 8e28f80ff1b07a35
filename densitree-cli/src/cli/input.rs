//! CSV loading for the CLI.

use std::fs;
use std::path::Path;

use csv::{Position, ReaderBuilder, StringRecord, Trim};
use tracing::{Span, debug, field, instrument};

use super::commands::CliError;

/// Reads comma-separated rows of numbers from `path`.
///
/// Lines starting with `#` and blank lines are skipped, cells are trimmed and
/// may be quoted. There is no header row. Rows may differ in length; the
/// estimators reject ragged input themselves.
///
/// # Errors
/// Returns [`CliError::Io`] when the file cannot be read,
/// [`CliError::Csv`] when the reader rejects its contents, and
/// [`CliError::Parse`] naming the one-based line and column of the first
/// value that is not a number.
#[instrument(name = "cli.read_rows", err, fields(path = field::Empty, rows = field::Empty))]
pub fn read_rows(path: &Path) -> Result<Vec<Vec<f32>>, CliError> {
    let span = Span::current();
    span.record("path", field::display(path.display()));

    let contents = fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents.as_slice());

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let more = reader.read_record(&mut record).map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if !more {
            break;
        }
        // Whitespace-only lines arrive as a single empty cell.
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = first_line(&contents, record.position(), reader.position().byte());
        rows.push(parse_record(&record, line)?);
    }

    span.record("rows", rows.len());
    debug!(rows = rows.len(), "loaded csv rows");
    Ok(rows)
}

/// One-based line on which a record starts.
///
/// The reader stamps a record with the position where it started scanning,
/// which precedes any comment or empty lines it skipped on the way.
fn first_line(contents: &[u8], start: Option<&Position>, end: u64) -> usize {
    let Some(start) = start else { return 0 };
    let from = usize::try_from(start.byte()).unwrap_or(usize::MAX);
    let to = usize::try_from(end).unwrap_or(usize::MAX);
    let skipped = contents
        .get(from..to)
        .unwrap_or_default()
        .split(|&byte| byte == b'\n')
        .take_while(|line| {
            line.strip_suffix(b"\r").unwrap_or(line).is_empty() || line.starts_with(b"#")
        })
        .count();
    usize::try_from(start.line())
        .unwrap_or(usize::MAX)
        .saturating_add(skipped)
}

fn parse_record(record: &StringRecord, line: usize) -> Result<Vec<f32>, CliError> {
    record
        .iter()
        .enumerate()
        .map(|(column, value)| {
            value.parse::<f32>().map_err(|source| CliError::Parse {
                line,
                column: column + 1,
                value: value.to_owned(),
                source,
            })
        })
        .collect()
}
