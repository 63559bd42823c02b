use crate::Result;
use crate::model::JobTable;
use crate::record::{Query, Record, RecordError};
use crate::stats::{StatRow, StatSet};

use anyhow::{Context, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// What to do with a record that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Abort the whole scan on the first bad record.
    #[default]
    Strict,
    /// Log a warning and skip the record.
    Lenient,
}

/// Read an accounting file and collect the statistics of every record
/// matching `query`.
pub fn scan_accounting_file(
    path: &Path,
    query: &Query,
    stats: &StatSet,
    mode: ParseMode,
) -> Result<JobTable> {
    if !path.is_file() {
        bail!("accounting file not found: {}", path.display());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("read accounting file {}", path.display()))?;

    scan_accounting_text(&text, &path.display().to_string(), query, stats, mode)
}

/// Scan accounting text already in memory. `source` only names the input in
/// error messages.
///
/// Expected layout: colon-separated fields, one finished job per line.
/// Blank lines and `#` comment lines (the header Grid Engine writes) are
/// ignored.
pub fn scan_accounting_text(
    text: &str,
    source: &str,
    query: &Query,
    stats: &StatSet,
    mode: ParseMode,
) -> Result<JobTable> {
    let mut table = JobTable::new(stats);
    let mut skipped = 0usize;

    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = line.trim_end();

        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match scan_line(line, query, stats) {
            Ok(Some(row)) => table.push(row)?,
            Ok(None) => {}
            Err(err) => match mode {
                ParseMode::Strict => {
                    return Err(anyhow::Error::new(err)
                        .context(format!("accounting parse error at {}:{}", source, lno)));
                }
                ParseMode::Lenient => {
                    warn!(source, line = lno, error = %err, "skipping malformed accounting record");
                    skipped += 1;
                }
            },
        }
    }

    if skipped > 0 {
        warn!(source, skipped, "malformed records were skipped");
    }
    debug!(source, user = %query.user, jobs = table.jobs(), "accounting scan finished");

    Ok(table)
}

fn scan_line(
    line: &str,
    query: &Query,
    stats: &StatSet,
) -> std::result::Result<Option<StatRow>, RecordError> {
    let record = Record::split(line);
    if !query.matches(&record)? {
        return Ok(None);
    }
    stats.extract(&record).map(Some)
}
