//! Aggregation model: per-statistic value sequences and the memory report
//! derived from them.

use crate::Result;
use crate::stats::{ACTUAL_MEMORY, ACTUAL_RUNTIME, REQUESTED_MEMORY, REQUESTED_RUNTIME, StatRow, StatSet};

use anyhow::{anyhow, bail};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistic name -> one value per matching record, in file order.
///
/// Every column always has the same length; rows are appended whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTable {
    columns: BTreeMap<String, Vec<f64>>,
}

impl JobTable {
    pub fn new(stats: &StatSet) -> Self {
        Self {
            columns: stats.names().map(|name| (name.to_string(), Vec::new())).collect(),
        }
    }

    /// Append one record's values. The row must carry exactly the table's
    /// statistics; otherwise nothing is appended.
    pub fn push(&mut self, row: StatRow) -> Result<()> {
        if row.len() != self.columns.len() || !row.keys().all(|k| self.columns.contains_key(k)) {
            bail!(
                "statistic row {:?} does not match table columns {:?}",
                row.keys().collect::<Vec<_>>(),
                self.columns.keys().collect::<Vec<_>>()
            );
        }

        for (name, value) in row {
            if let Some(column) = self.columns.get_mut(&name) {
                column.push(value);
            }
        }
        Ok(())
    }

    /// Number of records appended so far.
    pub fn jobs(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.jobs() == 0
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }
}

/// Outcome of aggregating a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MemoryReport {
    NoJobs,
    Summary(MemorySummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemorySummary {
    pub jobs: usize,
    pub mean_requested_gb: f64,
    pub mean_used_gb: f64,
    pub mean_unused_gb: f64,
    /// Mean of used/requested over jobs with a finite ratio; `None` when no
    /// job has one (e.g. every request was 0 GB).
    pub mean_used_fraction: Option<f64>,
    pub max_used_gb: f64,

    /// Present when runtime statistics were tracked.
    pub mean_requested_hours: Option<f64>,
    pub mean_runtime_hours: Option<f64>,
}

/// Reduce the table to a memory report.
///
/// Requires the requested/actual memory statistics; runtime statistics are
/// optional.
pub fn summarize_memory(table: &JobTable) -> Result<MemoryReport> {
    let requested = required_column(table, REQUESTED_MEMORY)?;
    let used = required_column(table, ACTUAL_MEMORY)?;

    if table.is_empty() {
        return Ok(MemoryReport::NoJobs);
    }

    let unused: Vec<f64> = requested.iter().zip(used).map(|(r, u)| r - u).collect();
    let fractions: Vec<f64> = requested
        .iter()
        .zip(used)
        .map(|(r, u)| u / r)
        .filter(|f| f.is_finite())
        .collect();
    let max_used_gb = used.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(MemoryReport::Summary(MemorySummary {
        jobs: table.jobs(),
        mean_requested_gb: mean(requested).unwrap_or_default(),
        mean_used_gb: mean(used).unwrap_or_default(),
        mean_unused_gb: mean(&unused).unwrap_or_default(),
        mean_used_fraction: mean(&fractions),
        max_used_gb,
        mean_requested_hours: table.column(REQUESTED_RUNTIME).and_then(mean),
        mean_runtime_hours: table.column(ACTUAL_RUNTIME).and_then(mean),
    }))
}

fn required_column<'a>(table: &'a JobTable, name: &str) -> Result<&'a [f64]> {
    table
        .column(name)
        .ok_or_else(|| anyhow!("statistic '{}' is required for the memory report", name))
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
