//! Statistic descriptors and per-record field extraction.
//!
//! A `StatSet` is the configuration of which quantities are tracked: each
//! `StatSpec` names a column and how to turn its text into a number. The
//! standard set covers requested/actual memory and runtime; other sets can be
//! built for tests or different column layouts.

pub mod request;

pub use request::RequestParser;

use crate::Result;
use crate::record::{Record, RecordError};

use anyhow::bail;
use std::collections::{BTreeMap, BTreeSet};

pub const ACTUAL_RUNTIME_COLUMN: usize = 13;
pub const RESOURCE_REQUEST_COLUMN: usize = 39;
pub const ACTUAL_MEMORY_COLUMN: usize = 42;

pub const REQUESTED_MEMORY: &str = "requested_memory";
pub const REQUESTED_RUNTIME: &str = "requested_runtime";
pub const ACTUAL_MEMORY: &str = "actual_memory";
pub const ACTUAL_RUNTIME: &str = "actual_runtime";

/// Values of one matching record, keyed by statistic name.
pub type StatRow = BTreeMap<String, f64>;

/// Numeric type a plain column is cast to before being stored as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Integer,
}

/// How the raw column text becomes a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldParser {
    /// Cast the text to the declared kind.
    Cast,
    /// `h_data` from the resource-request column, in GB.
    RequestedMemory,
    /// `h_rt` from the resource-request column, in hours.
    RequestedRuntime,
    /// Cast, then divide (unit conversion).
    Divide(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatSpec {
    pub name: String,
    pub kind: ValueKind,
    pub column: usize,
    pub parser: FieldParser,
}

impl StatSpec {
    pub fn new(name: impl Into<String>, kind: ValueKind, column: usize, parser: FieldParser) -> Self {
        Self {
            name: name.into(),
            kind,
            column,
            parser,
        }
    }

    fn extract(
        &self,
        record: &Record<'_>,
        requests: &RequestParser,
    ) -> std::result::Result<f64, RecordError> {
        let raw = record.field(self.column)?;
        match self.parser {
            FieldParser::Cast => self.cast(raw),
            FieldParser::RequestedMemory => Ok(requests.memory_gb(raw)),
            FieldParser::RequestedRuntime => Ok(requests.runtime_hours(raw)),
            FieldParser::Divide(divisor) => Ok(self.cast(raw)? / divisor),
        }
    }

    fn cast(&self, raw: &str) -> std::result::Result<f64, RecordError> {
        let text = raw.trim();
        let parsed = match self.kind {
            ValueKind::Float => text.parse::<f64>().ok(),
            ValueKind::Integer => text.parse::<i64>().ok().map(|v| v as f64),
        };
        parsed.ok_or_else(|| RecordError::BadNumber {
            column: self.column,
            stat: self.name.clone(),
            text: raw.to_string(),
        })
    }
}

/// The ordered, fixed set of statistics tracked during one scan.
#[derive(Debug, Clone)]
pub struct StatSet {
    specs: Vec<StatSpec>,
    requests: RequestParser,
}

impl StatSet {
    /// Validate descriptor names are unique and compile the request parsers.
    pub fn new(specs: Vec<StatSpec>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) {
                bail!("duplicate statistic name: {}", spec.name);
            }
        }
        if specs.is_empty() {
            bail!("at least one statistic must be configured");
        }

        Ok(Self {
            specs,
            requests: RequestParser::new()?,
        })
    }

    /// Requested/actual memory and runtime for the Grid Engine column layout.
    pub fn standard() -> Result<Self> {
        Self::new(vec![
            StatSpec::new(
                REQUESTED_MEMORY,
                ValueKind::Float,
                RESOURCE_REQUEST_COLUMN,
                FieldParser::RequestedMemory,
            ),
            StatSpec::new(
                REQUESTED_RUNTIME,
                ValueKind::Float,
                RESOURCE_REQUEST_COLUMN,
                FieldParser::RequestedRuntime,
            ),
            // maxvmem in bytes -> GB
            StatSpec::new(
                ACTUAL_MEMORY,
                ValueKind::Float,
                ACTUAL_MEMORY_COLUMN,
                FieldParser::Divide(1e9),
            ),
            // ru_wallclock in seconds -> hours
            StatSpec::new(
                ACTUAL_RUNTIME,
                ValueKind::Float,
                ACTUAL_RUNTIME_COLUMN,
                FieldParser::Divide(3600.0),
            ),
        ])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.name.as_str())
    }

    /// Extract every configured statistic from `record`.
    ///
    /// All-or-nothing: the first failing statistic aborts the record so a
    /// caller never sees a partial row.
    pub fn extract(&self, record: &Record<'_>) -> std::result::Result<StatRow, RecordError> {
        let mut row = StatRow::new();
        for spec in &self.specs {
            row.insert(spec.name.clone(), spec.extract(record, &self.requests)?);
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixture;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_set_extracts_all_four() {
        let stats = StatSet::standard().unwrap();
        let line = fixture::job("alice", "job", 0)
            .request("-U users -l h_rt=5400,h_data=4G")
            .maxvmem("2000000000")
            .set(ACTUAL_RUNTIME_COLUMN, "1800")
            .build();

        let row = stats.extract(&Record::split(&line)).unwrap();
        let expected: StatRow = [
            (REQUESTED_MEMORY.to_string(), 4.0),
            (REQUESTED_RUNTIME.to_string(), 1.5),
            (ACTUAL_MEMORY.to_string(), 2.0),
            (ACTUAL_RUNTIME.to_string(), 0.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(row, expected);
    }

    #[test]
    fn request_parsers_use_defaults_for_missing_tokens() {
        let stats = StatSet::standard().unwrap();
        let line = fixture::job("alice", "job", 0).request("NONE").build();
        let row = stats.extract(&Record::split(&line)).unwrap();
        assert_eq!(row[REQUESTED_MEMORY], 1.0);
        assert_eq!(row[REQUESTED_RUNTIME], 2.0);
    }

    #[test]
    fn non_numeric_plain_column_fails_the_whole_record() {
        let stats = StatSet::standard().unwrap();
        let line = fixture::job("alice", "job", 0).maxvmem("12G").build();
        assert_eq!(
            stats.extract(&Record::split(&line)),
            Err(RecordError::BadNumber {
                column: ACTUAL_MEMORY_COLUMN,
                stat: ACTUAL_MEMORY.to_string(),
                text: "12G".to_string(),
            })
        );
    }

    #[test]
    fn short_record_is_missing_a_column() {
        let stats = StatSet::standard().unwrap();
        let line = fixture::job("alice", "job", 0).build();
        let truncated: Vec<&str> = line.split(':').take(40).collect();
        let truncated = truncated.join(":");
        assert_eq!(
            stats.extract(&Record::split(&truncated)),
            Err(RecordError::MissingColumn {
                column: ACTUAL_MEMORY_COLUMN,
                len: 40,
            })
        );
    }

    #[test]
    fn integer_kind_rejects_fractions() {
        let stats = StatSet::new(vec![StatSpec::new(
            "slots",
            ValueKind::Integer,
            34,
            FieldParser::Cast,
        )])
        .unwrap();
        let line = fixture::job("alice", "job", 0).set(34, "8").build();
        assert_eq!(stats.extract(&Record::split(&line)).unwrap()["slots"], 8.0);

        let line = fixture::job("alice", "job", 0).set(34, "8.5").build();
        assert!(stats.extract(&Record::split(&line)).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let spec = StatSpec::new("x", ValueKind::Float, 1, FieldParser::Cast);
        let err = StatSet::new(vec![spec.clone(), spec]).unwrap_err();
        assert!(err.to_string().contains("duplicate statistic name"));
        assert!(StatSet::new(Vec::new()).is_err());
    }
}
