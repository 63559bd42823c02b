//! Which accounting records belong in the report.

use crate::Result;
use crate::record::{Record, RecordError};

use anyhow::Context;
use regex::Regex;

/// Exit-status value meaning "do not filter on exit status".
pub const ANY_EXIT_STATUS: i64 = -1;

#[derive(Debug, Clone)]
pub struct Query {
    pub user: String,
    pub pattern: Option<Regex>,
    pub exit_status: Option<i64>,
}

impl Query {
    /// Build a query from CLI-shaped inputs: an empty pattern disables the
    /// job-name filter and `ANY_EXIT_STATUS` disables the exit filter.
    pub fn new(user: impl Into<String>, pattern: &str, exit_status: i64) -> Result<Self> {
        let pattern = if pattern.is_empty() {
            None
        } else {
            Some(
                Regex::new(pattern)
                    .with_context(|| format!("invalid job-name pattern {:?}", pattern))?,
            )
        };

        Ok(Self {
            user: user.into(),
            pattern,
            exit_status: (exit_status != ANY_EXIT_STATUS).then_some(exit_status),
        })
    }

    /// Decide whether `record` is counted.
    ///
    /// The owner is compared first since most lines belong to other users.
    /// The exit status is only parsed when an exit filter is set, but once
    /// parsed a non-integer value is an error rather than a mismatch.
    pub fn matches(&self, record: &Record<'_>) -> std::result::Result<bool, RecordError> {
        if record.user()? != self.user {
            return Ok(false);
        }

        if let Some(re) = &self.pattern {
            if !re.is_match(record.job_name()?) {
                return Ok(false);
            }
        }

        match self.exit_status {
            None => Ok(true),
            Some(wanted) => Ok(record.exit_status()? == wanted),
        }
    }
}
