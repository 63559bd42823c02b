//! One line of the Grid Engine accounting log.
//!
//! Lines are colon-separated; only a handful of columns matter to us:
//! - 3: owner
//! - 4: job name
//! - 12: exit status
//!
//! Statistic columns are configured separately (see `crate::stats`).

pub mod query;

pub use query::{ANY_EXIT_STATUS, Query};

pub const USER_COLUMN: usize = 3;
pub const JOB_NAME_COLUMN: usize = 4;
pub const EXIT_STATUS_COLUMN: usize = 12;

const FIELD_SEPARATOR: char = ':';

/// Why a single accounting record could not be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("missing column {column} (record has {len} fields)")]
    MissingColumn { column: usize, len: usize },

    #[error("column {column} ({stat}): cannot parse {text:?} as a number")]
    BadNumber {
        column: usize,
        stat: String,
        text: String,
    },

    #[error("exit status {text:?} is not an integer")]
    BadExitStatus { text: String },
}

/// A borrowed view of one accounting line, split into fields.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn split(line: &'a str) -> Self {
        Self {
            fields: line.split(FIELD_SEPARATOR).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, column: usize) -> Result<&'a str, RecordError> {
        self.fields
            .get(column)
            .copied()
            .ok_or(RecordError::MissingColumn {
                column,
                len: self.len(),
            })
    }

    pub fn user(&self) -> Result<&'a str, RecordError> {
        self.field(USER_COLUMN)
    }

    pub fn job_name(&self) -> Result<&'a str, RecordError> {
        self.field(JOB_NAME_COLUMN)
    }

    pub fn exit_status(&self) -> Result<i64, RecordError> {
        let text = self.field(EXIT_STATUS_COLUMN)?;
        text.trim()
            .parse()
            .map_err(|_| RecordError::BadExitStatus {
                text: text.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_keeps_empty_fields() {
        let record = Record::split("a::c");
        assert_eq!(record.len(), 3);
        assert_eq!(record.field(1), Ok(""));
    }

    #[test]
    fn out_of_range_column_is_an_error() {
        let record = Record::split("q:host:grp:alice");
        assert_eq!(record.user(), Ok("alice"));
        assert_eq!(
            record.job_name(),
            Err(RecordError::MissingColumn { column: 4, len: 4 })
        );
    }

    #[test]
    fn exit_status_must_be_numeric() {
        let mut fields = vec!["x"; 13];
        fields[12] = "137";
        let line = fields.join(":");
        assert_eq!(Record::split(&line).exit_status(), Ok(137));

        fields[12] = "oops";
        let line = fields.join(":");
        assert_eq!(
            Record::split(&line).exit_status(),
            Err(RecordError::BadExitStatus {
                text: "oops".to_string()
            })
        );
    }
}

/// Builds full-width accounting lines for tests.
#[cfg(test)]
pub(crate) mod fixture {
    use crate::stats::{ACTUAL_MEMORY_COLUMN, ACTUAL_RUNTIME_COLUMN, RESOURCE_REQUEST_COLUMN};

    const WIDTH: usize = 45;

    pub struct Line {
        fields: Vec<String>,
    }

    pub fn job(user: &str, name: &str, exit_status: i64) -> Line {
        let mut fields = vec!["0".to_string(); WIDTH];
        fields[0] = "all.q".to_string();
        fields[1] = "node01".to_string();
        fields[2] = "staff".to_string();
        fields[super::USER_COLUMN] = user.to_string();
        fields[super::JOB_NAME_COLUMN] = name.to_string();
        fields[super::EXIT_STATUS_COLUMN] = exit_status.to_string();
        Line { fields }
            .set(ACTUAL_RUNTIME_COLUMN, "3600")
            .set(RESOURCE_REQUEST_COLUMN, "-U users -l h_data=1G,h_rt=3600")
            .set(ACTUAL_MEMORY_COLUMN, "1000000000")
    }

    impl Line {
        pub fn set(mut self, column: usize, value: &str) -> Self {
            self.fields[column] = value.to_string();
            self
        }

        pub fn request(self, value: &str) -> Self {
            self.set(RESOURCE_REQUEST_COLUMN, value)
        }

        pub fn maxvmem(self, value: &str) -> Self {
            self.set(ACTUAL_MEMORY_COLUMN, value)
        }

        pub fn build(&self) -> String {
            self.fields.join(":")
        }
    }
}
