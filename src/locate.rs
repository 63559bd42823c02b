//! Finding the accounting file of a Grid Engine cell.
//!
//! Layout:
//! - live file:        <root>/<cell>/common/accounting
//! - monthly archive:  <root>/<cell>/common/accounting-YYYY-MM

use crate::Result;

use anyhow::{Context, bail};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;

const ACCOUNTING_FILE: &str = "accounting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8,
}

impl YearMonth {
    /// Accepts `YYYY-MM` or `YYYYMM`.
    pub fn parse(s: &str) -> Result<Self> {
        let re = Regex::new(r"^([0-9]{4})-?([0-9]{2})$")?;
        let caps = re
            .captures(s.trim())
            .with_context(|| format!("month must look like YYYY-MM, got {:?}", s))?;

        let year: u16 = caps[1].parse()?;
        let month: u8 = caps[2].parse()?;
        if !(1..=12).contains(&month) {
            bail!("month out of range in {:?}", s);
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone)]
pub struct CellLayout {
    pub root: PathBuf,
    pub cell: String,
}

impl CellLayout {
    pub fn new(root: impl Into<PathBuf>, cell: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            cell: cell.into(),
        }
    }

    pub fn common_dir(&self) -> PathBuf {
        self.root.join(&self.cell).join("common")
    }

    /// Path of the accounting file for `month`, or of the live file.
    /// Fails if the file does not exist.
    pub fn accounting_file(&self, month: Option<YearMonth>) -> Result<PathBuf> {
        let name = match month {
            None => ACCOUNTING_FILE.to_string(),
            Some(m) => format!("{}-{}", ACCOUNTING_FILE, m),
        };
        let path = self.common_dir().join(name);
        if !path.is_file() {
            bail!("accounting file not found: {}", path.display());
        }
        Ok(path)
    }
}
