//! Parsers for the compound resource-request column.
//!
//! The column packs the submit options of a job, e.g.
//! `-U users -l h_data=4G,h_rt=7200 -pe smp 4`. We look for one key at a
//! time with a single regex search; the first occurrence wins and a missing
//! key yields a default instead of an error.

use crate::Result;

use regex::Regex;

/// Requested memory when the job did not ask for `h_data`, in GB.
pub const DEFAULT_MEMORY_GB: f64 = 1.0;

/// Requested runtime when the job did not ask for `h_rt`, in seconds.
pub const DEFAULT_RUNTIME_SECS: f64 = 7200.0;

const SECS_PER_HOUR: f64 = 3600.0;
const MB_PER_GB: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct RequestParser {
    memory: Regex,
    runtime: Regex,
}

impl RequestParser {
    pub fn new() -> Result<Self> {
        // Capture:
        // 1) amount: integer
        // 2) unit: one letter; only g/m are understood
        let memory = Regex::new(r"h_data=([0-9]+)([A-Za-z])")?;
        let runtime = Regex::new(r"h_rt=([0-9]+)")?;
        Ok(Self { memory, runtime })
    }

    /// Requested `h_data` in GB.
    ///
    /// Units other than g/m are not converted; such a request counts as the
    /// default.
    pub fn memory_gb(&self, request: &str) -> f64 {
        let Some(caps) = self.memory.captures(request) else {
            return DEFAULT_MEMORY_GB;
        };
        let Ok(amount) = caps[1].parse::<f64>() else {
            return DEFAULT_MEMORY_GB;
        };

        match caps[2].to_ascii_lowercase().as_str() {
            "g" => amount,
            "m" => amount / MB_PER_GB,
            _ => DEFAULT_MEMORY_GB,
        }
    }

    /// Requested `h_rt` in hours.
    pub fn runtime_hours(&self, request: &str) -> f64 {
        let secs = self
            .runtime
            .captures(request)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .unwrap_or(DEFAULT_RUNTIME_SECS);
        secs / SECS_PER_HOUR
    }
}
