//! Scanning a Grid Engine accounting file into a `JobTable`.

pub mod scan;

pub use scan::{ParseMode, scan_accounting_file};
