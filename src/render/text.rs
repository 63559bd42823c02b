use crate::model::{MemoryReport, MemorySummary};

use std::fmt::Write;

/// Render the report as plain text for the terminal.
pub fn render_text_report(user: &str, report: &MemoryReport) -> String {
    match report {
        MemoryReport::NoJobs => format!("No matching jobs found for user {}\n", user),
        MemoryReport::Summary(s) => render_summary(user, s),
    }
}

fn render_summary(user: &str, s: &MemorySummary) -> String {
    let used_percent = s
        .mean_used_fraction
        .map_or_else(|| "n/a".to_string(), |f| format!("{:.2} %", f * 100.0));

    let mut out = format!("Jobs found for user {}: {}\n", user, s.jobs);
    push_line(&mut out, "Average requested memory:", format!("{:.2} GB", s.mean_requested_gb));
    push_line(&mut out, "Average memory usage:", format!("{:.2} GB", s.mean_used_gb));
    push_line(&mut out, "Average unused memory:", format!("{:.2} GB", s.mean_unused_gb));
    push_line(&mut out, "Average requested memory used:", used_percent);
    push_line(&mut out, "Maximum memory usage:", format!("{:.2} GB", s.max_used_gb));
    if let Some(h) = s.mean_requested_hours {
        push_line(&mut out, "Average requested runtime:", format!("{:.2} h", h));
    }
    if let Some(h) = s.mean_runtime_hours {
        push_line(&mut out, "Average runtime:", format!("{:.2} h", h));
    }
    out
}

fn push_line(out: &mut String, label: &str, value: String) {
    // fmt::Write into a String never fails
    let _ = writeln!(out, "{:<31}{}", label, value);
}
