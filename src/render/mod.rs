//! Report rendering for the terminal.

pub mod text;

pub use text::render_text_report;
