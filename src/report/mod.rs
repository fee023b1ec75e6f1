//! Reporting utilities: formatted terminal output for outcomes and options.
//!
//! Formatting lives in one place so the CLI and the TUI print the same strings.

pub mod format;

pub use format::{format_charges, format_entities, format_outcome};
