//! CLI command implementations for the advisory-report binary.

pub mod output;
pub mod report_cmd;
