//! Execution engine for token-export
//!
//! This module provides the execution layer that turns an export job into
//! an output file. It includes:
//! - Export coordinator driving one invocation end to end
//! - Format writers for JSON arrays and CSV
//! - Filesystem access and progress reporting

pub mod export;

pub use export::{ExportJob, ExportOutcome, ExportSettings, ExportSummary, Exporter};
