//! Output formatting for exported records
//!
//! This module provides the JSON serialization used by the export writers:
//! single-line output with spaced separators and ASCII-only strings.

pub mod json;

pub use json::{JsonFormatter, SpacedFormatter};
