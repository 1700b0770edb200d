//! Error handling for export operations.
//!
//! This module provides:
//! - Structured error kinds for each layer (paths, fields, templates, store, config)
//! - A crate-wide [`ExportError`] and [`Result`] alias
//! - The [`ExportFailure`] taxonomy that failed exports are recorded as
//!
//! # Example
//!
//! ```rust
//! use token_export::error::{ExportError, ExportFailure};
//!
//! let err = ExportError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
//! let failure = ExportFailure::classify(&err);
//! assert_eq!(failure.status_code(), "error_creating_download_disk_permission_error");
//! ```

pub mod failure;
pub mod kinds;

// Re-export commonly used types
pub use failure::ExportFailure;
pub use kinds::{
    ConfigError, ExportError, FieldError, PathError, Result, StoreError, TemplateError,
};
