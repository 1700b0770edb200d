//! Output template resolution
//!
//! This module turns a placeholder template plus one export record into
//! output text:
//!
//! 1. **path**: nested lookups inside the record's JSON payload
//! 2. **field**: reserved names (`vid`, `status`, `token`, `error_code`,
//!    `error_message`) and the fallback to nested paths
//! 3. **engine**: template scanning, substitution and CSV cell coercion
//!
//! # Example
//!
//! ```rust
//! use token_export::model::ExportRecord;
//! use token_export::template::TemplateEngine;
//!
//! let record = ExportRecord {
//!     auth_data_input: Some(r#"{"vid":"abc"}"#.to_string()),
//!     status: "success".to_string(),
//!     ..Default::default()
//! };
//! let engine = TemplateEngine::default();
//! let out = engine.substitute(Some("__-vid-__:__-status-__"), &record).unwrap();
//! assert_eq!(out.as_deref(), Some("abc:success"));
//! ```

pub mod engine;
pub mod field;
pub mod path;

pub use engine::{CellTemplate, DEFAULT_VAR_ENDS, DEFAULT_VAR_STARTS, Delimiters, Template, TemplateEngine};
pub use field::{FieldName, render_value, resolve_field};
pub use path::JsonPath;
