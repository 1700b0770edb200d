//! Token Export Library
//!
//! This library provides the export core of the token seeding pipeline: it
//! takes the records of one export request, renders each through a
//! user-supplied output format with placeholders, and writes them as a JSON
//! array or CSV file. Failures are classified and recorded on the request.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and failure classification
//! - `executor`: Export coordinator and format writers
//! - `formatter`: JSON text formatting
//! - `model`: Requests, records and output formats
//! - `store`: Request store access (MongoDB, in-memory)
//! - `template`: Placeholder templates and field resolution
//!
//! # Example
//!
//! ```no_run
//! use token_export::{Config, ExportJob, ExportSettings, Exporter, MongoStore, OutputKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let store = MongoStore::connect(&config.store)?;
//!     let mut exporter = Exporter::new(store, ExportSettings::from_config(&config.export)?);
//!
//!     let outcome = exporter.export(&ExportJob::new("req-42", OutputKind::Json, None));
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod model;
pub mod store;
pub mod template;

// Re-export commonly used types
pub use config::Config;
pub use error::{ExportError, ExportFailure, Result};
pub use executor::{ExportJob, ExportOutcome, ExportSettings, ExportSummary, Exporter};
pub use model::{ExportRecord, ExportRequest, OutputFormat, OutputKind};
pub use store::{MemoryStore, MongoStore, RecordStore};
pub use template::TemplateEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
