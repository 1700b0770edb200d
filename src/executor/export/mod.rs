//! Export module for writing request records to files
//!
//! This module turns the records of one export request into a JSON or CSV
//! file, driven by a user-supplied output format with placeholders.
//!
//! # Architecture
//!
//! The export system is built on four components:
//!
//! 1. **ExportFs**: Creates the output directory and opens the output file
//! 2. **CompiledFormat**: Output format compiled once per export for its kind
//! 3. **FormatWriter**: Streams resolved records as a JSON array or CSV rows
//! 4. **ProgressTracker**: Optional spinner with the current write speed
//!
//! These components are orchestrated by the **Exporter**, which also records
//! a failure status on the request when anything goes wrong.
//!
//! # Example
//!
//! ```
//! use token_export::executor::export::{ExportJob, ExportSettings, Exporter};
//! use token_export::model::{ExportRecord, ExportRequest, OutputKind};
//! use token_export::store::MemoryStore;
//!
//! let dir = std::env::temp_dir().join("token-export-doc");
//! let mut store = MemoryStore::new();
//! store.insert_request(ExportRequest::new("req-1", "completed"));
//! store.push_record("req-1", ExportRecord {
//!     status: "success".to_string(),
//!     ..Default::default()
//! });
//!
//! let mut exporter = Exporter::new(store, ExportSettings::new(&dir));
//! let job = ExportJob::new("req-1", OutputKind::Csv, Some(r#"{"status": "__-status-__"}"#));
//! assert!(exporter.export(&job).is_done());
//! ```

pub mod coordinator;
pub mod fs;
pub mod progress;
pub mod writers;

pub use coordinator::{ExportJob, ExportOutcome, ExportSettings, ExportSummary, Exporter};
pub use fs::{ExportFs, LocalFs};
pub use progress::ProgressTracker;
pub use writers::{CompiledFormat, CsvWriter, FormatWriter, JsonArrayWriter};
