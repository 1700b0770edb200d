//! Export coordinator for orchestrating export invocations
//!
//! This module drives one export from start to finish:
//! 1. Compile the output format for the requested kind
//! 2. Ensure the output directory exists and open `<dir>/<request id>`
//! 3. Stream records from the store through the format writer
//! 4. On any failure, classify it and record the status on the request
//!
//! Failures never propagate to the caller. They are persisted on the
//! request and reported through [`ExportOutcome`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::ExportConfig;
use crate::error::{ConfigError, ExportFailure, Result};
use crate::model::{OutputFormat, OutputKind};
use crate::store::RecordStore;
use crate::template::{Delimiters, TemplateEngine};

use super::fs::{ExportFs, LocalFs};
use super::progress::ProgressTracker;
use super::writers::CompiledFormat;

/// Settings shared by every export an [`Exporter`] runs
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Directory output files are written to
    pub output_dir: PathBuf,
    /// Placeholder delimiters
    pub delimiters: Delimiters,
    /// Display a progress spinner
    pub progress: bool,
}

impl ExportSettings {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            delimiters: Delimiters::default(),
            progress: false,
        }
    }

    /// Build settings from the `[export]` configuration section
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        Ok(Self {
            output_dir: config.output_dir.clone(),
            delimiters: config.delimiters()?,
            progress: config.progress,
        })
    }
}

/// One export invocation
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Request whose records are exported
    pub request_id: String,
    /// Output file kind
    pub kind: OutputKind,
    /// Output format applied to every record
    pub format: OutputFormat,
}

impl ExportJob {
    /// Create a job, using the default format when `format` is missing or empty
    pub fn new(request_id: impl Into<String>, kind: OutputKind, format: Option<&str>) -> Self {
        Self {
            request_id: request_id.into(),
            kind,
            format: OutputFormat::new(format),
        }
    }
}

/// Statistics of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of records exported
    pub records: u64,
    /// Output file
    pub path: PathBuf,
    /// Time taken for export
    pub elapsed_ms: u64,
}

/// Final state of an export invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// All records written
    Done(ExportSummary),
    /// Export failed; the reason was recorded on the request
    Failed(ExportFailure),
}

impl ExportOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, ExportOutcome::Done(_))
    }

    /// Failure reason, if the export failed
    pub fn failure(&self) -> Option<ExportFailure> {
        match self {
            ExportOutcome::Done(_) => None,
            ExportOutcome::Failed(failure) => Some(*failure),
        }
    }
}

/// Coordinator for export invocations
///
/// Owns the record store and filesystem access, and runs exports one at a
/// time. Callers must not run two exports for the same request id at once.
pub struct Exporter<S, F = LocalFs> {
    /// Record store (read records, write failure status)
    store: S,
    /// Filesystem access
    fs: F,
    /// Template engine bound to the configured delimiters
    engine: TemplateEngine,
    /// Directory output files are written to
    output_dir: PathBuf,
    /// Display a progress spinner
    progress: bool,
}

impl<S: RecordStore> Exporter<S, LocalFs> {
    /// Create an exporter writing to the local filesystem
    pub fn new(store: S, settings: ExportSettings) -> Self {
        Self::with_fs(store, LocalFs, settings)
    }
}

impl<S: RecordStore, F: ExportFs> Exporter<S, F> {
    /// Create an exporter over a custom filesystem
    pub fn with_fs(store: S, fs: F, settings: ExportSettings) -> Self {
        Self {
            store,
            fs,
            engine: TemplateEngine::new(settings.delimiters),
            output_dir: settings.output_dir,
            progress: settings.progress,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Output file path for a request
    pub fn output_path(&self, request_id: &str) -> PathBuf {
        self.output_dir.join(request_id)
    }

    /// Run one export
    ///
    /// # Arguments
    /// * `job` - Request id, output kind and format
    ///
    /// # Returns
    /// * `ExportOutcome` - Done with statistics, or the recorded failure
    pub fn export(&mut self, job: &ExportJob) -> ExportOutcome {
        let start_time = Instant::now();
        info!(
            "Starting {} export for request '{}'",
            job.kind, job.request_id
        );

        match self.write_output(job) {
            Ok(records) => {
                let elapsed_ms = start_time.elapsed().as_millis() as u64;
                let path = self.output_path(&job.request_id);
                info!(
                    "Export completed: {} records to {} in {} ms",
                    records,
                    path.display(),
                    elapsed_ms
                );
                ExportOutcome::Done(ExportSummary {
                    records,
                    path,
                    elapsed_ms,
                })
            }
            Err(e) => {
                let failure = ExportFailure::classify(&e);
                error!(
                    "Error handling file for request '{}': {} ({:?})",
                    job.request_id, e, e
                );
                self.mark_failed(&job.request_id, failure);
                ExportOutcome::Failed(failure)
            }
        }
    }

    /// Write the output file, returning the number of records written
    fn write_output(&self, job: &ExportJob) -> Result<u64> {
        validate_request_id(&job.request_id)?;
        let compiled = CompiledFormat::compile(job.kind, &job.format, &self.engine)?;

        self.fs.ensure_dir(&self.output_dir)?;
        let path = self.output_path(&job.request_id);
        let sink = self.fs.create(&path)?;
        debug!("Opened output file: {}", path.display());

        let mut writer = compiled.into_writer(sink)?;
        let tracker = ProgressTracker::new(&job.request_id, self.progress);

        for record in self.store.records(&job.request_id)? {
            writer.write_record(&record?)?;
            tracker.update(writer.written());
        }

        writer.finalize()?;
        tracker.finish();
        Ok(writer.written())
    }

    /// Record a failure status on the request and commit it
    fn mark_failed(&mut self, request_id: &str, failure: ExportFailure) {
        let committed = self.store.request(request_id).and_then(|mut request| {
            request.set_status(failure.status_code());
            self.store.commit_request(&request)
        });

        match committed {
            Ok(()) => debug!("Marked request '{}' as {}", request_id, failure),
            Err(e) => error!(
                "Failed to record status '{}' for request '{}': {}",
                failure, request_id, e
            ),
        }
    }
}

/// A request id names the output file, so it must be a single path component
fn validate_request_id(request_id: &str) -> Result<()> {
    let mut components = Path::new(request_id).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    );
    if single_normal && !request_id.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: "request_id".to_string(),
            value: request_id.to_string(),
        }
        .into())
    }
}
