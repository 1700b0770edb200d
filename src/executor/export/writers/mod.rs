//! Format writers for export operations
//!
//! This module provides a unified interface for writing resolved records to
//! the supported file formats (JSON array, CSV).

use std::io::Write;

use crate::error::Result;
use crate::model::{ExportRecord, OutputFormat, OutputKind};
use crate::template::{CellTemplate, Template, TemplateEngine};

pub mod csv;
pub mod json;

pub use self::csv::CsvWriter;
pub use self::json::JsonArrayWriter;

/// Trait for writing records to different file formats
pub trait FormatWriter {
    /// Resolve and write one record
    ///
    /// # Arguments
    /// * `record` - Record to write
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn write_record(&mut self, record: &ExportRecord) -> Result<()>;

    /// Finalize the output (write footers, flush buffers)
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn finalize(&mut self) -> Result<()>;

    /// Number of records written so far
    fn written(&self) -> u64;
}

/// Output format compiled for one output kind
#[derive(Debug, Clone)]
pub enum CompiledFormat {
    /// Whole-text template, parsed as JSON after substitution
    Json(Template),
    /// Header names and one cell template per column
    Csv {
        headers: Vec<String>,
        cells: Vec<CellTemplate>,
    },
}

impl CompiledFormat {
    /// Compile an output format for the given kind
    ///
    /// # Arguments
    /// * `kind` - Output kind
    /// * `format` - User-supplied output format
    /// * `engine` - Template engine holding the delimiters
    ///
    /// # Returns
    /// * `Result<Self>` - Compiled format or template error
    pub fn compile(kind: OutputKind, format: &OutputFormat, engine: &TemplateEngine) -> Result<Self> {
        match kind {
            OutputKind::Json => Ok(CompiledFormat::Json(engine.compile(format.text())?)),
            OutputKind::Csv => {
                let columns = format.columns()?;
                let mut headers = Vec::with_capacity(columns.len());
                let mut cells = Vec::with_capacity(columns.len());
                for (key, cell) in &columns {
                    headers.push(key.clone());
                    cells.push(engine.compile_cell(cell)?);
                }
                Ok(CompiledFormat::Csv { headers, cells })
            }
        }
    }

    /// Create the writer for this format over `sink`
    pub fn into_writer<'a>(self, sink: Box<dyn Write + 'a>) -> Result<Box<dyn FormatWriter + 'a>> {
        match self {
            CompiledFormat::Json(template) => Ok(Box::new(JsonArrayWriter::new(sink, template)?)),
            CompiledFormat::Csv { headers, cells } => {
                Ok(Box::new(CsvWriter::new(sink, &headers, cells)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_csv_keeps_header_order() {
        let format = OutputFormat::new(Some(
            r#"{"zeta": "__-vid-__", "alpha": null, "mid": {"k": 1}}"#,
        ));
        let compiled =
            CompiledFormat::compile(OutputKind::Csv, &format, &TemplateEngine::default()).unwrap();
        match compiled {
            CompiledFormat::Csv { headers, cells } => {
                assert_eq!(headers, ["zeta", "alpha", "mid"]);
                assert_eq!(cells[1], CellTemplate::Empty);
            }
            other => panic!("expected CSV format, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_json_does_not_require_valid_json() {
        // JSON text is only validated after substitution
        let format = OutputFormat::new(Some("{\"n\": __-n-__}"));
        assert!(CompiledFormat::compile(OutputKind::Json, &format, &TemplateEngine::default()).is_ok());
        assert!(CompiledFormat::compile(OutputKind::Csv, &format, &TemplateEngine::default()).is_err());
    }
}
