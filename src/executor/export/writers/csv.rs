//! CSV writer for export operations
//!
//! This module writes one header row from the output format keys and one row
//! per record. Quoting follows the usual minimal rules: a field is quoted when
//! it contains the delimiter, a quote, CR or LF, and quotes are doubled.

use std::io::Write;

use ::csv::{Terminator, WriterBuilder};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::model::ExportRecord;
use crate::template::CellTemplate;

use super::FormatWriter;

/// Writer for CSV output
pub struct CsvWriter<W: Write> {
    /// CSV encoder over the output sink
    writer: ::csv::Writer<W>,
    /// One template per column
    cells: Vec<CellTemplate>,
    /// Number of records written
    written: u64,
}

impl<W: Write> CsvWriter<W> {
    /// Create a new CSV writer and write the header row
    ///
    /// # Arguments
    /// * `sink` - Output sink
    /// * `headers` - Column names in output order
    /// * `cells` - Cell templates, one per header
    ///
    /// # Returns
    /// * `Result<Self>` - New writer instance or error
    pub fn new(sink: W, headers: &[String], cells: Vec<CellTemplate>) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(sink);
        writer.write_record(headers)?;

        debug!("Wrote CSV headers: {} fields", headers.len());

        Ok(Self {
            writer,
            cells,
            written: 0,
        })
    }
}

impl<W: Write> FormatWriter for CsvWriter<W> {
    fn write_record(&mut self, record: &ExportRecord) -> Result<()> {
        let row = self
            .cells
            .iter()
            .map(|cell| cell.render(record).map(Option::unwrap_or_default))
            .collect::<std::result::Result<Vec<String>, FieldError>>()?;

        self.writer.write_record(&row)?;
        self.written += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        debug!("Finalized CSV output ({} records)", self.written);
        Ok(())
    }

    fn written(&self) -> u64 {
        self.written
    }
}
