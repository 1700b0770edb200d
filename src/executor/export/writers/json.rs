//! JSON array writer for export operations
//!
//! Each record's template is substituted, parsed as JSON, and written as one
//! element of a top-level array.

use std::io::Write;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::formatter::JsonFormatter;
use crate::model::ExportRecord;
use crate::template::Template;

use super::FormatWriter;

/// Writer for JSON array output
pub struct JsonArrayWriter<W: Write> {
    /// Output sink
    writer: W,
    /// Compiled output template
    template: Template,
    /// Number of records written
    written: u64,
}

impl<W: Write> JsonArrayWriter<W> {
    /// Create a new JSON array writer and open the array
    ///
    /// # Arguments
    /// * `writer` - Output sink
    /// * `template` - Compiled output template
    ///
    /// # Returns
    /// * `Result<Self>` - New writer instance or error
    pub fn new(mut writer: W, template: Template) -> Result<Self> {
        writer.write_all(b"[")?;
        Ok(Self {
            writer,
            template,
            written: 0,
        })
    }
}

impl<W: Write> FormatWriter for JsonArrayWriter<W> {
    fn write_record(&mut self, record: &ExportRecord) -> Result<()> {
        let text = self.template.render(record)?;
        let value: Value = serde_json::from_str(&text)?;

        if self.written > 0 {
            self.writer.write_all(b",")?;
        }
        self.writer.write_all(&JsonFormatter::to_vec(&value)?)?;
        self.written += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.write_all(b"]")?;
        self.writer.flush()?;
        debug!("Finalized JSON array ({} records)", self.written);
        Ok(())
    }

    fn written(&self) -> u64 {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::template::TemplateEngine;

    fn template(text: &str) -> Template {
        TemplateEngine::default().compile(text).unwrap()
    }

    fn record(vid: &str, status: &str) -> ExportRecord {
        ExportRecord {
            auth_data_input: Some(format!(r#"{{"vid":"{}"}}"#, vid)),
            status: status.to_string(),
            ..Default::default()
        }
    }

    fn finish(writer: JsonArrayWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.writer).unwrap()
    }

    #[test]
    fn test_empty_array() {
        let mut writer = JsonArrayWriter::new(Vec::new(), template("{}")).unwrap();
        writer.finalize().unwrap();
        assert_eq!(finish(writer), "[]");
    }

    #[test]
    fn test_records_comma_joined() {
        let mut writer = JsonArrayWriter::new(
            Vec::new(),
            template(r#"{"vid":"__-vid-__","status":"__-status-__"}"#),
        )
        .unwrap();
        writer.write_record(&record("a", "success")).unwrap();
        writer.write_record(&record("b", "failed")).unwrap();
        writer.finalize().unwrap();

        assert_eq!(writer.written(), 2);
        let out = finish(writer);
        assert_eq!(
            out,
            r#"[{"vid": "a", "status": "success"},{"vid": "b", "status": "failed"}]"#
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_invalid_json_after_substitution() {
        let mut writer = JsonArrayWriter::new(Vec::new(), template(r#"{"v": __-status-__}"#)).unwrap();
        let err = writer.write_record(&record("a", "not-a-number")).unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }
}
