//! Export data model
//!
//! Requests and records as read from the request store, plus the output
//! kind and output format supplied with each export invocation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result, TemplateError};

/// Template used when an export is invoked without an output format
pub const DEFAULT_OUTPUT_FORMAT: &str = r#"{
    "vid": "__-vid-__",
    "token": "__-token-__",
    "status": "__-status-__",
    "errorCode": "__-error_code-__",
    "errorMessage": "__-error_message-__"
}"#;

/// An export request as tracked by the upstream request processor
///
/// This subsystem only writes `status`, and only when an export fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Request identifier, also the output file name
    pub request_id: String,
    /// Lifecycle status
    pub status: String,
    /// Last time the status was committed
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExportRequest {
    /// Create a request with the given status
    pub fn new(request_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: status.into(),
            updated_at: None,
        }
    }

    /// Set a new status and refresh the update timestamp
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.updated_at = Some(Utc::now());
    }
}

/// One row belonging to an export request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Input payload (JSON text)
    #[serde(default)]
    pub auth_data_input: Option<String>,
    /// Response payload (JSON text)
    #[serde(default)]
    pub auth_data_received: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Output file kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Top-level JSON array, one object per record
    Json,
    /// Header row of format keys, one row per record
    Csv,
}

impl FromStr for OutputKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputKind::Json),
            "csv" => Ok(OutputKind::Csv),
            _ => Err(ConfigError::InvalidValue {
                field: "output_type".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Json => f.write_str("json"),
            OutputKind::Csv => f.write_str("csv"),
        }
    }
}

/// User-supplied output format
///
/// The text is a JSON object whose keys name the output fields and whose
/// values carry placeholders. JSON exports substitute the whole text per
/// record; CSV exports parse it once into ordered columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    text: String,
}

impl OutputFormat {
    /// Create an output format, falling back to the default template for
    /// a missing or empty text
    pub fn new(text: Option<&str>) -> Self {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_OUTPUT_FORMAT,
        };
        Self {
            text: text.to_string(),
        }
    }

    /// Raw template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the format into ordered `(key, cell)` columns
    ///
    /// # Returns
    /// * `Result<Vec<(String, Value)>>` - Columns in template key order
    pub fn columns(&self) -> Result<Vec<(String, Value)>> {
        let parsed: Value = serde_json::from_str(&self.text)?;
        match parsed {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(TemplateError::NotAnObject.into()),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_kind_parse() {
        assert_eq!("json".parse::<OutputKind>().unwrap(), OutputKind::Json);
        assert_eq!("CSV".parse::<OutputKind>().unwrap(), OutputKind::Csv);
        assert!("xlsx".parse::<OutputKind>().is_err());
        assert_eq!(OutputKind::Csv.to_string(), "csv");
    }

    #[test]
    fn test_empty_format_uses_default() {
        assert_eq!(OutputFormat::new(Some("")).text(), DEFAULT_OUTPUT_FORMAT);
        assert_eq!(OutputFormat::new(None), OutputFormat::default());
    }

    #[test]
    fn test_default_columns_keep_order() {
        let keys: Vec<String> = OutputFormat::default()
            .columns()
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["vid", "token", "status", "errorCode", "errorMessage"]);
    }

    #[test]
    fn test_columns_reject_non_object() {
        let format = OutputFormat::new(Some("[\"__-vid-__\"]"));
        assert!(format.columns().is_err());
    }

    #[test]
    fn test_set_status_touches_timestamp() {
        let mut request = ExportRequest::new("req-1", "completed");
        assert!(request.updated_at.is_none());
        request.set_status("error_creating_download_unknown_exception");
        assert_eq!(request.status, "error_creating_download_unknown_exception");
        assert!(request.updated_at.is_some());
    }

    #[test]
    fn test_record_deserialize_missing_fields() {
        let record: ExportRecord = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(record.status, "ok");
        assert!(record.token.is_none());
        assert!(record.auth_data_input.is_none());
    }
}
