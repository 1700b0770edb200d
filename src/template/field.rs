//! Placeholder name resolution against one export record
//!
//! A handful of names map to record columns; every other name is a nested
//! path into the record's `auth_data_received` payload.

use serde_json::Value;

use super::path::JsonPath;
use crate::error::{FieldError, PathError};
use crate::model::ExportRecord;

/// A resolvable placeholder name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldName {
    /// `vid`, taken from the input payload or, failing that, the received payload
    Vid,
    /// `status` column
    Status,
    /// `token` column
    Token,
    /// `error_code` column
    ErrorCode,
    /// `error_message` column
    ErrorMessage,
    /// Nested path into `auth_data_received`
    Path(JsonPath),
}

impl FieldName {
    /// Parse a placeholder name
    ///
    /// # Arguments
    /// * `name` - Name found between the placeholder delimiters
    ///
    /// # Returns
    /// * `Result<Self, PathError>` - Field, or an error if a non-reserved name
    ///   is not a valid path
    pub fn parse(name: &str) -> Result<Self, PathError> {
        Ok(match name {
            "vid" => FieldName::Vid,
            "status" => FieldName::Status,
            "token" => FieldName::Token,
            "error_code" => FieldName::ErrorCode,
            "error_message" => FieldName::ErrorMessage,
            other => FieldName::Path(JsonPath::parse(other)?),
        })
    }

    /// Resolve this field for a record
    ///
    /// Absent values are `Ok(None)`. A malformed payload, an input payload
    /// without a `vid` key, or a `vid` lookup with no payload at all is an error.
    pub fn resolve(&self, record: &ExportRecord) -> Result<Option<Value>, FieldError> {
        match self {
            FieldName::Vid => resolve_vid(record),
            FieldName::Status => Ok(Some(Value::String(record.status.clone()))),
            FieldName::Token => Ok(record.token.clone().map(Value::String)),
            FieldName::ErrorCode => Ok(record.error_code.clone().map(Value::String)),
            FieldName::ErrorMessage => Ok(record.error_message.clone().map(Value::String)),
            FieldName::Path(path) => match present(&record.auth_data_received) {
                Some(received) => {
                    let received = parse_payload("auth_data_received", received)?;
                    Ok(path.resolve(&received).cloned())
                }
                None => Ok(None),
            },
        }
    }
}

fn resolve_vid(record: &ExportRecord) -> Result<Option<Value>, FieldError> {
    if let Some(input) = present(&record.auth_data_input) {
        let input = parse_payload("auth_data_input", input)?;
        return input
            .get("vid")
            .cloned()
            .map(Some)
            .ok_or(FieldError::MissingVid);
    }

    // Without an input payload the received payload is required; only a
    // missing `vid` key inside it is tolerated
    let received = present(&record.auth_data_received).ok_or(FieldError::MissingPayload {
        field: "auth_data_received",
    })?;
    Ok(parse_payload("auth_data_received", received)?
        .get("vid")
        .cloned())
}

/// Payload text, treating an empty string like a missing one
fn present(payload: &Option<String>) -> Option<&str> {
    payload.as_deref().filter(|p| !p.is_empty())
}

fn parse_payload(field: &'static str, text: &str) -> Result<Value, FieldError> {
    serde_json::from_str(text).map_err(|source| FieldError::MalformedPayload { field, source })
}

/// Resolve a placeholder name against a record
///
/// # Arguments
/// * `name` - Placeholder name
/// * `record` - Record to read from
///
/// # Returns
/// * `Result<Option<Value>>` - Resolved value, None if absent
pub fn resolve_field(name: &str, record: &ExportRecord) -> crate::error::Result<Option<Value>> {
    Ok(FieldName::parse(name)?.resolve(record)?)
}

/// Render a resolved value as substitution text
///
/// Strings are inserted verbatim, absent and null values as the empty
/// string, everything else as compact JSON text.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ExportRecord {
        ExportRecord {
            auth_data_input: None,
            auth_data_received: None,
            status: "success".to_string(),
            token: Some("tok-1".to_string()),
            error_code: None,
            error_message: None,
        }
    }

    #[test]
    fn test_nested_path_from_received() {
        let rec = ExportRecord {
            auth_data_received: Some(r#"{"a":{"b":"x"}}"#.to_string()),
            ..record()
        };
        assert_eq!(resolve_field("a.b", &rec).unwrap(), Some(json!("x")));
        assert_eq!(resolve_field("a.c", &rec).unwrap(), None);
    }

    #[test]
    fn test_path_without_received_is_absent() {
        assert_eq!(resolve_field("a.b", &record()).unwrap(), None);
    }

    #[test]
    fn test_vid_prefers_input() {
        let rec = ExportRecord {
            auth_data_input: Some(r#"{"vid":"V1"}"#.to_string()),
            auth_data_received: Some(r#"{"vid":"V2"}"#.to_string()),
            ..record()
        };
        assert_eq!(resolve_field("vid", &rec).unwrap(), Some(json!("V1")));

        let rec = ExportRecord {
            auth_data_received: Some("not json".to_string()),
            ..rec
        };
        assert_eq!(resolve_field("vid", &rec).unwrap(), Some(json!("V1")));
    }

    #[test]
    fn test_vid_falls_back_to_received() {
        let rec = ExportRecord {
            auth_data_received: Some(r#"{"vid":"V2"}"#.to_string()),
            ..record()
        };
        assert_eq!(resolve_field("vid", &rec).unwrap(), Some(json!("V2")));

        let rec = ExportRecord {
            auth_data_received: Some("{}".to_string()),
            ..record()
        };
        assert_eq!(resolve_field("vid", &rec).unwrap(), None);
    }

    #[test]
    fn test_vid_without_any_payload_is_error() {
        assert!(matches!(
            FieldName::Vid.resolve(&record()),
            Err(FieldError::MissingPayload {
                field: "auth_data_received"
            })
        ));

        // An empty input payload counts as absent, an empty received one as missing
        let rec = ExportRecord {
            auth_data_input: Some(String::new()),
            auth_data_received: Some(String::new()),
            ..record()
        };
        assert!(matches!(
            FieldName::Vid.resolve(&rec),
            Err(FieldError::MissingPayload { .. })
        ));
    }

    #[test]
    fn test_vid_input_errors_surface() {
        let rec = ExportRecord {
            auth_data_input: Some(r#"{"other":1}"#.to_string()),
            ..record()
        };
        assert!(matches!(
            FieldName::Vid.resolve(&rec),
            Err(FieldError::MissingVid)
        ));

        let rec = ExportRecord {
            auth_data_input: Some("{broken".to_string()),
            ..record()
        };
        assert!(matches!(
            FieldName::Vid.resolve(&rec),
            Err(FieldError::MalformedPayload {
                field: "auth_data_input",
                ..
            })
        ));
    }

    #[test]
    fn test_reserved_columns() {
        let rec = ExportRecord {
            error_code: Some("E1".to_string()),
            error_message: Some("bad".to_string()),
            ..record()
        };
        assert_eq!(resolve_field("status", &rec).unwrap(), Some(json!("success")));
        assert_eq!(resolve_field("token", &rec).unwrap(), Some(json!("tok-1")));
        assert_eq!(resolve_field("error_code", &rec).unwrap(), Some(json!("E1")));
        assert_eq!(resolve_field("error_message", &rec).unwrap(), Some(json!("bad")));
        assert_eq!(resolve_field("error_code", &record()).unwrap(), None);
    }

    #[test]
    fn test_reserved_names_ignore_received_payload() {
        let rec = ExportRecord {
            auth_data_received: Some(r#"{"status":"from-payload"}"#.to_string()),
            ..record()
        };
        assert_eq!(resolve_field("status", &rec).unwrap(), Some(json!("success")));
    }

    #[test]
    fn test_malformed_received_is_error() {
        let rec = ExportRecord {
            auth_data_received: Some("[oops".to_string()),
            ..record()
        };
        assert!(resolve_field("a", &rec).is_err());
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(None), "");
        assert_eq!(render_value(Some(&Value::Null)), "");
        assert_eq!(render_value(Some(&json!("x"))), "x");
        assert_eq!(render_value(Some(&json!(42))), "42");
        assert_eq!(render_value(Some(&json!(false))), "false");
        assert_eq!(render_value(Some(&json!({"k": [1, 2]}))), r#"{"k":[1,2]}"#);
    }
}
