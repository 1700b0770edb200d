//! Placeholder templates
//!
//! A template is scanned once into literal and placeholder pieces. Rendering
//! resolves every placeholder occurrence on its own, so a name used twice is
//! looked up twice. Resolved text is inserted as-is and never rescanned for
//! delimiters.

use serde_json::Value;

use super::field::{FieldName, render_value};
use crate::error::{FieldError, Result, TemplateError};
use crate::formatter::JsonFormatter;
use crate::model::ExportRecord;

/// Default placeholder start token
pub const DEFAULT_VAR_STARTS: &str = "__-";

/// Default placeholder end token
pub const DEFAULT_VAR_ENDS: &str = "-__";

/// Placeholder start and end tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    start: String,
    end: String,
}

impl Delimiters {
    /// Create delimiters, rejecting empty tokens
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> std::result::Result<Self, TemplateError> {
        let (start, end) = (start.into(), end.into());
        if start.is_empty() || end.is_empty() {
            return Err(TemplateError::EmptyDelimiter);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: DEFAULT_VAR_STARTS.to_string(),
            end: DEFAULT_VAR_ENDS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Placeholder { name: String, field: FieldName },
}

/// A compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Split `text` into literal and placeholder pieces
    ///
    /// # Arguments
    /// * `text` - Template text
    /// * `delimiters` - Placeholder tokens
    ///
    /// # Returns
    /// * `Result<Self, TemplateError>` - Compiled template, or an error for an
    ///   unterminated placeholder or an invalid placeholder name
    pub fn parse(text: &str, delimiters: &Delimiters) -> std::result::Result<Self, TemplateError> {
        let mut pieces = Vec::new();
        let mut rest = text;
        let mut offset = 0;

        while let Some(start) = rest.find(delimiters.start()) {
            if start > 0 {
                pieces.push(Piece::Literal(rest[..start].to_string()));
            }

            let name_start = start + delimiters.start().len();
            let name_len = rest[name_start..]
                .find(delimiters.end())
                .ok_or(TemplateError::UnterminatedPlaceholder {
                    offset: offset + start,
                })?;
            let name = &rest[name_start..name_start + name_len];
            let field = FieldName::parse(name).map_err(|source| {
                TemplateError::InvalidPlaceholder {
                    name: name.to_string(),
                    source,
                }
            })?;
            pieces.push(Piece::Placeholder {
                name: name.to_string(),
                field,
            });

            let consumed = name_start + name_len + delimiters.end().len();
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            pieces.push(Piece::Literal(rest.to_string()));
        }

        Ok(Self { pieces })
    }

    /// Placeholder names in order of appearance, duplicates included
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Placeholder { name, .. } => Some(name.as_str()),
            Piece::Literal(_) => None,
        })
    }

    /// Render the template for one record
    pub fn render(&self, record: &ExportRecord) -> std::result::Result<String, FieldError> {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Placeholder { field, .. } => {
                    let value = field.resolve(record)?;
                    out.push_str(&render_value(value.as_ref()));
                }
            }
        }
        Ok(out)
    }
}

/// Template for one CSV cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellTemplate {
    /// Null or empty cell, always an empty field
    Empty,
    /// Text cell with placeholders
    Text(Template),
}

impl CellTemplate {
    /// Render the cell for one record
    ///
    /// # Returns
    /// * `Result<Option<String>, FieldError>` - Cell text, None for an empty cell
    pub fn render(&self, record: &ExportRecord) -> std::result::Result<Option<String>, FieldError> {
        match self {
            CellTemplate::Empty => Ok(None),
            CellTemplate::Text(template) => template.render(record).map(Some),
        }
    }
}

/// Template engine bound to a set of delimiters
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    delimiters: Delimiters,
}

impl TemplateEngine {
    pub fn new(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Compile template text
    pub fn compile(&self, text: &str) -> Result<Template> {
        Ok(Template::parse(text, &self.delimiters)?)
    }

    /// Compile one value of a CSV output format
    ///
    /// Strings are templates as they are. Non-string values are serialized to
    /// JSON text first; null and empty strings produce an empty cell.
    pub fn compile_cell(&self, cell: &Value) -> Result<CellTemplate> {
        let text = match cell {
            Value::Null => return Ok(CellTemplate::Empty),
            Value::String(s) if s.is_empty() => return Ok(CellTemplate::Empty),
            Value::String(s) => s.clone(),
            other => JsonFormatter::to_string(other)?,
        };
        Ok(CellTemplate::Text(self.compile(&text)?))
    }

    /// Substitute every placeholder in `template` for one record
    ///
    /// # Arguments
    /// * `template` - Template text, or None when no format is configured
    /// * `record` - Record to resolve placeholders against
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Rendered text, None for a missing or empty template
    pub fn substitute(&self, template: Option<&str>, record: &ExportRecord) -> Result<Option<String>> {
        match template {
            None | Some("") => Ok(None),
            Some(text) => Ok(Some(self.compile(text)?.render(record)?)),
        }
    }
}
