use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide `Result` type using [`ExportError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Top-level error type for export operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem errors while creating or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Output template errors.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// Placeholder resolution errors.
    #[error("{0}")]
    Field(#[from] FieldError),

    /// Nested path syntax errors.
    #[error("{0}")]
    Path(#[from] PathError),

    /// JSON parse or serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding errors that are not I/O failures.
    #[error("CSV error: {0}")]
    Csv(csv::Error),

    /// Record store errors.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Nested path syntax errors.
///
/// Only malformed paths are errors; a well-formed path that does not match
/// the data resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path has no segments at all.
    #[error("Empty path")]
    Empty,

    /// A segment between separators is empty, e.g. `a..b` or `a.`.
    #[error("Empty segment in path '{path}'")]
    EmptySegment { path: String },

    /// A `[` without the matching `]`.
    #[error("Unterminated bracket in path '{path}'")]
    UnterminatedBracket { path: String },

    /// Bracket content that is neither an index nor a quoted key.
    #[error("Invalid index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },

    /// A character that cannot start a segment, e.g. `a[0]b`.
    #[error("Unexpected '{found}' at position {position} in path '{path}'")]
    UnexpectedChar {
        path: String,
        found: char,
        position: usize,
    },
}

/// Placeholder resolution errors.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A record payload is not valid JSON.
    #[error("Malformed {field} payload: {source}")]
    MalformedPayload {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// `auth_data_input` is present but has no `vid` key.
    #[error("auth_data_input has no 'vid' key")]
    MissingVid,

    /// Neither payload is present, so `vid` has nothing to read from.
    #[error("{field} is missing")]
    MissingPayload { field: &'static str },
}

/// Output template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A start delimiter with no end delimiter after it.
    #[error("Unterminated placeholder at offset {offset}")]
    UnterminatedPlaceholder { offset: usize },

    /// A placeholder whose name is not a valid path.
    #[error("Invalid placeholder '{name}': {source}")]
    InvalidPlaceholder {
        name: String,
        #[source]
        source: PathError,
    },

    /// A configured delimiter is the empty string.
    #[error("Placeholder delimiters must not be empty")]
    EmptyDelimiter,

    /// The CSV output format is not a JSON object.
    #[error("CSV output format must be a JSON object")]
    NotAnObject,
}

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No request exists with the given id.
    #[error("Request not found: {0}")]
    RequestNotFound(String),

    /// A stored document could not be read.
    #[error("Invalid stored document: {0}")]
    InvalidDocument(String),

    /// MongoDB driver errors.
    #[error("MongoDB error: {0}")]
    MongoDb(#[from] mongodb::error::Error),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid config format.
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid field value.
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },
}

/* ========================= Conversions to ExportError ========================= */

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        // Keep I/O failures classifiable as disk errors; converting through
        // `io::Error::from` would rewrap them as `ErrorKind::Other`
        if !err.is_io_error() {
            return ExportError::Csv(err);
        }
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ExportError::Io(e),
            kind => ExportError::Io(io::Error::other(format!("{kind:?}"))),
        }
    }
}
