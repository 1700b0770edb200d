//! Command-line interface for token-export
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading, overriding and validation
//! - Building the export job for the requested output

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::error::{ConfigError, Result};
use crate::executor::export::ExportJob;
use crate::model::OutputKind;

/// Export the records of one request to a JSON or CSV file
#[derive(Parser, Debug)]
#[command(
    name = "token-export",
    version,
    about = "Export request records to JSON or CSV files",
    long_about = "Reads the records of one export request from MongoDB, renders each record
through a placeholder template and writes <output dir>/<request id>. On failure the request
status is set to an error_creating_download_* code."
)]
pub struct CliArgs {
    /// Request whose records are exported
    #[arg(value_name = "REQUEST_ID")]
    pub request_id: String,

    /// Output file kind (json, csv)
    #[arg(short = 't', long, value_name = "KIND", default_value = "json")]
    pub output_type: OutputKind,

    /// Output format template
    #[arg(long, value_name = "TEXT", conflicts_with = "format_file")]
    pub format: Option<String>,

    /// File holding the output format template
    #[arg(long, value_name = "FILE")]
    pub format_file: Option<PathBuf>,

    /// Directory output files are written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// MongoDB connection URI
    ///
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    #[arg(long, value_name = "URI")]
    pub uri: Option<String>,

    /// Database name holding the request and record collections
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Show a progress spinner
    #[arg(long)]
    pub progress: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded and validated configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        // Apply CLI arguments to override config values
        Self::apply_args_to_config(&mut config, args);

        config.validate()?;
        Ok(config)
    }

    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(dir) = &args.output_dir {
            config.export.output_dir = dir.clone();
        }
        if args.progress {
            config.export.progress = true;
        }

        if let Some(uri) = &args.uri {
            config.store.uri = uri.clone();
        }
        if let Some(database) = &args.database {
            config.store.database = database.clone();
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Build the export job described by the arguments
    ///
    /// # Returns
    /// * `Result<ExportJob>` - Job, or an error if the format file is unreadable
    pub fn export_job(&self) -> Result<ExportJob> {
        let format = match &self.args.format_file {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|source| {
                ConfigError::FileRead {
                    path: path.clone(),
                    source,
                }
            })?),
            None => self.args.format.clone(),
        };

        Ok(ExportJob::new(
            self.args.request_id.clone(),
            self.args.output_type,
            format.as_deref(),
        ))
    }

    /// Get sanitized connection URI for display (hides credentials)
    ///
    /// # Returns
    /// * `String` - Sanitized URI with credentials replaced by ***
    pub fn get_sanitized_connection_uri(&self) -> String {
        Self::sanitize_uri(&self.config.store.uri)
    }

    /// Sanitize URI by hiding the user info part
    fn sanitize_uri(uri: &str) -> String {
        let Some(proto_end) = uri.find("://") else {
            return uri.to_string();
        };
        let rest = &uri[proto_end + 3..];
        let authority_end = rest.find('/').unwrap_or(rest.len());
        match rest[..authority_end].rfind('@') {
            Some(at) => format!("{}***{}", &uri[..proto_end + 3], &rest[at..]),
            None => uri.to_string(),
        }
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }
}
