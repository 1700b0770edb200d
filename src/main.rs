//! Token Export
//!
//! Exports the records of one export request to a JSON or CSV file.
//!
//! # Usage
//!
//! ```bash
//! # JSON array with the default output format
//! token-export req-42
//!
//! # CSV with a custom output format
//! token-export req-42 --output-type csv --format '{"vid": "__-vid-__", "status": "__-status-__"}'
//! ```

use std::process::ExitCode;

use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use token_export::cli::CliInterface;
use token_export::error::Result;
use token_export::{ExportOutcome, ExportSettings, Exporter, MongoStore};

/// Exit code when the export ran and failed
const EXIT_EXPORT_FAILED: u8 = 2;

/// Application entry point
fn main() -> ExitCode {
    match run() {
        Ok(ExportOutcome::Done(summary)) => {
            println!(
                "Exported {} records to {}",
                summary.records,
                summary.path.display()
            );
            ExitCode::SUCCESS
        }
        Ok(ExportOutcome::Failed(failure)) => {
            eprintln!("Export failed: {}", failure.status_code());
            ExitCode::from(EXIT_EXPORT_FAILED)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Connect to the request store and run the export
///
/// # Returns
/// * `Result<ExportOutcome>` - Export outcome, or a setup error
fn run() -> Result<ExportOutcome> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    let job = cli.export_job()?;
    let settings = ExportSettings::from_config(&cli.config().export)?;

    info!("Connecting to {}", cli.get_sanitized_connection_uri());
    let store = MongoStore::connect(&cli.config().store)?;

    let mut exporter = Exporter::new(store, settings);
    Ok(exporter.export(&job))
}

/// Initialize logging system based on verbosity level
///
/// `RUST_LOG` takes precedence over the configured level unless `-v` or
/// `--vv` was given.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level: Level = cli.config().logging.level.to_tracing_level();
    let args = cli.args();
    let rust_log = if args.verbose || args.very_verbose {
        None
    } else {
        std::env::var("RUST_LOG").ok()
    };

    // Logs go to stderr, results to stdout
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(level, rust_log.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}

/// Build the log filter from `RUST_LOG` directives, falling back to `level`
fn log_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()))
}
