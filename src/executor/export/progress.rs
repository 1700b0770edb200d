//! Progress reporting for export invocations
//!
//! The record count of a request is not known up front, so progress is a
//! spinner showing records written and the current write rate.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix}: {pos} records {msg}";

/// Spinner for one export invocation, or a no-op when disabled
pub struct ProgressTracker {
    started: Instant,
    spinner: Option<ProgressBar>,
}

impl ProgressTracker {
    /// Create a tracker for one request
    ///
    /// # Arguments
    /// * `request_id` - Shown as the spinner prefix
    /// * `enabled` - Whether to draw anything
    pub fn new(request_id: &str, enabled: bool) -> Self {
        let spinner = enabled.then(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
                spinner.set_style(style);
            }
            spinner.set_prefix(request_id.to_string());
            spinner
        });

        Self {
            started: Instant::now(),
            spinner,
        }
    }

    /// Report the number of records written so far
    pub fn update(&self, written: u64) {
        let Some(spinner) = &self.spinner else {
            return;
        };
        spinner.set_position(written);

        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            spinner.set_message(format!("({:.0}/s)", written as f64 / elapsed));
        }
    }

    /// Clear the spinner
    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.spinner.is_some()
    }
}
