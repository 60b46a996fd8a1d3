//! Progress reporting for the per-library queries
//!
//! The bar is drawn on stderr so it never mixes with the report on stdout.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

const BAR_TEMPLATE: &str = "{spinner:.green} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress reporter for the long-running stages
pub struct ProgressReporter {
    enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: Mutex::new(None),
        }
    }

    /// Reporter that never draws anything
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a new operation of `total` steps
    pub fn start(&self, total: usize, operation: &str) {
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_prefix(operation.to_string());

        if let Ok(mut current) = self.bar.lock() {
            *current = Some(bar);
        }
    }

    /// Advance by one step, showing `message` next to the bar
    pub fn inc(&self, message: &str) {
        if let Ok(current) = self.bar.lock() {
            if let Some(bar) = current.as_ref() {
                bar.set_message(message.to_string());
                bar.inc(1);
            }
        }
    }

    /// Finish the current operation
    pub fn finish(&self, message: &str) {
        if let Ok(mut current) = self.bar.lock() {
            if let Some(bar) = current.take() {
                bar.finish_with_message(message.to_string());
            }
        }
    }
}
