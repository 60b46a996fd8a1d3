//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::formatters::{format_names, format_prune_summary, section_header};
pub use self::progress::ProgressReporter;
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::{DumpReport, OutputFormat};

/// Trait for the dump report renderings
pub trait Formatter {
    /// Format a dump report into a string
    fn format(&self, report: &DumpReport) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
}

impl TextFormatter {
    pub fn new(use_colors: bool, verbose: bool) -> Self {
        Self { use_colors, verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &DumpReport) -> Result<String> {
        Ok(formatters::format_dump_text(report, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, report: &DumpReport) -> Result<String> {
        formatters::format_dump_json(report)
    }
}

/// CSV formatter, one row per dependency
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, report: &DumpReport) -> Result<String> {
        formatters::format_dump_csv(report)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat, use_colors: bool, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
