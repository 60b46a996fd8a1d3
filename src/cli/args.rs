//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// trim-ps2 - remove unused PySide2 shared objects from a Python application bundle
#[derive(Parser, Debug)]
#[command(name = "trim-ps2")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Remove the PySide2 shared objects a Python application never loads")]
#[command(long_about = "trim-ps2 runs a Python application module under the bundle's interpreter, \
records every shared object it loads, expands that set with the libraries the dynamic linker \
pulls in, and deletes every other shared object from the bundled PySide2 package. \
With --dump nothing is deleted; the dependencies are attributed to OS packages instead.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Trim the bundle the current python3 belongs to, for the module 'myapp'
    trim-ps2 myapp

    # Point at the interpreter of a Briefcase bundle
    trim-ps2 myapp --python build/myapp/linux/myapp/usr/bin/python

Inspecting:
    # Report what the application needs without deleting anything
    trim-ps2 myapp --dump

    # Machine-readable dependency report
    trim-ps2 myapp --dump --output json --output-file deps.json
    trim-ps2 myapp --dump --output csv > deps.csv

Configuration:
    # Create a default .trim-ps2.toml in the current directory
    trim-ps2 --init

    # Use a specific configuration file
    trim-ps2 myapp --config ./trim.toml

EXIT CODES:
    0  success
    1  usage error
    2  the application module did not run cleanly
    3  the binding package was not found
    4  any other failure
")]
pub struct Args {
    /// Python module of the application, run as `python -m <MODULE>`
    #[arg(value_name = "MODULE")]
    pub module: Option<String>,

    /// Report dependencies only, never delete
    #[arg(long, help = "Print the dependency breakdown and OS package suggestions instead of deleting anything")]
    pub dump: bool,

    /// Interpreter of the application bundle
    #[arg(long, value_name = "PATH", help = "Interpreter of the bundle, <bundle>/bin/python (defaults to what python3 reports as sys.executable)")]
    pub python: Option<PathBuf>,

    /// Binding package to trim
    #[arg(long, value_name = "NAME", help = "Binding package directory under app_packages (default: PySide2)")]
    pub binding_package: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .trim-ps2.toml in current directory if not specified)")]
    pub config: Option<PathBuf>,

    /// Output format of the dump report (text, json, csv)
    #[arg(short, long, value_enum, help = "Output format of the --dump report: 'text' for the console, 'json' or 'csv' for machine processing")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write the --dump report to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, help = "Disable colored output (useful for piping output)")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars (useful for CI environments)")]
    pub no_progress: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose", help = "Only log errors and hide progress bars")]
    pub quiet: bool,

    /// Show debug diagnostics
    #[arg(short, long, help = "Log every external command and its exit code")]
    pub verbose: bool,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.trim-ps2.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output, one row per dependency
    Csv,
}

impl From<OutputFormat> for crate::models::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => crate::models::OutputFormat::Text,
            OutputFormat::Json => crate::models::OutputFormat::Json,
            OutputFormat::Csv => crate::models::OutputFormat::Csv,
        }
    }
}

impl Args {
    /// Parse arguments, returning clap's error instead of exiting
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Args::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_and_dump() {
        let args = Args::try_parse_from(["trim-ps2", "myapp", "--dump"]).unwrap();
        assert_eq!(args.module.as_deref(), Some("myapp"));
        assert!(args.dump);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_module_is_optional_for_init() {
        let args = Args::try_parse_from(["trim-ps2", "--init"]).unwrap();
        assert!(args.init);
        assert!(args.module.is_none());
    }

    #[test]
    fn test_output_format() {
        let args = Args::try_parse_from(["trim-ps2", "myapp", "-o", "csv"]).unwrap();
        assert_eq!(args.output, Some(OutputFormat::Csv));
        assert!(Args::try_parse_from(["trim-ps2", "myapp", "-o", "xml"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["trim-ps2", "myapp", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        assert!(Args::try_parse_from(["trim-ps2", "myapp", "--debug"]).is_err());
    }
}
