//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Binding package trimmed when nothing else is configured
pub const DEFAULT_BINDING_PACKAGE: &str = "PySide2";

/// Core module imported to locate the binding package through the interpreter
pub const DEFAULT_PROBE_MODULE: &str = "QtCore";

/// Tool binaries shipped with the binding that an application never needs at runtime
pub const DEFAULT_AUXILIARY_BINARIES: [&str; 4] = ["designer", "rcc", "uic", "pyside2-lupdate"];

/// Markers in the loader trace that mean the target did not run cleanly
pub const DEFAULT_FATAL_MARKERS: [&str; 3] = ["Abort", "ImportError", "Traceback"];

/// Main configuration settings for trim-ps2
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Interpreter of the bundle; discovered through `python3` when absent
    pub python: Option<PathBuf>,

    /// Name of the binding package directory under `app_packages`
    pub binding_package: String,

    /// Module of the binding imported when its directory has to be discovered
    pub probe_module: String,

    /// File names removed from the binding directory unconditionally
    pub auxiliary_binaries: Vec<String>,

    /// Trace markers that make a sampling run fatal
    pub fatal_markers: Vec<String>,

    /// Extra environment passed to the traced application
    pub trace_env: BTreeMap<String, String>,

    /// Report only, never delete
    pub dump: bool,

    /// Output format of the dump report (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show debug diagnostics
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mut trace_env = BTreeMap::new();
        trace_env.insert("QT_DEBUG_PLUGINS".to_string(), "1".to_string());

        Self {
            python: None,
            binding_package: DEFAULT_BINDING_PACKAGE.to_string(),
            probe_module: DEFAULT_PROBE_MODULE.to_string(),
            auxiliary_binaries: DEFAULT_AUXILIARY_BINARIES.iter().map(|s| s.to_string()).collect(),
            fatal_markers: DEFAULT_FATAL_MARKERS.iter().map(|s| s.to_string()).collect(),
            trace_env,
            dump: false,
            output_format: OutputFormat::Text,
            output_file: None,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported output formats for the dump report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output, one row per dependency
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub python: Option<PathBuf>,
    pub binding_package: Option<String>,
    pub probe_module: Option<String>,
    pub auxiliary_binaries: Option<Vec<String>>,
    pub fatal_markers: Option<Vec<String>>,
    pub trace_env: Option<BTreeMap<String, String>>,
    #[serde(skip)]
    pub dump: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.python.is_some() {
            self.python = other.python;
        }
        if other.binding_package.is_some() {
            self.binding_package = other.binding_package;
        }
        if other.probe_module.is_some() {
            self.probe_module = other.probe_module;
        }
        if other.auxiliary_binaries.is_some() {
            self.auxiliary_binaries = other.auxiliary_binaries;
        }
        if other.fatal_markers.is_some() {
            self.fatal_markers = other.fatal_markers;
        }
        if let Some(env) = other.trace_env {
            // Environment tables accumulate across sources
            self.trace_env.get_or_insert_with(BTreeMap::new).extend(env);
        }
        if other.dump.is_some() {
            self.dump = other.dump;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(python) = &self.python {
            settings.python = Some(python.clone());
        }
        if let Some(binding_package) = &self.binding_package {
            settings.binding_package = binding_package.clone();
        }
        if let Some(probe_module) = &self.probe_module {
            settings.probe_module = probe_module.clone();
        }
        if let Some(auxiliary_binaries) = &self.auxiliary_binaries {
            settings.auxiliary_binaries = auxiliary_binaries.clone();
        }
        if let Some(fatal_markers) = &self.fatal_markers {
            settings.fatal_markers = fatal_markers.clone();
        }
        if let Some(trace_env) = &self.trace_env {
            settings.trace_env.extend(trace_env.clone());
        }
        if let Some(dump) = self.dump {
            settings.dump = dump;
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
