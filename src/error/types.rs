//! Error types and definitions for trim-ps2
//!
//! Every failure the pipeline can hit is a variant of [`TrimError`]. Each variant
//! carries a severity and maps onto one of the process exit codes.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when no target module was given or the options are malformed
pub const EXIT_USAGE: i32 = 1;
/// Exit code used when the traced module failed while sampling dependencies
pub const EXIT_TARGET_ABORTED: i32 = 2;
/// Exit code used when the binding package directory cannot be located
pub const EXIT_BINDING_NOT_FOUND: i32 = 3;
/// Exit code for every other failure (configuration, I/O, output)
pub const EXIT_FAILURE: i32 = 4;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for trim-ps2 operations
#[derive(Debug, Error)]
pub enum TrimError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Missing or malformed command-line arguments
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// The traced module crashed or printed a fatal marker
    #[error("{}", aborted_summary(.module, .code))]
    TargetAborted {
        module: String,
        code: Option<i32>,
        diagnostic: String,
    },

    /// The interpreter running the traced module could not be started
    #[error("'{module}' module could not be started, failed to run '{program}': {source}")]
    TargetNotStarted {
        module: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The binding package could not be located in the bundle or through the interpreter
    #[error("{package} not found")]
    BindingPackageNotFound { package: String, searched: PathBuf },

    /// The interpreter used to trace the application could not be determined
    #[error("Python interpreter not found: {message}")]
    InterpreterNotFound { message: String },

    /// An external program could not be started at all
    #[error("Failed to run '{program}': {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Regular expression compilation errors
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// A file could not be removed while pruning
    #[error("Failed to remove {path}: {source}")]
    Removal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Generic failure with context attached by [`crate::error::ResultExt`]
    #[error("{message}")]
    Context { message: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
}

fn aborted_summary(module: &str, code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("'{}' module exited with code {}", module, code),
        None => format!("'{}' module was terminated by a signal", module),
    }
}

impl TrimError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Advisory failures: the pipeline records them and moves on
            TrimError::CommandSpawn { .. } => ErrorSeverity::Warning,
            TrimError::Removal { .. } => ErrorSeverity::Warning,
            TrimError::PermissionDenied { .. } => ErrorSeverity::Warning,

            TrimError::Usage { .. } => ErrorSeverity::Critical,
            TrimError::TargetAborted { .. } => ErrorSeverity::Critical,
            TrimError::TargetNotStarted { .. } => ErrorSeverity::Critical,
            TrimError::BindingPackageNotFound { .. } => ErrorSeverity::Critical,
            TrimError::InterpreterNotFound { .. } => ErrorSeverity::Critical,
            TrimError::Config { .. } => ErrorSeverity::Critical,
            TrimError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            TrimError::ConfigRead { .. } => ErrorSeverity::Critical,
            TrimError::ConfigParse { .. } => ErrorSeverity::Critical,
            TrimError::StdoutWrite { .. } => ErrorSeverity::Critical,

            _ => ErrorSeverity::Error,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TrimError::Usage { .. } => EXIT_USAGE,
            TrimError::TargetAborted { .. } | TrimError::TargetNotStarted { .. } => EXIT_TARGET_ABORTED,
            TrimError::BindingPackageNotFound { .. } => EXIT_BINDING_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrimError::TargetAborted { module, code, .. } => {
                format!("{}. Abort deps gathering.", aborted_summary(module, code))
            }
            TrimError::TargetNotStarted { .. } => {
                format!("{}. Abort deps gathering.", self)
            }
            TrimError::BindingPackageNotFound { package, .. } => {
                format!("{} not found", package)
            }
            TrimError::InterpreterNotFound { message } => {
                format!("Python interpreter not found: {}. Pass --python <PATH> to point at the bundled interpreter.", message)
            }
            TrimError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create one with --init or drop the --config option.", path.display())
            }
            TrimError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            TrimError::InvalidPath { path } => {
                format!("Invalid path: '{}'.", path.display())
            }
            TrimError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        TrimError::Io { source }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        TrimError::Usage {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        TrimError::Config {
            message: message.into(),
        }
    }

    /// Create an error for a program that could not be started
    pub fn command_spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        TrimError::CommandSpawn {
            program: program.into(),
            source,
        }
    }

    /// Create a target-aborted error carrying the diagnostic output of the re-run
    pub fn target_aborted(
        module: impl Into<String>,
        code: Option<i32>,
        diagnostic: impl Into<String>,
    ) -> Self {
        TrimError::TargetAborted {
            module: module.into(),
            code,
            diagnostic: diagnostic.into(),
        }
    }

    /// Create a binding-package-not-found error
    pub fn binding_not_found(package: impl Into<String>, searched: impl Into<PathBuf>) -> Self {
        TrimError::BindingPackageNotFound {
            package: package.into(),
            searched: searched.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        TrimError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for TrimError {
    fn from(err: std::io::Error) -> Self {
        TrimError::io_error(err)
    }
}

impl From<glob::PatternError> for TrimError {
    fn from(err: glob::PatternError) -> Self {
        TrimError::GlobPattern { source: err }
    }
}

impl From<csv::Error> for TrimError {
    fn from(err: csv::Error) -> Self {
        TrimError::Csv { source: err }
    }
}

impl From<serde_json::Error> for TrimError {
    fn from(err: serde_json::Error) -> Self {
        TrimError::JsonSerialize { source: err }
    }
}

/// Result type alias for trim-ps2 operations
pub type Result<T> = std::result::Result<T, TrimError>;
