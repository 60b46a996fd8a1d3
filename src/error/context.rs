//! Error context utilities
//!
//! Helpers for adding context to errors and for handling advisory failures
//! in a consistent way throughout the pipeline.

use std::path::Path;
use tracing::{error, warn};

use crate::error::{ErrorSeverity, Result, TrimError};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;

    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| TrimError::Context {
            message: format!("{}: {}", context(), err),
        })
    }

    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let io_err = (&err as &(dyn std::error::Error + 'static)).downcast_ref::<std::io::Error>();
            if let Some(io_err) = io_err {
                if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                    return TrimError::PermissionDenied {
                        path: path.as_ref().to_path_buf(),
                    };
                }
            }

            TrimError::DirectoryTraversal {
                path: path.as_ref().to_path_buf(),
                message: format!("{}", err),
            }
        })
    }
}

/// Handle an error based on its severity
///
/// - Warning: log the error and return None
/// - Error: log the error and return None
/// - Critical: return Some(error) so the caller can propagate it
pub fn handle_error(err: TrimError) -> Option<TrimError> {
    match err.severity() {
        ErrorSeverity::Warning => {
            warn!("{}", err.user_message());
            None
        }
        ErrorSeverity::Error => {
            error!("{}", err.user_message());
            None
        }
        ErrorSeverity::Critical => Some(err),
    }
}

/// Extension trait for Option to convert to Result with a custom error
pub trait OptionExt<T> {
    /// Convert Option to Result with a custom error
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> TrimError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> TrimError,
    {
        self.ok_or_else(err_fn)
    }
}
