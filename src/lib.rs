//! trim-ps2 - shrink a bundled Python application by deleting the PySide2
//! shared objects it never loads
//!
//! The application module is run once under the bundle's interpreter with
//! import tracing on. Every shared object it loads, plus everything the
//! dynamic linker pulls in for those, is kept; every other shared object in
//! the binding package is removed.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use self::core::{CommandRunner, CommandSpec, RunOutcome, ScriptedRunner, SystemRunner, TrimReport, Trimmer};
pub use error::{handle_error, ErrorSeverity, OptionExt, Result, ResultExt, TrimError};
pub use models::{DependencySet, DumpReport, PruneReport, RetainedSet, Settings};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
