//! Error handling for trim-ps2
//!
//! Error types, the crate-wide result alias, and helpers for attaching context
//! and deciding whether a failure is advisory or fatal.

pub mod context;
pub mod types;

pub use context::{handle_error, OptionExt, ResultExt};
pub use types::{ErrorSeverity, Result, TrimError};
pub use types::{EXIT_BINDING_NOT_FOUND, EXIT_FAILURE, EXIT_TARGET_ABORTED, EXIT_USAGE};
