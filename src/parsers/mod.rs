//! Parsers for the text printed by external tools
//!
//! Each parser turns the raw output of one tool into structured sets and is
//! tested against literal fixtures, independent of the tool being installed.

pub mod apt_file;
pub mod dpkg;
pub mod ldd;
pub mod loader_trace;

pub use apt_file::AptFileParser;
pub use dpkg::DpkgParser;
pub use ldd::LddParser;
pub use loader_trace::{LoaderTraceParser, TraceSample};
