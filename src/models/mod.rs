//! Data models and structures for trim-ps2

pub mod config;
pub mod deps;
pub mod report;

pub use config::{OutputFormat, PartialSettings, Settings};
pub use deps::{DependencySet, Resolution, RetainedSet};
pub use report::{Attribution, DependencyCategory, DependencyRow, DumpReport, PruneReport};
