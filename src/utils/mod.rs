//! Small helpers shared across the pipeline

pub mod size;

pub use size::{directory_size, format_size};
