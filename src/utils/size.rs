//! Directory size helpers

use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Result, ResultExt};

/// Total size in bytes of the regular files under `path`
pub fn directory_size(path: &Path) -> Result<u64> {
    let mut total = 0;

    for entry in WalkDir::new(path) {
        let entry = entry.with_file_context(path)?;
        if entry.file_type().is_file() {
            total += entry.metadata().with_file_context(entry.path())?.len();
        }
    }

    Ok(total)
}

/// Human-readable size, e.g. `1.50MB`
pub fn format_size(size: u64) -> String {
    if size < 1024 {
        format!("{}B", size)
    } else if size < 1024 * 1024 {
        format!("{:.2}KB", size as f64 / 1024.0)
    } else if size < 1024 * 1024 * 1024 {
        format!("{:.2}MB", size as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2}GB", size as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
