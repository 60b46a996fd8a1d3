//! Deleting what the application does not need from the binding package

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{handle_error, Result, ResultExt, TrimError};
use crate::models::{PruneReport, RetainedSet};
use crate::output::ProgressReporter;
use crate::utils::directory_size;

/// Matches versioned names too (`libfoo.so`, `libfoo.so.5`, `libfoo.so.5.15.2`)
const SHARED_OBJECT_GLOB: &str = "**/*.so*";

pub struct Pruner<'a> {
    auxiliary_binaries: &'a [String],
    progress: Option<&'a ProgressReporter>,
}

impl<'a> Pruner<'a> {
    pub fn new(auxiliary_binaries: &'a [String]) -> Self {
        Self {
            auxiliary_binaries,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Remove every shared object under `binding_dir` that no retained entry
    /// names, then every auxiliary binary.
    ///
    /// Files that cannot be removed are logged and listed in the report's
    /// `failed` list; they do not stop the pass.
    pub fn prune(&self, binding_dir: &Path, retained: &RetainedSet) -> Result<PruneReport> {
        let mut report = PruneReport::new(binding_dir);
        report.size_before = directory_size(binding_dir)?;

        let shared_objects = shared_objects(binding_dir)?;
        if let Some(progress) = self.progress {
            progress.start(shared_objects.len(), "Clearing unused shared objects");
        }

        for path in shared_objects {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            if let Some(progress) = self.progress {
                progress.inc(&name);
            }

            if retained.keeps(&name) {
                debug!(path = %path.display(), "kept");
                report.kept.push(path);
            } else if remove(&path) {
                report.removed.push(path);
            } else {
                report.failed.push(path);
            }
        }

        for path in self.auxiliary_binaries(binding_dir)? {
            if remove(&path) {
                report.removed_auxiliary.push(path);
            } else {
                report.failed.push(path);
            }
        }

        report.size_after = directory_size(binding_dir)?;

        if let Some(progress) = self.progress {
            progress.finish(&format!("{} files removed", report.removed_count()));
        }

        info!(
            removed = report.removed_count(),
            kept = report.kept.len(),
            failed = report.failed.len(),
            saved = report.saved_bytes(),
            "binding package pruned"
        );

        Ok(report)
    }

    /// Regular files under `binding_dir` named exactly like an auxiliary binary
    pub fn auxiliary_binaries(&self, binding_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();

        for entry in WalkDir::new(binding_dir) {
            let entry = entry.with_file_context(binding_dir)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if self.auxiliary_binaries.iter().any(|aux| aux.as_str() == name.as_ref()) {
                found.push(entry.into_path());
            }
        }

        Ok(found)
    }
}

/// Every shared object file or link below `binding_dir`, sorted
pub fn shared_objects(binding_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&binding_dir.to_string_lossy()),
        SHARED_OBJECT_GLOB
    );

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if is_prunable(&path) => paths.push(path),
            Ok(_) => {}
            Err(err) => {
                let path = err.path().to_path_buf();
                handle_error(TrimError::directory_traversal_error(path, err.error().to_string()));
            }
        }
    }

    paths.sort();
    Ok(paths)
}

/// Regular files and symlinks, dangling ones included
fn is_prunable(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.is_file() || meta.file_type().is_symlink())
        .unwrap_or(false)
}

fn remove(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            true
        }
        Err(source) => {
            handle_error(TrimError::Removal {
                path: path.to_path_buf(),
                source,
            });
            false
        }
    }
}
