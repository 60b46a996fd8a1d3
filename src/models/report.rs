//! Results produced by the pipeline stages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use super::deps::{file_name, is_path, DependencySet, Resolution};

/// Package attribution of the non-binding dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Raw dpkg partition of the queried entries
    pub resolution: Resolution,
    /// Unresolved entries recognised as other Python extension modules
    pub python_modules: DependencySet,
    /// What is left once Python modules are set aside
    pub unresolved: DependencySet,
    /// Unresolved entry -> candidate packages suggested by apt-file
    pub suggestions: BTreeMap<String, BTreeSet<String>>,
}

/// Category of a dependency in the dump report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyCategory {
    BindingModule,
    Resolved,
    PythonModule,
    Unresolved,
}

impl fmt::Display for DependencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyCategory::BindingModule => write!(f, "binding_module"),
            DependencyCategory::Resolved => write!(f, "resolved"),
            DependencyCategory::PythonModule => write!(f, "python_module"),
            DependencyCategory::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// One dependency with its classification, as listed in CSV output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRow {
    pub name: String,
    pub path: String,
    pub category: DependencyCategory,
    pub packages: String,
}

/// Full breakdown printed by `--dump`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpReport {
    pub generated_at: DateTime<Utc>,
    pub module: String,
    pub binding_package: String,
    /// Shared objects observed while the application ran
    pub app_deps: DependencySet,
    /// Closure entries that belong to the binding package
    pub binding_modules: DependencySet,
    /// Every other closure entry
    pub other_deps: DependencySet,
    pub attribution: Attribution,
}

impl DumpReport {
    /// Command line that installs every resolved OS package
    pub fn install_command(&self) -> Option<String> {
        let packages = self.attribution.resolution.packages();
        if packages.is_empty() {
            return None;
        }
        let packages: Vec<String> = packages.into_iter().collect();
        Some(format!("sudo apt install {}", packages.join(" ")))
    }

    /// Flatten the report into one row per dependency
    pub fn rows(&self) -> Vec<DependencyRow> {
        let mut rows = Vec::new();

        for entry in &self.binding_modules {
            rows.push(row(entry, DependencyCategory::BindingModule, String::new()));
        }

        for (entry, packages) in &self.attribution.resolution.resolved {
            rows.push(row(entry, DependencyCategory::Resolved, join(packages)));
        }

        for entry in &self.attribution.python_modules {
            rows.push(row(entry, DependencyCategory::PythonModule, String::new()));
        }

        for entry in &self.attribution.unresolved {
            let suggested = self
                .attribution
                .suggestions
                .get(entry)
                .map(join)
                .unwrap_or_default();
            rows.push(row(entry, DependencyCategory::Unresolved, suggested));
        }

        rows
    }
}

fn row(entry: &str, category: DependencyCategory, packages: String) -> DependencyRow {
    DependencyRow {
        name: file_name(entry).to_string(),
        path: if is_path(entry) { entry.to_string() } else { String::new() },
        category,
        packages,
    }
}

fn join(packages: &BTreeSet<String>) -> String {
    packages.iter().cloned().collect::<Vec<_>>().join(" ")
}

/// Outcome of pruning the binding package directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruneReport {
    pub binding_dir: PathBuf,
    /// Shared objects that matched no retained entry and were deleted
    pub removed: Vec<PathBuf>,
    /// Auxiliary tool binaries deleted unconditionally
    pub removed_auxiliary: Vec<PathBuf>,
    /// Shared objects kept because a retained entry names them
    pub kept: Vec<PathBuf>,
    /// Files that should have been deleted but could not be
    pub failed: Vec<PathBuf>,
    pub size_before: u64,
    pub size_after: u64,
}

impl PruneReport {
    pub fn new(binding_dir: impl Into<PathBuf>) -> Self {
        Self {
            binding_dir: binding_dir.into(),
            ..Default::default()
        }
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len() + self.removed_auxiliary.len()
    }

    pub fn saved_bytes(&self) -> u64 {
        self.size_before.saturating_sub(self.size_after)
    }
}
