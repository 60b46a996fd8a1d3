//! Attributing native dependencies to OS packages
//!
//! Each library is looked up in the dpkg database. Unresolved entries that are
//! Python extension modules are set aside; for the rest apt-file is asked, in
//! one batch, which packages would provide them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::core::runner::{CommandRunner, CommandSpec};
use crate::error::TrimError;
use crate::models::deps::{is_path, DependencySet, Resolution};
use crate::models::Attribution;
use crate::output::ProgressReporter;
use crate::parsers::{AptFileParser, DpkgParser};

/// Path fragment shared by every interpreter's standard library
const PYTHON_LIB_MARKER: &str = "lib/python";

/// Maps libraries to the OS packages that own or could provide them
pub struct AttributionResolver<'a, R: CommandRunner> {
    runner: &'a R,
    packages_dir: &'a Path,
    progress: Option<&'a ProgressReporter>,
}

impl<'a, R: CommandRunner> AttributionResolver<'a, R> {
    pub fn new(runner: &'a R, packages_dir: &'a Path) -> Self {
        Self {
            runner,
            packages_dir,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run every attribution step over `libs`
    pub fn attribute(&self, libs: &DependencySet) -> Attribution {
        let resolution = self.dpkg_resolve(libs);

        let python_modules = self.filter_python_modules(&resolution.unresolved);
        let mut unresolved = resolution.unresolved.clone();
        unresolved.subtract(&python_modules);

        let suggestions = self.suggest(&unresolved);

        info!(
            resolved = resolution.resolved.len(),
            python_modules = python_modules.len(),
            unresolved = unresolved.len(),
            "package attribution finished"
        );

        Attribution {
            resolution,
            python_modules,
            unresolved,
            suggestions,
        }
    }

    /// Partition `libs` by whether dpkg knows an owning package
    pub fn dpkg_resolve(&self, libs: &DependencySet) -> Resolution {
        let mut resolution = Resolution::new();
        let mut dpkg_available = true;

        if let Some(progress) = self.progress {
            progress.start(libs.len(), "Querying dpkg");
        }

        for lib in libs {
            if let Some(progress) = self.progress {
                progress.inc(lib);
            }

            if !dpkg_available {
                resolution.leave_unresolved(lib.as_str());
                continue;
            }

            match self.runner.run(&CommandSpec::new("dpkg").arg("-S").arg(lib.as_str())) {
                Ok(outcome) => match DpkgParser::parse(&outcome.stdout) {
                    Some(packages) => {
                        debug!(lib = %lib, packages = ?packages, "dpkg owner");
                        resolution.resolve(lib.as_str(), packages);
                    }
                    None => resolution.leave_unresolved(lib.as_str()),
                },
                Err(err @ TrimError::CommandSpawn { .. }) => {
                    warn!("{}; remaining libraries stay unresolved", err.user_message());
                    dpkg_available = false;
                    resolution.leave_unresolved(lib.as_str());
                }
                Err(err) => {
                    warn!("{}", err.user_message());
                    resolution.leave_unresolved(lib.as_str());
                }
            }
        }

        if let Some(progress) = self.progress {
            progress.finish(&format!("{} libraries attributed", resolution.resolved.len()));
        }

        resolution
    }

    /// Unresolved entries that are extension modules of other Python packages
    ///
    /// A path counts when it lives under an interpreter's `lib/python*` tree or
    /// the bundle's packages directory. A bare name counts when one of those
    /// paths contains it.
    pub fn filter_python_modules(&self, unresolved: &DependencySet) -> DependencySet {
        let packages_dir = self.packages_dir.to_string_lossy();

        let module_paths: DependencySet = unresolved
            .iter()
            .filter(|entry| is_path(entry))
            .filter(|path| path.contains(PYTHON_LIB_MARKER) || path.contains(&*packages_dir))
            .map(String::as_str)
            .collect();

        let mut modules = module_paths.clone();
        for name in unresolved.iter().filter(|entry| !is_path(entry)) {
            if module_paths.iter().any(|path| path.contains(name.as_str())) {
                modules.insert(name.as_str());
            }
        }

        modules
    }

    /// Candidate packages for each unresolved library, from one apt-file query
    pub fn suggest(&self, unresolved: &DependencySet) -> BTreeMap<String, BTreeSet<String>> {
        if unresolved.is_empty() {
            return BTreeMap::new();
        }

        let spec = CommandSpec::new("apt-file")
            .args(["find", "-f", "-"])
            .stdin(AptFileParser::query_input(unresolved));

        let output = match self.runner.run(&spec) {
            Ok(outcome) => outcome.stdout,
            Err(err) => {
                warn!("{}", err.user_message());
                String::new()
            }
        };

        AptFileParser::parse(&output, unresolved)
    }
}
