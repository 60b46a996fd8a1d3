//! Native dependency closure through `ldd`

use tracing::{debug, warn};

use crate::core::runner::{CommandRunner, CommandSpec};
use crate::models::deps::{is_path, DependencySet};
use crate::output::ProgressReporter;
use crate::parsers::LddParser;

/// Expands a dependency set with everything the dynamic linker pulls in
pub struct ElfResolver<'a, R: CommandRunner> {
    runner: &'a R,
    progress: Option<&'a ProgressReporter>,
}

impl<'a, R: CommandRunner> ElfResolver<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Inputs plus every library `ldd` reports for the path-like inputs
    ///
    /// Bare names are kept but not queried: without a search path they cannot
    /// be located. `ldd` already reports the transitive closure, so discovered
    /// libraries are not queried again.
    pub fn resolve(&self, libs: &DependencySet) -> DependencySet {
        let mut closure = libs.clone();

        if let Some(progress) = self.progress {
            progress.start(libs.len(), "Resolving ELF dependencies");
        }

        for lib in libs {
            if let Some(progress) = self.progress {
                progress.inc(lib);
            }

            if !is_path(lib) {
                continue;
            }

            match self.runner.run(&CommandSpec::new("ldd").arg(lib.as_str())) {
                Ok(outcome) => {
                    let found = LddParser::parse(&outcome.stdout);
                    debug!(lib = %lib, found = found.len(), "ldd");
                    closure.extend_from(&found);
                }
                Err(err) => warn!("{}", err.user_message()),
            }
        }

        if let Some(progress) = self.progress {
            progress.finish(&format!("{} native dependencies", closure.len()));
        }

        closure
    }
}
