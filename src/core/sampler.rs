//! Runtime dependency sampling
//!
//! The application module is executed once under `python -B -v` with the
//! configured trace environment; the shared objects it loads are the seed of
//! everything that is kept.

use tracing::{info, warn};

use crate::core::runner::{CommandRunner, CommandSpec, RunOutcome};
use crate::core::target::AppLayout;
use crate::error::{Result, TrimError};
use crate::models::{DependencySet, Settings};
use crate::parsers::{LoaderTraceParser, TraceSample};

/// Runs the target module and collects the shared objects it loads
pub struct DependencySampler<'a, R: CommandRunner> {
    runner: &'a R,
    settings: &'a Settings,
    layout: &'a AppLayout,
}

impl<'a, R: CommandRunner> DependencySampler<'a, R> {
    pub fn new(runner: &'a R, settings: &'a Settings, layout: &'a AppLayout) -> Self {
        Self {
            runner,
            settings,
            layout,
        }
    }

    /// Command tracing the import of `module`
    pub fn trace_command(&self, module: &str) -> CommandSpec {
        CommandSpec::new(self.layout.python.to_string_lossy())
            .args(["-B", "-v", "-m"])
            .arg(module)
            .envs(&self.settings.trace_env)
            .cwd(&self.layout.working_dir)
    }

    /// Shared objects loaded by `module`
    ///
    /// A run is fatal when it exits with anything but 0, or when a fatal
    /// marker shows up in the trace outside of dump mode. The module is then
    /// run a second time and its trace is returned inside the error.
    pub fn sample(&self, module: &str) -> Result<DependencySet> {
        let spec = self.trace_command(module);
        info!(module, "sampling runtime dependencies");

        let outcome = self.run_trace(module, &spec)?;
        let sample = LoaderTraceParser::parse(&outcome.combined(), &self.settings.fatal_markers);

        if is_fatal(&sample, &outcome, self.settings.dump) {
            warn!(
                module,
                code = ?outcome.code,
                markers = ?sample.markers,
                "target did not run cleanly, collecting diagnostics"
            );
            let rerun = self.run_trace(module, &spec)?;
            let diagnostic = LoaderTraceParser::diagnostic(&rerun.combined());
            return Err(TrimError::target_aborted(module, rerun.code, diagnostic));
        }

        Ok(sample.libs)
    }

    fn run_trace(&self, module: &str, spec: &CommandSpec) -> Result<RunOutcome> {
        self.runner.run(spec).map_err(|err| match err {
            TrimError::CommandSpawn { program, source } => TrimError::TargetNotStarted {
                module: module.to_string(),
                program,
                source,
            },
            other => other,
        })
    }
}

/// Failure policy for one sampling run
pub fn is_fatal(sample: &TraceSample, outcome: &RunOutcome, dump: bool) -> bool {
    (sample.has_fatal_marker() && !dump) || !outcome.success()
}
