//! Locating the interpreter, the bundle, and the binding package inside it
//!
//! The bundle layout is the one produced by Briefcase-style packagers:
//!
//! ```text
//! <bundle>/bin/python
//! <bundle>/app/                     (optional, the application sources)
//! <bundle>/app_packages/PySide2/    (the binding package to trim)
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::runner::{CommandRunner, CommandSpec};
use crate::error::{OptionExt, Result, TrimError};
use crate::models::Settings;
use crate::parsers::LoaderTraceParser;

/// Directory holding third-party packages next to the interpreter
pub const PACKAGES_DIR: &str = "app_packages";

/// Directory holding the application itself
pub const APP_DIR: &str = "app";

/// Interpreter asked for its own location when none is configured
const DEFAULT_INTERPRETER: &str = "python3";

/// Resolved locations of everything the pipeline works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    pub python: PathBuf,
    pub bundle_root: PathBuf,
    pub packages_dir: PathBuf,
    pub binding_dir: PathBuf,
    pub working_dir: PathBuf,
}

/// Finds the application bundle and the binding package
pub struct TargetResolver<'a, R: CommandRunner> {
    runner: &'a R,
    settings: &'a Settings,
}

impl<'a, R: CommandRunner> TargetResolver<'a, R> {
    pub fn new(runner: &'a R, settings: &'a Settings) -> Self {
        Self { runner, settings }
    }

    /// Resolve the full layout, failing when the binding package cannot be found
    pub fn resolve(&self) -> Result<AppLayout> {
        let python = self.locate_interpreter()?;
        let bundle_root = bundle_root(&python)?;
        let packages_dir = bundle_root.join(PACKAGES_DIR);
        let working_dir = locate_working_dir(&bundle_root)?;
        let binding_dir = self.locate_binding(&python, &packages_dir, &working_dir)?;

        info!(
            python = %python.display(),
            binding_dir = %binding_dir.display(),
            "resolved application layout"
        );

        Ok(AppLayout {
            python,
            bundle_root,
            packages_dir,
            binding_dir,
            working_dir,
        })
    }

    /// The configured interpreter, or whatever `python3` reports as `sys.executable`
    pub fn locate_interpreter(&self) -> Result<PathBuf> {
        if let Some(python) = &self.settings.python {
            return absolute(python);
        }

        let spec = CommandSpec::new(DEFAULT_INTERPRETER)
            .arg("-c")
            .arg("import sys; print(sys.executable)");

        let outcome = self.runner.run(&spec).map_err(|err| TrimError::InterpreterNotFound {
            message: err.to_string(),
        })?;

        let executable = outcome.stdout.trim();
        if !outcome.success() || executable.is_empty() {
            return Err(TrimError::InterpreterNotFound {
                message: format!("'{}' did not report sys.executable", DEFAULT_INTERPRETER),
            });
        }

        Ok(PathBuf::from(executable))
    }

    /// `<packages_dir>/<binding>` if present, else ask the interpreter where it imports it from
    pub fn locate_binding(&self, python: &Path, packages_dir: &Path, working_dir: &Path) -> Result<PathBuf> {
        let package = &self.settings.binding_package;
        let expected = packages_dir.join(package);
        if expected.is_dir() {
            return Ok(expected);
        }

        debug!(expected = %expected.display(), "binding package not bundled, probing the interpreter");

        let spec = CommandSpec::new(python.to_string_lossy())
            .args(["-B", "-v", "-c"])
            .arg(format!("import {}.{}", package, self.settings.probe_module))
            .cwd(working_dir);

        let output = match self.runner.run(&spec) {
            Ok(outcome) => outcome.combined(),
            Err(err) => {
                warn!("{}", err.user_message());
                String::new()
            }
        };

        LoaderTraceParser::find_module_dir(&output, &self.settings.probe_module)?
            .ok_or_else(|| TrimError::binding_not_found(package.as_str(), expected))
    }
}

/// Grandparent of `<bundle>/bin/python`
pub fn bundle_root(python: &Path) -> Result<PathBuf> {
    python
        .ancestors()
        .nth(2)
        .filter(|root| !root.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_error(|| TrimError::InterpreterNotFound {
            message: format!("cannot derive a bundle root from '{}'", python.display()),
        })
}

/// `<bundle>/app` when it exists, the current directory otherwise
pub fn locate_working_dir(bundle_root: &Path) -> Result<PathBuf> {
    let app_dir = bundle_root.join(APP_DIR);
    if app_dir.is_dir() {
        Ok(app_dir)
    } else {
        Ok(std::env::current_dir()?)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
