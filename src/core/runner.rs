//! External command execution
//!
//! Every tool the pipeline talks to (the traced interpreter, `ldd`, `dpkg`,
//! `apt-file`) is invoked through [`CommandRunner`], so stages can be driven by
//! [`ScriptedRunner`] in tests instead of real system state.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::error::{Result, TrimError};

/// Description of one external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
    stdin: Option<String>,
}

impl CommandSpec {
    /// Create a new spec for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
            stdin: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set several environment variables for the child process.
    pub fn envs<'a>(mut self, vars: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set the working directory for the child process.
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Feed `input` to the child's stdin.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn input(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    /// Program and arguments joined with spaces, for logs and matching
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl RunOutcome {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            code,
        }
    }

    /// Successful run printing `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::new(stdout, "", Some(0))
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        let mut merged = self.stdout.clone();
        if !merged.ends_with('\n') {
            merged.push('\n');
        }
        merged.push_str(&self.stderr);
        merged
    }
}

/// Runs external commands and captures their output
pub trait CommandRunner {
    /// Run the command to completion.
    ///
    /// A non-zero exit is not an error; only failing to start the program is.
    fn run(&self, spec: &CommandSpec) -> Result<RunOutcome>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> Result<RunOutcome> {
        (**self).run(spec)
    }
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<RunOutcome> {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.arguments());
        cmd.envs(spec.environment());
        if let Some(dir) = spec.working_dir() {
            cmd.current_dir(dir);
        }
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if spec.input().is_some() { Stdio::piped() } else { Stdio::null() });

        let mut child = cmd
            .spawn()
            .map_err(|e| TrimError::command_spawn(spec.program(), e))?;

        if let (Some(input), Some(mut stdin)) = (spec.input(), child.stdin.take()) {
            // A child that exits without reading its input still has to be reaped
            if let Err(err) = stdin.write_all(input.as_bytes()) {
                warn!(command = %spec.command_line(), error = %err, "could not write to stdin");
            }
        }

        let output = child.wait_with_output()?;
        let outcome = RunOutcome {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        };

        debug!(command = %spec.command_line(), code = ?outcome.code, "external command finished");
        Ok(outcome)
    }
}

/// Runner replaying canned outcomes, matched by command-line prefix
///
/// Every invocation is recorded so tests can assert on what was run.
/// Commands with no matching script get an empty successful outcome.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    scripts: Vec<(String, Reply)>,
    calls: RefCell<Vec<CommandSpec>>,
}

#[derive(Debug, Clone)]
enum Reply {
    Outcome(RunOutcome),
    /// The program is not installed
    SpawnFailure,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose command line starts with `prefix`.
    /// Scripts registered first win.
    pub fn on(mut self, prefix: impl Into<String>, outcome: RunOutcome) -> Self {
        self.scripts.push((prefix.into(), Reply::Outcome(outcome)));
        self
    }

    /// Commands whose command line starts with `prefix` cannot be started
    pub fn fail(mut self, prefix: impl Into<String>) -> Self {
        self.scripts.push((prefix.into(), Reply::SpawnFailure));
        self
    }

    /// Every command run so far, in order
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Command lines of the commands run so far
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::command_line).collect()
    }

    /// Number of runs whose program is `program`
    pub fn count(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|spec| spec.program() == program)
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<RunOutcome> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.command_line();

        let reply = self
            .scripts
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Outcome(outcome)) => Ok(outcome),
            Some(Reply::SpawnFailure) => Err(TrimError::command_spawn(
                spec.program(),
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            )),
            None => Ok(RunOutcome::ok("")),
        }
    }
}
