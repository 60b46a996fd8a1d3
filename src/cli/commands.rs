//! Command implementations

use clap::CommandFactory;
use std::io::{self, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::Args;
use crate::config::{load_config, CliArgs, FileConfig};
use crate::core::{SystemRunner, Trimmer};
use crate::error::{Result, TrimError};
use crate::models::Settings;

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Trim (or, with --dump, inspect) the bundle for one application module
    Trim(Args),
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }

        Command::Trim(args)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Trim(args) => {
                let module = args
                    .module
                    .as_deref()
                    .ok_or_else(|| TrimError::usage("the <MODULE> argument is required"))?;

                let settings = load_config(CliArgs::from(args))?;
                init_logging(&settings);
                debug!(?settings, "effective settings");

                let runner = SystemRunner;
                let mut stdout = io::stdout().lock();
                Trimmer::new(&runner, &settings).run(module, &mut stdout)?;
                stdout.flush().map_err(|source| TrimError::StdoutWrite { source })?;

                Ok(())
            }
            Command::Init => {
                let config = FileConfig::new();

                if config.path().exists() {
                    println!("Configuration file already exists at: {}", config.path().display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    return Ok(());
                }

                config.create_default()?;

                println!("Created default configuration file at: {}", config.path().display());
                println!("\nEvery key is optional; the most useful ones are:");
                println!("  - python: interpreter of the application bundle");
                println!("  - binding_package: package directory to trim (PySide2)");
                println!("  - auxiliary_binaries: tool binaries always removed");
                println!("  - trace_env: environment of the traced application");

                Ok(())
            }
        }
    }

    /// Run the command and map the outcome to a process exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(()) => 0,
            Err(err) => {
                report_error(&err);
                err.exit_code()
            }
        }
    }
}

fn report_error(err: &TrimError) {
    match err {
        TrimError::TargetAborted { diagnostic, .. } => {
            println!("{}", diagnostic);
            println!("\nERROR: {}", err.user_message());
        }
        TrimError::Usage { .. } => {
            eprintln!("ERROR: {}\n", err.user_message());
            eprintln!("{}", Args::command().render_usage());
        }
        _ => eprintln!("ERROR: {}", err.user_message()),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over the verbosity flags
fn init_logging(settings: &Settings) {
    let default_level = if settings.quiet {
        "error"
    } else if settings.verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when running inside a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(settings.use_colors)
        .try_init();
}
