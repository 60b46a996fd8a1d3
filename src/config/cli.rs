//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::Args;
use crate::error::Result;
use crate::models::{OutputFormat, PartialSettings};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
}

/// The configuration-relevant part of the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub python: Option<PathBuf>,
    pub binding_package: Option<String>,
    pub dump: bool,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
        }
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        CliArgs {
            python: args.python.clone(),
            binding_package: args.binding_package.clone(),
            dump: args.dump,
            output_format: args.output.map(Into::into),
            output_file: args.output_file.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        }
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings {
            python: self.args.python.clone(),
            binding_package: self.args.binding_package.clone(),
            output_format: self.args.output_format,
            output_file: self.args.output_file.clone(),
            ..Default::default()
        };

        // Flags only override when given
        if self.args.dump {
            settings.dump = Some(true);
        }

        if self.args.quiet {
            settings.quiet = Some(true);
        }

        if self.args.verbose {
            settings.verbose = Some(true);
        }

        if self.args.no_colors {
            settings.use_colors = Some(false);
        }

        if self.args.no_progress {
            settings.show_progress = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }
}
