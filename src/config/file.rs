//! File and environment configuration sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{Result, TrimError};
use crate::models::PartialSettings;

/// Prefix of the environment variables read by [`EnvConfig`]
pub const ENV_PREFIX: &str = "TRIM_PS2";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
}

impl FileConfig {
    /// Source for `.trim-ps2.toml` in the current directory
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(parser::CONFIG_FILE_NAME),
            name: "default config file".to_string(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(TrimError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
pub struct EnvConfig {
    prefix: String,
    name: String,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key))
            .ok()
            .filter(|value| !value.is_empty())
    }
}

const ENV_KEYS: [&str; 5] = [
    "PYTHON",
    "BINDING_PACKAGE",
    "PROBE_MODULE",
    "AUXILIARY_BINARIES",
    "OUTPUT_FORMAT",
];

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(python) = self.var("PYTHON") {
            settings.python = Some(PathBuf::from(python));
        }

        settings.binding_package = self.var("BINDING_PACKAGE");
        settings.probe_module = self.var("PROBE_MODULE");

        if let Some(names) = self.var("AUXILIARY_BINARIES") {
            settings.auxiliary_binaries = Some(
                names
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            settings.output_format = Some(format.parse().map_err(TrimError::config_error)?);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
