//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrimError};
use crate::models::PartialSettings;

/// Name of the per-project and per-user configuration file
pub const CONFIG_FILE_NAME: &str = ".trim-ps2.toml";

/// Directory under the platform config dir holding `config.toml`
const CONFIG_DIR_NAME: &str = "trim-ps2";

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TrimError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| TrimError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|source| TrimError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Reject values that can never be right, naming the file they came from
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    let invalid = |what: &str| {
        Err(TrimError::config_error(format!(
            "Invalid {} in config file: {}",
            what,
            path.display()
        )))
    };

    if let Some(python) = &settings.python {
        if python.as_os_str().is_empty() {
            return invalid("empty python");
        }
    }

    if let Some(package) = &settings.binding_package {
        if package.trim().is_empty() {
            return invalid("empty binding_package");
        }
    }

    if let Some(module) = &settings.probe_module {
        if module.trim().is_empty() {
            return invalid("empty probe_module");
        }
    }

    if let Some(names) = &settings.auxiliary_binaries {
        if names.iter().any(|name| name.is_empty()) {
            return invalid("empty auxiliary_binaries entry");
        }
    }

    if let Some(markers) = &settings.fatal_markers {
        if markers.iter().any(|marker| marker.is_empty()) {
            return invalid("empty fatal_markers entry");
        }
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return invalid("empty output_file");
        }
    }

    Ok(())
}

/// Locations searched for a configuration file, in order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(CONFIG_FILE_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_DIR_NAME).join("config.toml"));
    }

    paths
}

/// Find and load configuration from the first default location that has one
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    match default_config_paths().into_iter().find(|path| path.is_file()) {
        Some(path) => Ok(Some(parse_config_file(path)?)),
        None => Ok(None),
    }
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(TrimError::io_error)?;
        }
    }

    let default_config = include_str!("default_config.toml");
    fs::write(path, default_config).map_err(TrimError::io_error)?;

    Ok(())
}
