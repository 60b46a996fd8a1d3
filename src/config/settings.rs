//! Validation of the merged settings

use std::path::Path;

use crate::error::{Result, TrimError};
use crate::models::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        let package = settings.binding_package.trim();
        if package.is_empty() || package.contains('/') {
            return Err(TrimError::config_error(format!(
                "binding_package must be a plain directory name, got '{}'",
                settings.binding_package
            )));
        }

        if settings.probe_module.trim().is_empty() {
            return Err(TrimError::config_error("probe_module must not be empty"));
        }

        if settings.fatal_markers.is_empty() || settings.fatal_markers.iter().any(|m| m.is_empty()) {
            return Err(TrimError::config_error(
                "fatal_markers must list at least one non-empty marker",
            ));
        }

        if let Some(name) = settings
            .auxiliary_binaries
            .iter()
            .find(|name| name.is_empty() || name.contains('/'))
        {
            return Err(TrimError::config_error(format!(
                "auxiliary_binaries entries are file names, got '{}'",
                name
            )));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// The output file's directory has to exist already
    fn validate_output_path(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(TrimError::InvalidPath {
                    path: parent.to_path_buf(),
                })
            }
            _ => Ok(()),
        }
    }
}
