//! # Configuration Loader
//!
//! Reads the TOML file and maps it onto [`WizardConfig`]. Pure loading only:
//! no validation and no defaults here; [`super::wiring`] decides what empty
//! values mean.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sw_core::config::WizardConfig;

/// `<config dir>/signup-wizard/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("signup-wizard").join("config.toml"))
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<WizardConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    WizardConfig::from_toml(&toml_value)
}
