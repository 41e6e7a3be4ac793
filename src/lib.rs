//! Signup wizard binary support: bootstrap and the command-line driver.

pub mod bootstrap;
pub mod cli;

use std::sync::Arc;

use anyhow::Context;
use sw_core::config::WizardConfig;
use sw_infra::ChannelWizardEventPort;
use tracing::info;

use crate::bootstrap::{build_orchestrator, default_config_path, load_config, Overrides, ResolvedSettings};
use crate::cli::Cli;

/// Explicit `--config` must load; the default location is optional.
fn read_config(cli: &Cli) -> anyhow::Result<WizardConfig> {
    if let Some(path) = &cli.config {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => WizardConfig::from_toml(&toml::Value::Table(Default::default())),
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = read_config(&cli)?;
    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        role: cli.role.map(Into::into),
    };
    let settings = ResolvedSettings::resolve(&config, &overrides);

    bootstrap::tracing::init_tracing_subscriber(settings.log_dir.as_deref(), &settings.log_filter)
        .context("Failed to initialize tracing")?;
    info!(version = env!("CARGO_PKG_VERSION"), "signup wizard starting");

    let (event_port, updates) = ChannelWizardEventPort::new();
    let orchestrator = Arc::new(build_orchestrator(&settings, Arc::new(event_port))?);

    cli::run_interactive(orchestrator, updates).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_config_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[gateway]\nbase_url = \"https://api.example.com\"\n")
            .unwrap();
        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            base_url: None,
            role: None,
        };

        let config = read_config(&cli).unwrap();

        assert_eq!(config.gateway_base_url, "https://api.example.com");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("nope.toml")),
            base_url: None,
            role: None,
        };

        assert!(read_config(&cli).is_err());
    }
}
