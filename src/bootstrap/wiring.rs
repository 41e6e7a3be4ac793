//! Resolves configuration into runtime settings and assembles the orchestrator.
//!
//! This is where defaults live: an empty or zero config value means "use the
//! default", and command-line overrides win over both.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sw_app::{RegistrationOrchestrator, RegistrationSettings};
use sw_core::config::WizardConfig;
use sw_core::otp::OTP_COUNTDOWN_SECS;
use sw_core::ports::WizardEventPort;
use sw_core::registration::Role;
use sw_infra::HttpRegistrationGateway;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub countdown_secs: u32,
    pub initial_role: Role,
    pub log_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl ResolvedSettings {
    pub fn resolve(config: &WizardConfig, overrides: &Overrides) -> Self {
        let base_url = overrides
            .base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| Some(config.gateway_base_url.clone()).filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match config.gateway_timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        let countdown_secs = match config.otp_countdown_secs {
            0 => OTP_COUNTDOWN_SECS,
            secs => u32::try_from(secs).unwrap_or(u32::MAX),
        };
        let log_dir = if config.log_dir.as_os_str().is_empty() {
            None
        } else {
            Some(config.log_dir.clone())
        };

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            countdown_secs,
            initial_role: overrides.role.unwrap_or(Role::Buyer),
            log_dir,
            log_filter: config.log_filter.clone(),
        }
    }
}

/// Wires the HTTP gateway and the given event sink into an orchestrator.
pub fn build_orchestrator(
    settings: &ResolvedSettings,
    event_port: Arc<dyn WizardEventPort>,
) -> anyhow::Result<RegistrationOrchestrator> {
    let gateway = HttpRegistrationGateway::new(settings.base_url.clone(), settings.timeout)?;
    info!(
        base_url = %settings.base_url,
        timeout_secs = settings.timeout.as_secs(),
        role = %settings.initial_role,
        "registration gateway ready"
    );

    Ok(RegistrationOrchestrator::new(
        Arc::new(gateway),
        event_port,
        RegistrationSettings {
            initial_role: settings.initial_role,
            countdown_secs: settings.countdown_secs,
            tick_period: Duration::from_secs(1),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> WizardConfig {
        WizardConfig {
            gateway_base_url: String::new(),
            gateway_timeout_secs: 0,
            otp_countdown_secs: 0,
            log_dir: PathBuf::new(),
            log_filter: String::new(),
        }
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = ResolvedSettings::resolve(&empty_config(), &Overrides::default());

        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.countdown_secs, 60);
        assert_eq!(settings.initial_role, Role::Buyer);
        assert_eq!(settings.log_dir, None);
    }

    #[test]
    fn command_line_wins_over_config() {
        let config = WizardConfig {
            gateway_base_url: "https://config.example.com".into(),
            otp_countdown_secs: 30,
            ..empty_config()
        };
        let overrides = Overrides {
            base_url: Some("https://cli.example.com".into()),
            role: Some(Role::Seller),
        };

        let settings = ResolvedSettings::resolve(&config, &overrides);

        assert_eq!(settings.base_url, "https://cli.example.com");
        assert_eq!(settings.countdown_secs, 30);
        assert_eq!(settings.initial_role, Role::Seller);
    }

    #[tokio::test]
    async fn build_orchestrator_starts_on_personal_info() {
        let settings = ResolvedSettings::resolve(
            &empty_config(),
            &Overrides {
                role: Some(Role::Seller),
                ..Overrides::default()
            },
        );

        let orchestrator =
            build_orchestrator(&settings, Arc::new(sw_infra::TracingWizardEventPort)).unwrap();
        let snapshot = orchestrator.snapshot().await;

        assert_eq!(snapshot.step, sw_core::wizard::Step::PersonalInfo);
        assert_eq!(snapshot.draft.role(), Role::Seller);
    }
}
