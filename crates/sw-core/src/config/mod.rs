//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! - No validation logic
//! - No default value calculation
//!
//! > **This module contains data only.** Missing values are recorded as
//! > empty/zero facts; the bootstrap layer decides what they mean.

use std::path::PathBuf;

/// Wizard configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Registration backend base URL (may be empty)
    pub gateway_base_url: String,

    /// Per-request timeout in seconds (0 when missing)
    pub gateway_timeout_secs: u64,

    /// OTP resend countdown in seconds (0 when missing)
    pub otp_countdown_secs: u64,

    /// Log directory (empty when missing)
    pub log_dir: PathBuf,

    /// Extra tracing filter directives (empty when missing)
    pub log_filter: String,
}

impl WizardConfig {
    /// Create WizardConfig from TOML value
    ///
    /// Must NOT contain validation or default value logic.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let int_at = |section: &str, key: &str| -> u64 {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as u64)
                .unwrap_or(0)
        };

        Ok(Self {
            gateway_base_url: str_at("gateway", "base_url"),
            gateway_timeout_secs: int_at("gateway", "timeout_secs"),
            otp_countdown_secs: int_at("otp", "countdown_secs"),
            log_dir: PathBuf::from(str_at("logging", "dir")),
            log_filter: str_at("logging", "filter"),
        })
    }
}
