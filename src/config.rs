//! Configuration module for candy-mint
//!
//! Settings come from an optional TOML file, then `CANDY_MINT_*` environment
//! variables (a `.env` file is honored). Every field has a default so an
//! empty configuration is valid.

use crate::rpc_manager::{RetryPolicy, SendOptions};
use crate::tx_builder::MintError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;

/// Prefix of environment overrides, e.g. `CANDY_MINT_RPC__URL`
pub const ENV_PREFIX: &str = "CANDY_MINT";

/// Main application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rpc: RpcSettings,
    pub send: SendSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcSettings {
    /// Overrides the cluster's public endpoint
    pub url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// `processed`, `confirmed` or `finalized`
    pub commitment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendSettings {
    /// Give up awaiting confirmation after this long
    pub timeout_ms: u64,

    pub resend_interval_ms: u64,

    pub status_poll_interval_ms: u64,

    /// Attempts for the first send, including the first one
    pub max_send_attempts: u32,

    pub retry_base_delay_ms: u64,

    pub retry_max_delay_ms: u64,
}

fn default_rpc_timeout() -> u64 { 30 }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_send_timeout() -> u64 { 15_000 }
fn default_resend_interval() -> u64 { 500 }
fn default_status_poll_interval() -> u64 { 2_000 }
fn default_max_send_attempts() -> u32 { 3 }
fn default_retry_base_delay() -> u64 { 100 }
fn default_retry_max_delay() -> u64 { 5_000 }

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_rpc_timeout(),
            commitment: default_commitment(),
        }
    }
}

impl Default for SendSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_send_timeout(),
            resend_interval_ms: default_resend_interval(),
            status_poll_interval_ms: default_status_poll_interval(),
            max_send_attempts: default_max_send_attempts(),
            retry_base_delay_ms: default_retry_base_delay(),
            retry_max_delay_ms: default_retry_max_delay(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file with environment overrides
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&str>) -> Result<Self, MintError> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| MintError::Configuration(format!("failed to load settings: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the sender cannot work with
    pub fn validate(&self) -> Result<(), MintError> {
        self.commitment()?;

        if self.rpc.timeout_secs == 0 {
            return Err(MintError::Configuration("rpc.timeout_secs must be > 0".to_string()));
        }
        if self.send.timeout_ms == 0 {
            return Err(MintError::Configuration("send.timeout_ms must be > 0".to_string()));
        }
        if self.send.resend_interval_ms == 0 || self.send.status_poll_interval_ms == 0 {
            return Err(MintError::Configuration(
                "send intervals must be > 0".to_string(),
            ));
        }
        if self.send.max_send_attempts == 0 {
            return Err(MintError::Configuration(
                "send.max_send_attempts must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn commitment(&self) -> Result<CommitmentConfig, MintError> {
        match self.rpc.commitment.to_ascii_lowercase().as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(MintError::Configuration(format!(
                "unknown commitment level '{}'",
                other
            ))),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_secs)
    }

    /// Sender tuning derived from these settings
    pub fn send_options(&self) -> Result<SendOptions, MintError> {
        Ok(SendOptions {
            timeout: Duration::from_millis(self.send.timeout_ms),
            resend_interval: Duration::from_millis(self.send.resend_interval_ms),
            status_poll_interval: Duration::from_millis(self.send.status_poll_interval_ms),
            commitment: self.commitment()?,
            retry_policy: RetryPolicy {
                max_attempts: self.send.max_send_attempts,
                base_delay_ms: self.send.retry_base_delay_ms,
                max_delay_ms: self.send.retry_max_delay_ms,
                ..RetryPolicy::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_sender_defaults() {
        let settings = Settings::default();
        let opts = settings.send_options().unwrap();
        let defaults = SendOptions::default();

        assert_eq!(opts.timeout, defaults.timeout);
        assert_eq!(opts.resend_interval, defaults.resend_interval);
        assert_eq!(opts.status_poll_interval, defaults.status_poll_interval);
        assert_eq!(opts.commitment, defaults.commitment);
        assert_eq!(opts.retry_policy.max_attempts, defaults.retry_policy.max_attempts);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[rpc]
url = "http://127.0.0.1:8899"
commitment = "finalized"

[send]
timeout_ms = 30000
"#
        )
        .unwrap();

        let settings = Settings::load(file.path().to_str()).unwrap();
        assert_eq!(settings.rpc.url.as_deref(), Some("http://127.0.0.1:8899"));
        assert_eq!(settings.commitment().unwrap(), CommitmentConfig::finalized());
        assert_eq!(settings.send.timeout_ms, 30_000);
        // Untouched fields keep their defaults
        assert_eq!(settings.send.resend_interval_ms, 500);
        assert_eq!(settings.rpc.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load(Some("/nonexistent/candy-mint.toml")).unwrap();
        assert_eq!(settings.send, SendSettings::default());
    }

    #[test]
    fn test_unknown_commitment_rejected() {
        let mut settings = Settings::default();
        settings.rpc.commitment = "max".to_string();
        assert!(matches!(settings.validate(), Err(MintError::Configuration(_))));
        assert!(settings.send_options().is_err());
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let mut settings = Settings::default();
        settings.send.resend_interval_ms = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.send.max_send_attempts = 0;
        assert!(settings.validate().is_err());
    }
}
