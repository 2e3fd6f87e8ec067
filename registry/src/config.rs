//! Registry configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use biovote_utils::LogFormat;
use biovote_verification::VerifierConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a [`crate::VotingRegistry`].
///
/// Can be loaded from a TOML file via [`RegistryConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Upper bound on one authentication, in milliseconds. Covers waiting for
    /// the voter's lock, a verifier slot, and the verifier call itself.
    #[serde(default = "default_verify_timeout_ms")]
    pub verify_timeout_ms: u64,

    /// Maximum number of verifier calls running at once across all voters.
    #[serde(default = "default_max_concurrent_verifications")]
    pub max_concurrent_verifications: usize,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Which verifier to use.
    #[serde(default)]
    pub verifier: VerifierConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_verify_timeout_ms() -> u64 {
    2_000
}

fn default_max_concurrent_verifications() -> usize {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RegistryConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verify_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "verify_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.max_concurrent_verifications == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_verifications must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            verify_timeout_ms: default_verify_timeout_ms(),
            max_concurrent_verifications: default_max_concurrent_verifications(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            verifier: VerifierConfig::default(),
        }
    }
}
