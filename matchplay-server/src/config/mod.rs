//! Configuration module for matchplay-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::{FileConfig, MatchmakingConfig};
use matchplay_core::config::MatchPolicy;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub policy: MatchPolicy,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// A missing file is not an error: every section has defaults.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str::<FileConfig>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "Config file {:?} not found, using defaults",
                    self.config_path
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        Ok(LoadedConfig {
            listen: file_config.server.listen,
            policy: to_policy(&file_config.matchmaking)?,
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

/// Validate the `[matchmaking]` section and convert it into a policy.
pub fn to_policy(config: &MatchmakingConfig) -> Result<MatchPolicy, ConfigError> {
    if !config.k_factor.is_finite() || config.k_factor <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "k_factor must be positive, got {}",
            config.k_factor
        )));
    }

    let intervals = [
        ("start_buffer_secs", config.start_buffer_secs),
        ("ready_timeout_secs", config.ready_timeout_secs),
        ("match_timeout_secs", config.match_timeout_secs),
        ("mismatch_grace_secs", config.mismatch_grace_secs),
        ("notify_lead_secs", config.notify_lead_secs),
        ("sweep_interval_secs", config.sweep_interval_secs),
    ];
    for (name, value) in intervals {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be greater than zero"
            )));
        }
        if i64::try_from(value).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "{name} is too large"
            )));
        }
    }

    let secs = |value: u64| time::Duration::seconds(value as i64);
    Ok(MatchPolicy {
        k_factor: config.k_factor,
        allow_draws: config.allow_draws,
        start_buffer: secs(config.start_buffer_secs),
        ready_timeout: secs(config.ready_timeout_secs),
        match_timeout: secs(config.match_timeout_secs),
        mismatch_grace: secs(config.mismatch_grace_secs),
        notify_lead: secs(config.notify_lead_secs),
        sweep_interval: std::time::Duration::from_secs(config.sweep_interval_secs),
    })
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core_policy() {
        let policy = to_policy(&MatchmakingConfig::default()).unwrap();
        assert_eq!(policy, MatchPolicy::default());
    }

    #[test]
    fn test_rejects_non_positive_k_factor() {
        let config = MatchmakingConfig {
            k_factor: 0.0,
            ..MatchmakingConfig::default()
        };
        assert!(matches!(
            to_policy(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = MatchmakingConfig {
            sweep_interval_secs: 0,
            ..MatchmakingConfig::default()
        };
        let err = to_policy(&config).unwrap_err();
        assert!(err.to_string().contains("sweep_interval_secs"));
    }

    #[test]
    fn test_missing_file_uses_defaults_and_listen_override() {
        let listen: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        let loader = ConfigLoader::new("/nonexistent/matchplay-config.toml", Some(listen));
        let loaded = loader.load().unwrap();
        assert_eq!(loaded.listen, listen);
        assert_eq!(loaded.policy, MatchPolicy::default());
    }
}
