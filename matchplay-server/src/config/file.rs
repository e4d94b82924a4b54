//! TOML file configuration structures.
//!
//! These structs directly map to the `matchplay-config.toml` file format.

use matchplay_core::config::DEFAULT_K_FACTOR;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub matchmaking: MatchmakingConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Matchmaking section. Durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingConfig {
    pub k_factor: f64,
    pub allow_draws: bool,
    pub start_buffer_secs: u64,
    pub ready_timeout_secs: u64,
    pub match_timeout_secs: u64,
    pub mismatch_grace_secs: u64,
    pub notify_lead_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            allow_draws: false,
            start_buffer_secs: 180,
            ready_timeout_secs: 300,
            match_timeout_secs: 1800,
            mismatch_grace_secs: 1800,
            notify_lead_secs: 360,
            sweep_interval_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[matchmaking]
k_factor = 24.0
allow_draws = true
start_buffer_secs = 120
ready_timeout_secs = 240
match_timeout_secs = 900
mismatch_grace_secs = 600
notify_lead_secs = 300
sweep_interval_secs = 5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.matchmaking.k_factor, 24.0);
        assert!(config.matchmaking.allow_draws);
        assert_eq!(config.matchmaking.match_timeout_secs, 900);
        assert_eq!(config.matchmaking.sweep_interval_secs, 5);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: FileConfig = toml::from_str("[matchmaking]\nk_factor = 16.0\n").unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.matchmaking.k_factor, 16.0);
        assert_eq!(config.matchmaking.start_buffer_secs, 180);
        assert!(!config.matchmaking.allow_draws);
    }

    #[test]
    fn test_unknown_field_type_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[matchmaking]\nk_factor = \"high\"\n");
        assert!(result.is_err());
    }
}
