//! Runtime matchmaking policy.
//!
//! These values are validated by the server when the config file is loaded
//! and can be swapped at runtime through a [`PolicyStore`].

mod policy_store;

pub use policy_store::PolicyStore;

/// Default ELO K-factor.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Rating every new participant starts with. Mirrors the column default.
pub const DEFAULT_RATING: i32 = 1200;

/// Tunables of the match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// ELO K-factor applied on every rated completion.
    pub k_factor: f64,
    /// Whether a tied score is a valid final result.
    pub allow_draws: bool,
    /// Gap between pairing and the scheduled start of a match.
    pub start_buffer: time::Duration,
    /// How long after the scheduled start a pending match waits for both
    /// sides to be ready before it is started anyway.
    pub ready_timeout: time::Duration,
    /// How long an active match may run before the timeout policy resolves it.
    pub match_timeout: time::Duration,
    /// Extra time a mismatched match gets for administrative resolution.
    pub mismatch_grace: time::Duration,
    /// A pending match is announced once its start is at most this far away.
    pub notify_lead: time::Duration,
    /// Period of the timeout sweeper.
    pub sweep_interval: std::time::Duration,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            allow_draws: false,
            start_buffer: time::Duration::minutes(3),
            ready_timeout: time::Duration::minutes(5),
            match_timeout: time::Duration::minutes(30),
            mismatch_grace: time::Duration::minutes(30),
            notify_lead: time::Duration::minutes(6),
            sweep_interval: std::time::Duration::from_secs(15),
        }
    }
}
