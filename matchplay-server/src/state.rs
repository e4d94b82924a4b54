//! Application state shared across all request handlers.

use matchplay_core::config::{MatchPolicy, PolicyStore};
use matchplay_core::controller::MatchController;
use matchplay_core::framework::DatabaseProcessor;
use sqlx::PgPool;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Matchmaking policy (can be reloaded via SIGHUP).
    pub policy: PolicyStore,
    controller: MatchController,
}

impl AppState {
    pub fn new(db: PgPool, policy: MatchPolicy) -> Self {
        let policy = PolicyStore::new(policy);
        let controller = MatchController::new(db.clone(), policy.clone());
        Self {
            db,
            policy,
            controller,
        }
    }

    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    /// Plain query processor for reads that bypass the controller.
    pub fn database(&self) -> DatabaseProcessor {
        DatabaseProcessor {
            pool: self.db.clone(),
        }
    }
}
