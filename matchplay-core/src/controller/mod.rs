//! Match lifecycle controller.
//!
//! Every operation is a command struct handled through
//! [`kanau::processor::Processor`] on [`MatchController`]. Each command runs in
//! its own transaction and reads the policy that is current when it starts.
//! Projections that combine several rows read them from one snapshot.
//!
//! - [`pairing`]: availability toggles and pairing from the queue
//! - [`lifecycle`]: readiness, timeouts and reminders
//! - [`scoring`]: score submissions and administrative overrides
//! - [`views`]: read-only projections of participants and matches

mod completion;
pub mod lifecycle;
pub mod pairing;
pub mod scoring;
pub mod views;

pub use lifecycle::{CheckTimeout, CheckUpcoming, MarkReady, ReadyOutcome, TimeoutOutcome, Upcoming};
pub use pairing::{DrainQueue, PairingOutcome, ToggleAvailability, ToggleOutcome, TryPair};
pub use scoring::{ResetSubmissions, ResolveMatch, SubmitOutcome, SubmitScore};
pub use views::{GetMatchView, GetStatus, MatchDetails, ParticipantOverview};

use crate::config::{MatchPolicy, PolicyStore};
use crate::framework::DatabaseProcessor;
use sqlx::{PgPool, Postgres, Transaction};

/// Entry point of every state-changing match operation.
#[derive(Debug, Clone)]
pub struct MatchController {
    db: DatabaseProcessor,
    policy: PolicyStore,
}

impl MatchController {
    pub fn new(pool: PgPool, policy: PolicyStore) -> Self {
        Self {
            db: DatabaseProcessor { pool },
            policy,
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy.current()
    }

    pub fn pool(&self) -> &PgPool {
        &self.db.pool
    }

    pub fn database(&self) -> &DatabaseProcessor {
        &self.db
    }

    /// Read-only transaction in which every statement sees the same snapshot.
    pub(crate) async fn snapshot(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}
