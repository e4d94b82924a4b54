use super::MatchController;
use super::views::ParticipantOverview;
use crate::engine::pairing::{select_pair, select_venue};
use crate::engine::schedule::scheduled_start;
use crate::entities::{MatchRecord, Participant, ParticipantStatus, Venue};
use crate::error::{MatchError, on_unique_violation};
use crate::utils::clock::now_utc;
use kanau::processor::Processor;
use tracing::{debug, info, warn};

/// Key of the transaction-scoped advisory lock that serializes pairing.
pub const PAIRING_LOCK_KEY: i64 = 0x6d61_7463_6870_6c79;

/// Upper bound on matches created by one [`DrainQueue`].
const MAX_PAIRINGS_PER_DRAIN: usize = 64;

/// Flip a participant between `no_match` and `searching`.
#[derive(Debug, Clone, Copy)]
pub struct ToggleAvailability {
    pub participant_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub status: ParticipantStatus,
    pub match_id: Option<i64>,
}

impl Processor<ToggleAvailability> for MatchController {
    type Output = ToggleOutcome;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(participant_id = cmd.participant_id))]
    async fn process(&self, cmd: ToggleAvailability) -> Result<ToggleOutcome, MatchError> {
        let mut tx = self.pool().begin().await?;
        let participant = Participant::lock_by_id(&mut tx, cmd.participant_id)
            .await?
            .ok_or_else(|| MatchError::participant_not_found(cmd.participant_id))?;

        let open = MatchRecord::find_open_for_participant(&mut *tx, participant.id).await?;
        if open.is_some() || participant.status == ParticipantStatus::InMatch {
            return Err(MatchError::AlreadyInMatch(participant.id));
        }

        if participant.status == ParticipantStatus::Searching {
            Participant::stop_searching(&mut tx, participant.id).await?;
            tx.commit().await?;
            info!(participant_id = participant.id, "Participant left the queue");
            return Ok(ToggleOutcome {
                status: ParticipantStatus::NoMatch,
                match_id: None,
            });
        }

        Participant::start_searching(&mut tx, participant.id, now_utc()).await?;
        tx.commit().await?;
        info!(participant_id = participant.id, "Participant joined the queue");

        match self.process(TryPair).await {
            Ok(PairingOutcome::Paired(record)) => {
                if record.side_of(participant.id).is_none() {
                    // Someone ahead in the queue got paired first.
                    if let Err(e) = self.process(DrainQueue).await {
                        warn!(
                            participant_id = participant.id,
                            error = %e,
                            "Queue drain after toggle failed, the sweeper will retry"
                        );
                    }
                }
            }
            Ok(PairingOutcome::StillSearching) => {}
            Err(MatchError::NoVenueAvailable) => {
                warn!(
                    participant_id = participant.id,
                    "No venue available, participant stays queued"
                );
            }
            Err(e) => {
                warn!(
                    participant_id = participant.id,
                    error = %e,
                    "Pairing after toggle failed, the sweeper will retry"
                );
            }
        }

        let read = self.overview(participant.id).await;
        Ok(ToggleOutcome::after_queued(participant.id, read))
    }
}

impl ToggleOutcome {
    /// Outcome of a toggle whose `searching` state is already committed.
    ///
    /// A failed re-read still reports the committed state, so a caller never
    /// retries a toggle that took effect.
    fn after_queued(participant_id: i64, read: Result<ParticipantOverview, MatchError>) -> Self {
        match read {
            Ok(overview) => ToggleOutcome {
                status: overview.participant.status,
                match_id: overview.current.map(|d| d.record.id),
            },
            Err(e) => {
                warn!(
                    participant_id,
                    error = %e,
                    "Status re-read after toggle failed, reporting the queued state"
                );
                ToggleOutcome {
                    status: ParticipantStatus::Searching,
                    match_id: None,
                }
            }
        }
    }
}

/// Pair the two participants at the head of the queue, if there are two.
#[derive(Debug, Clone, Copy)]
pub struct TryPair;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingOutcome {
    Paired(MatchRecord),
    StillSearching,
}

impl Processor<TryPair> for MatchController {
    type Output = PairingOutcome;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err)]
    async fn process(&self, _cmd: TryPair) -> Result<PairingOutcome, MatchError> {
        let policy = self.policy();
        let mut tx = self.pool().begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(PAIRING_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let queue = Participant::lock_queue_head(&mut tx, 2).await?;
        let Some(pairing) = select_pair(&queue) else {
            debug!(queued = queue.len(), "Not enough participants to pair");
            return Ok(PairingOutcome::StillSearching);
        };

        let free = Venue::free_ids(&mut tx).await?;
        let Some(venue_id) = select_venue(&free) else {
            return Err(MatchError::NoVenueAvailable);
        };

        let now = now_utc();
        let record = MatchRecord::insert_pending(
            &mut tx,
            pairing,
            venue_id,
            scheduled_start(now, &policy),
            now,
        )
        .await
        .map_err(|e| {
            on_unique_violation(
                e,
                MatchError::StaleState("venue or participant taken concurrently".to_string()),
            )
        })?;

        let flipped = Participant::enter_match(&mut tx, &[pairing.side_a, pairing.side_b]).await?;
        if flipped != 2 {
            return Err(MatchError::StaleState(format!(
                "only {flipped} of 2 participants were still searching"
            )));
        }

        tx.commit().await?;

        info!(
            match_id = record.id,
            side_a = record.side_a,
            side_b = record.side_b,
            venue_id,
            "Match created"
        );
        Ok(PairingOutcome::Paired(record))
    }
}

/// Pair from the queue until it runs dry or every venue is taken.
///
/// Errors other than a database failure end the drain quietly.
#[derive(Debug, Clone, Copy)]
pub struct DrainQueue;

impl Processor<DrainQueue> for MatchController {
    type Output = Vec<MatchRecord>;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err)]
    async fn process(&self, _cmd: DrainQueue) -> Result<Vec<MatchRecord>, MatchError> {
        let mut created = Vec::new();
        while created.len() < MAX_PAIRINGS_PER_DRAIN {
            match self.process(TryPair).await {
                Ok(PairingOutcome::Paired(record)) => created.push(record),
                Ok(PairingOutcome::StillSearching) => break,
                Err(MatchError::NoVenueAvailable) => {
                    debug!("Queue drain stopped: no venue available");
                    break;
                }
                Err(MatchError::StaleState(reason)) => {
                    debug!(reason, "Queue drain stopped on a concurrent update");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::views::MatchDetails;
    use crate::entities::MatchStatus;
    use time::macros::datetime;

    fn queued_participant(status: ParticipantStatus) -> Participant {
        Participant {
            id: 7,
            name: "Green".to_string(),
            rating: 1200,
            wins: 0,
            losses: 0,
            plays: 0,
            is_available: status == ParticipantStatus::Searching,
            status,
            searching_since: Some(datetime!(2024-03-01 11:59)),
            created_at: datetime!(2024-03-01 11:00),
        }
    }

    #[test]
    fn test_failed_reread_reports_queued_state() {
        let outcome = ToggleOutcome::after_queued(
            7,
            Err(MatchError::Database(sqlx::Error::PoolTimedOut)),
        );
        assert_eq!(
            outcome,
            ToggleOutcome {
                status: ParticipantStatus::Searching,
                match_id: None,
            }
        );
    }

    #[test]
    fn test_reread_reports_new_match() {
        let record = MatchRecord {
            id: 12,
            side_a: 3,
            side_b: 7,
            venue_id: Some(1),
            status: MatchStatus::Pending,
            side_a_ready: false,
            side_b_ready: false,
            side_a_done: false,
            side_b_done: false,
            mismatch: false,
            submission_round: 0,
            score_a: None,
            score_b: None,
            winner_id: None,
            resolution: None,
            side_a_notified: false,
            side_b_notified: false,
            created_at: datetime!(2024-03-01 12:00),
            scheduled_start: Some(datetime!(2024-03-01 12:03)),
            started_at: None,
            ended_at: None,
        };
        let overview = ParticipantOverview {
            participant: queued_participant(ParticipantStatus::InMatch),
            current: Some(MatchDetails {
                record,
                venue_label: None,
                submission_a: None,
                submission_b: None,
            }),
        };
        let outcome = ToggleOutcome::after_queued(7, Ok(overview));
        assert_eq!(outcome.status, ParticipantStatus::InMatch);
        assert_eq!(outcome.match_id, Some(12));
    }
}
