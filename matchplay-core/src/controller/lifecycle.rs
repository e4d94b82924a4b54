use super::MatchController;
use super::completion::complete_tx;
use crate::engine::reconciliation::FinalScore;
use crate::engine::schedule::reminder_minutes;
use crate::engine::timeout::{TimeoutDecision, decide};
use crate::entities::{MatchRecord, MatchResolution, MatchStatus, Participant, Submission};
use crate::error::MatchError;
use crate::utils::clock::now_utc;
use kanau::processor::Processor;
use matchplay_sdk::objects::Side;
use tracing::{debug, info, warn};

/// Mark one side of a pending match as ready.
#[derive(Debug, Clone, Copy)]
pub struct MarkReady {
    pub match_id: i64,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyOutcome {
    pub record: MatchRecord,
    /// Whether this call moved the match to `active`.
    pub activated: bool,
}

impl Processor<MarkReady> for MatchController {
    type Output = ReadyOutcome;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(match_id = cmd.match_id, side = %cmd.side))]
    async fn process(&self, cmd: MarkReady) -> Result<ReadyOutcome, MatchError> {
        let mut tx = self.pool().begin().await?;
        let record = MatchRecord::lock_by_id(&mut tx, cmd.match_id)
            .await?
            .ok_or_else(|| MatchError::match_not_found(cmd.match_id))?;

        match record.status {
            MatchStatus::Completed => {
                return Err(MatchError::wrong_status(
                    record.id,
                    record.status,
                    MatchStatus::Pending,
                ));
            }
            MatchStatus::Active => {
                debug!(match_id = record.id, "Match already active");
                return Ok(ReadyOutcome {
                    record,
                    activated: false,
                });
            }
            MatchStatus::Pending => {}
        }

        let record = if record.is_ready(cmd.side) {
            record
        } else {
            MatchRecord::set_ready(&mut tx, record.id, cmd.side).await?
        };

        if !(record.side_a_ready && record.side_b_ready) {
            tx.commit().await?;
            info!(match_id = record.id, side = %cmd.side, "Side ready");
            return Ok(ReadyOutcome {
                record,
                activated: false,
            });
        }

        let record = MatchRecord::activate(&mut tx, record.id, now_utc())
            .await?
            .ok_or_else(|| {
                MatchError::wrong_status(cmd.match_id, MatchStatus::Active, MatchStatus::Pending)
            })?;
        tx.commit().await?;
        info!(match_id = record.id, "Both sides ready, match started");
        Ok(ReadyOutcome {
            record,
            activated: true,
        })
    }
}

/// Apply the timeout policy to one match.
#[derive(Debug, Clone, Copy)]
pub struct CheckTimeout {
    pub match_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutOutcome {
    NotDue,
    AutoStarted(MatchRecord),
    /// Completed by the timeout policy with this resolution.
    Completed(MatchRecord),
    AlreadyCompleted,
}

impl Processor<CheckTimeout> for MatchController {
    type Output = TimeoutOutcome;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(match_id = cmd.match_id))]
    async fn process(&self, cmd: CheckTimeout) -> Result<TimeoutOutcome, MatchError> {
        let policy = self.policy();
        let mut tx = self.pool().begin().await?;
        let record = MatchRecord::lock_by_id(&mut tx, cmd.match_id)
            .await?
            .ok_or_else(|| MatchError::match_not_found(cmd.match_id))?;

        let submissions = Submission::for_round(&mut *tx, record.id, record.submission_round).await?;
        let (a, b) = record.submissions_by_side(&submissions);
        let facts = record.timeout_facts(a.map(Submission::claim), b.map(Submission::claim));
        let now = now_utc();

        let (score, resolution): (Option<FinalScore>, MatchResolution) =
            match decide(&facts, now, &policy) {
                TimeoutDecision::NotDue => return Ok(TimeoutOutcome::NotDue),
                TimeoutDecision::AlreadyCompleted => return Ok(TimeoutOutcome::AlreadyCompleted),
                TimeoutDecision::AutoStart => {
                    let started = MatchRecord::activate(&mut tx, record.id, now)
                        .await?
                        .ok_or_else(|| {
                            MatchError::wrong_status(record.id, record.status, MatchStatus::Pending)
                        })?;
                    tx.commit().await?;
                    info!(
                        match_id = started.id,
                        side_a_ready = started.side_a_ready,
                        side_b_ready = started.side_b_ready,
                        "Ready check timed out, match started"
                    );
                    return Ok(TimeoutOutcome::AutoStarted(started));
                }
                TimeoutDecision::Forfeit(score) => (Some(score), MatchResolution::Forfeit),
                TimeoutDecision::Agreed(score) => (Some(score), MatchResolution::Agreed),
                TimeoutDecision::Void => (None, MatchResolution::Void),
            };

        if resolution == MatchResolution::Void {
            warn!(
                match_id = record.id,
                mismatch = record.mismatch,
                "Match timed out without a usable result, voiding"
            );
        }

        let completed = complete_tx(&mut tx, &record, score, resolution, &policy, now).await?;
        tx.commit().await?;

        self.drain_after_completion(completed.id).await;
        Ok(TimeoutOutcome::Completed(completed))
    }
}

/// Claim the start reminder of a participant's upcoming match.
#[derive(Debug, Clone, Copy)]
pub struct CheckUpcoming {
    pub participant_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Upcoming {
    pub notify: bool,
    pub match_id: Option<i64>,
    pub minutes_until: Option<i64>,
}

impl Processor<CheckUpcoming> for MatchController {
    type Output = Upcoming;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(participant_id = cmd.participant_id))]
    async fn process(&self, cmd: CheckUpcoming) -> Result<Upcoming, MatchError> {
        let policy = self.policy();
        let pool = self.pool();
        Participant::find_by_id(pool, cmd.participant_id)
            .await?
            .ok_or_else(|| MatchError::participant_not_found(cmd.participant_id))?;

        let Some(record) = MatchRecord::find_open_for_participant(pool, cmd.participant_id).await?
        else {
            return Ok(Upcoming::default());
        };
        let Some(side) = record.side_of(cmd.participant_id) else {
            return Ok(Upcoming::default());
        };
        if record.status != MatchStatus::Pending || record.is_notified(side) {
            return Ok(Upcoming::default());
        }
        let Some(start) = record.scheduled_start else {
            return Ok(Upcoming::default());
        };
        let Some(minutes) = reminder_minutes(start, now_utc(), &policy) else {
            return Ok(Upcoming::default());
        };

        if !MatchRecord::claim_notification(pool, record.id, side).await? {
            debug!(match_id = record.id, "Reminder already sent");
            return Ok(Upcoming::default());
        }

        info!(
            match_id = record.id,
            participant_id = cmd.participant_id,
            minutes_until = minutes,
            "Match reminder sent"
        );
        Ok(Upcoming {
            notify: true,
            match_id: Some(record.id),
            minutes_until: Some(minutes),
        })
    }
}
