use super::MatchController;
use super::completion::complete_tx;
use super::pairing::DrainQueue;
use crate::engine::reconciliation::{Claim, FinalScore, Reconciliation, reconcile};
use crate::entities::{MatchRecord, MatchResolution, MatchStatus, Submission};
use crate::error::{MatchError, on_unique_violation};
use crate::utils::clock::now_utc;
use kanau::processor::Processor;
use matchplay_sdk::objects::Side;
use tracing::{info, warn};

/// One side's claim of the final score, from its own point of view.
#[derive(Debug, Clone, Copy)]
pub struct SubmitScore {
    pub match_id: i64,
    pub side: Side,
    pub score_for: i32,
    pub score_against: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub record: MatchRecord,
    pub completed: bool,
    pub mismatch: bool,
}

impl Processor<SubmitScore> for MatchController {
    type Output = SubmitOutcome;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(match_id = cmd.match_id, side = %cmd.side))]
    async fn process(&self, cmd: SubmitScore) -> Result<SubmitOutcome, MatchError> {
        let policy = self.policy();
        let claim = Claim::new(cmd.score_for, cmd.score_against);
        claim.validate(policy.allow_draws)?;

        let mut tx = self.pool().begin().await?;
        let record = MatchRecord::lock_by_id(&mut tx, cmd.match_id)
            .await?
            .ok_or_else(|| MatchError::match_not_found(cmd.match_id))?;
        if record.status != MatchStatus::Active {
            return Err(MatchError::wrong_status(
                record.id,
                record.status,
                MatchStatus::Active,
            ));
        }

        let submissions = Submission::for_round(&mut *tx, record.id, record.submission_round).await?;
        let (a, b) = record.submissions_by_side(&submissions);
        if a.is_some() && b.is_some() {
            return Err(MatchError::DuplicateSubmission {
                match_id: record.id,
            });
        }

        let now = now_utc();
        let participant_id = record.participant(cmd.side);
        Submission::upsert(
            &mut tx,
            record.id,
            participant_id,
            record.submission_round,
            claim,
            now,
        )
        .await
        .map_err(|e| {
            on_unique_violation(
                e,
                MatchError::DuplicateSubmission {
                    match_id: record.id,
                },
            )
        })?;

        let record = if record.is_done(cmd.side) {
            record
        } else {
            MatchRecord::set_done(&mut tx, record.id, cmd.side).await?
        };

        let (claim_a, claim_b) = match cmd.side {
            Side::A => (Some(claim), b.map(Submission::claim)),
            Side::B => (a.map(Submission::claim), Some(claim)),
        };

        match reconcile(claim_a, claim_b) {
            Reconciliation::Empty | Reconciliation::AwaitingOpponent { .. } => {
                tx.commit().await?;
                info!(
                    match_id = record.id,
                    participant_id,
                    "Score submitted, awaiting opponent"
                );
                Ok(SubmitOutcome {
                    record,
                    completed: false,
                    mismatch: false,
                })
            }
            Reconciliation::Mismatch => {
                let record = MatchRecord::set_mismatch(&mut tx, record.id, true).await?;
                tx.commit().await?;
                warn!(
                    match_id = record.id,
                    claim_a = ?claim_a,
                    claim_b = ?claim_b,
                    "Submitted scores disagree"
                );
                Ok(SubmitOutcome {
                    record,
                    completed: false,
                    mismatch: true,
                })
            }
            Reconciliation::Agreed(score) => {
                score.validate(policy.allow_draws)?;
                let record =
                    complete_tx(&mut tx, &record, Some(score), MatchResolution::Agreed, &policy, now)
                        .await?;
                tx.commit().await?;
                self.drain_after_completion(record.id).await;
                Ok(SubmitOutcome {
                    record,
                    completed: true,
                    mismatch: false,
                })
            }
        }
    }
}

/// Administrative override: complete an active match with the given score.
#[derive(Debug, Clone, Copy)]
pub struct ResolveMatch {
    pub match_id: i64,
    pub score_a: i32,
    pub score_b: i32,
}

impl Processor<ResolveMatch> for MatchController {
    type Output = MatchRecord;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(match_id = cmd.match_id))]
    async fn process(&self, cmd: ResolveMatch) -> Result<MatchRecord, MatchError> {
        let policy = self.policy();
        let score = FinalScore {
            score_a: cmd.score_a,
            score_b: cmd.score_b,
        };
        score.validate(policy.allow_draws)?;

        let mut tx = self.pool().begin().await?;
        let record = MatchRecord::lock_by_id(&mut tx, cmd.match_id)
            .await?
            .ok_or_else(|| MatchError::match_not_found(cmd.match_id))?;
        if record.status != MatchStatus::Active {
            return Err(MatchError::wrong_status(
                record.id,
                record.status,
                MatchStatus::Active,
            ));
        }

        let record = complete_tx(
            &mut tx,
            &record,
            Some(score),
            MatchResolution::Admin,
            &policy,
            now_utc(),
        )
        .await?;
        tx.commit().await?;
        self.drain_after_completion(record.id).await;
        Ok(record)
    }
}

/// Discard the current submission round of an active match.
#[derive(Debug, Clone, Copy)]
pub struct ResetSubmissions {
    pub match_id: i64,
}

impl Processor<ResetSubmissions> for MatchController {
    type Output = MatchRecord;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(match_id = cmd.match_id))]
    async fn process(&self, cmd: ResetSubmissions) -> Result<MatchRecord, MatchError> {
        let mut tx = self.pool().begin().await?;
        let record = MatchRecord::lock_by_id(&mut tx, cmd.match_id)
            .await?
            .ok_or_else(|| MatchError::match_not_found(cmd.match_id))?;
        if record.status != MatchStatus::Active {
            return Err(MatchError::wrong_status(
                record.id,
                record.status,
                MatchStatus::Active,
            ));
        }

        let record = MatchRecord::open_new_round(&mut tx, record.id).await?;
        tx.commit().await?;
        info!(
            match_id = record.id,
            round = record.submission_round,
            "Submissions reset"
        );
        Ok(record)
    }
}

impl MatchController {
    /// Pairs waiting participants onto the venue a completion just freed.
    pub(super) async fn drain_after_completion(&self, match_id: i64) {
        if let Err(e) = self.process(DrainQueue).await {
            warn!(match_id, error = %e, "Failed to drain queue after completion");
        }
    }
}
