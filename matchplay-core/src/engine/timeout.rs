//! Bounded resolution of matches that overstay their deadlines.
//!
//! - A pending match past its ready deadline is started anyway.
//! - An active match past its deadline is completed: with the lone claim
//!   if exactly one side submitted (forfeit), otherwise as void.
//! - Completed matches are never touched again.

use super::reconciliation::{Claim, FinalScore, Reconciliation, reconcile};
use super::schedule::{active_deadline, ready_deadline};
use crate::config::MatchPolicy;
use crate::entities::MatchStatus;
use matchplay_sdk::objects::Side;
use time::PrimitiveDateTime;

/// What the timeout check needs to know about a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutFacts {
    pub status: MatchStatus,
    pub created_at: PrimitiveDateTime,
    pub scheduled_start: Option<PrimitiveDateTime>,
    pub started_at: Option<PrimitiveDateTime>,
    pub mismatch: bool,
    pub claim_a: Option<Claim>,
    pub claim_b: Option<Claim>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutDecision {
    NotDue,
    /// Move `pending` to `active` without both sides being ready.
    AutoStart,
    /// Complete with the only submitted claim.
    Forfeit(FinalScore),
    /// Both claims agree but the match was never completed.
    ///
    /// Score submission completes agreeing claims in the same transaction that
    /// stores the second one, so the controller never leaves such a match
    /// open. This settles rows whose claims were written some other way, for
    /// example repaired or restored by hand. Ties still need `allow_draws`.
    Agreed(FinalScore),
    /// Complete without a result and without a rating change.
    Void,
    AlreadyCompleted,
}

/// When the timeout policy takes over, or `None` for completed matches.
pub fn deadline(facts: &TimeoutFacts, policy: &MatchPolicy) -> Option<PrimitiveDateTime> {
    match facts.status {
        MatchStatus::Completed => None,
        MatchStatus::Pending => {
            let start = facts.scheduled_start.unwrap_or(facts.created_at);
            Some(ready_deadline(start, policy))
        }
        MatchStatus::Active => {
            let started = facts
                .started_at
                .or(facts.scheduled_start)
                .unwrap_or(facts.created_at);
            Some(active_deadline(started, facts.mismatch, policy))
        }
    }
}

pub fn decide(facts: &TimeoutFacts, now: PrimitiveDateTime, policy: &MatchPolicy) -> TimeoutDecision {
    let Some(due) = deadline(facts, policy) else {
        return TimeoutDecision::AlreadyCompleted;
    };
    if now < due {
        return TimeoutDecision::NotDue;
    }
    if facts.status == MatchStatus::Pending {
        return TimeoutDecision::AutoStart;
    }
    match reconcile(facts.claim_a, facts.claim_b) {
        Reconciliation::AwaitingOpponent { submitted } => {
            let claim = match submitted {
                Side::A => facts.claim_a,
                Side::B => facts.claim_b,
            };
            match claim.map(|c| c.as_final(submitted)) {
                Some(score) if score.validate(policy.allow_draws).is_ok() => {
                    TimeoutDecision::Forfeit(score)
                }
                _ => TimeoutDecision::Void,
            }
        }
        Reconciliation::Agreed(score) if score.validate(policy.allow_draws).is_ok() => {
            TimeoutDecision::Agreed(score)
        }
        Reconciliation::Agreed(_) | Reconciliation::Empty | Reconciliation::Mismatch => {
            TimeoutDecision::Void
        }
    }
}
