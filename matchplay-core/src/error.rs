use crate::entities::MatchStatus;
use crate::framework::{is_transient_conflict, is_unique_violation};
use thiserror::Error;

/// Errors returned by the match controller.
///
/// Every variant is recoverable by the caller: re-poll the status, submit
/// again, or wait for a venue. A score mismatch is not an error and is
/// reported as data instead.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The participant already plays in a pending or active match.
    #[error("participant {0} is already in a match")]
    AlreadyInMatch(i64),

    /// Two participants are queued but every venue is held. They stay queued.
    #[error("no venue available")]
    NoVenueAvailable,

    /// Both sides already submitted in this round, so the claim is locked.
    #[error("score for match {match_id} is already locked in")]
    DuplicateSubmission { match_id: i64 },

    /// A tied score was submitted while draws are disabled.
    #[error("tied score {0}-{0} is not a valid result")]
    InvalidTieScore(i32),

    #[error("invalid score {score_for}-{score_against}: scores must be non-negative")]
    InvalidScore { score_for: i32, score_against: i32 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The participant is not one of the two sides of the match.
    #[error("participant {participant_id} does not play in match {match_id}")]
    NotParticipant { match_id: i64, participant_id: i64 },

    /// The operation lost a race against a concurrent transition.
    /// Re-read the status and retry.
    #[error("stale state: {0}")]
    StaleState(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl MatchError {
    pub fn match_not_found(id: i64) -> Self {
        MatchError::NotFound { entity: "match", id }
    }

    pub fn participant_not_found(id: i64) -> Self {
        MatchError::NotFound {
            entity: "participant",
            id,
        }
    }

    pub(crate) fn wrong_status(match_id: i64, actual: MatchStatus, wanted: MatchStatus) -> Self {
        MatchError::StaleState(format!(
            "match {match_id} is {actual:?}, expected {wanted:?}"
        ))
    }

    /// Short machine-readable name, used as the `error` field of API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchError::AlreadyInMatch(_) => "already_in_match",
            MatchError::NoVenueAvailable => "no_venue_available",
            MatchError::DuplicateSubmission { .. } => "duplicate_submission",
            MatchError::InvalidTieScore(_) => "invalid_tie_score",
            MatchError::InvalidScore { .. } => "invalid_score",
            MatchError::NotFound { .. } => "not_found",
            MatchError::NotParticipant { .. } => "not_participant",
            MatchError::StaleState(_) => "stale_state",
            MatchError::Database(_) => "database",
        }
    }
}

impl From<sqlx::Error> for MatchError {
    fn from(err: sqlx::Error) -> Self {
        if is_transient_conflict(&err) {
            MatchError::StaleState(format!("transaction aborted by a concurrent update: {err}"))
        } else {
            MatchError::Database(err)
        }
    }
}

/// Maps a unique-key violation to `on_conflict`, everything else as usual.
pub(crate) fn on_unique_violation(err: sqlx::Error, on_conflict: MatchError) -> MatchError {
    if is_unique_violation(&err) {
        on_conflict
    } else {
        MatchError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(MatchError::NoVenueAvailable.kind(), "no_venue_available");
        assert_eq!(MatchError::match_not_found(3).kind(), "not_found");
        assert_eq!(
            MatchError::match_not_found(3).to_string(),
            "match 3 not found"
        );
    }

    #[test]
    fn test_plain_sqlx_error_is_database() {
        let err = MatchError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, MatchError::Database(_)));
        let err = on_unique_violation(
            sqlx::Error::RowNotFound,
            MatchError::DuplicateSubmission { match_id: 1 },
        );
        assert!(matches!(err, MatchError::Database(_)));
    }
}
