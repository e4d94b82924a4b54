//! Match-facing request and response types.

use serde::{Deserialize, Serialize};

use super::{MatchResolution, MatchStatus, Side};

/// Body of `POST /matches/{id}/ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyRequest {
    pub side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: MatchStatus,
    /// True when this call was the one that started the match.
    pub activated: bool,
}

/// Body of `POST /matches/{id}/score`.
///
/// Scores are from the submitting side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    pub side: Side,
    pub score_for: i32,
    pub score_against: i32,
}

/// Result of a score submission. A mismatch is reported here, not as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    pub completed: bool,
    pub mismatch: bool,
}

/// A single side's claim in the current submission round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionView {
    pub participant_id: i64,
    pub score_for: i32,
    pub score_against: i32,
    pub submitted_at: i64,
}

/// Polling view of a match. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub match_id: i64,
    pub status: MatchStatus,
    pub side_a: i64,
    pub side_b: i64,
    pub venue_id: Option<i64>,
    pub venue_label: Option<String>,
    pub side_a_ready: bool,
    pub side_b_ready: bool,
    pub side_a_done: bool,
    pub side_b_done: bool,
    pub side_a_submission: Option<SubmissionView>,
    pub side_b_submission: Option<SubmissionView>,
    pub mismatch: bool,
    pub scheduled_start: Option<i64>,
    pub started_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub winner_id: Option<i64>,
    pub resolution: Option<MatchResolution>,
}

/// A stored claim together with the submission round it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSubmission {
    pub round: i32,
    #[serde(flatten)]
    pub submission: SubmissionView,
}

/// Response to `GET /matches/{id}`: the match view plus every stored claim,
/// including rounds discarded by a reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetailResponse {
    #[serde(flatten)]
    pub view: MatchView,
    pub submissions: Vec<RoundSubmission>,
}

impl MatchView {
    /// Participant ids that still owe a submission in the current round.
    pub fn awaiting_submission(&self) -> Vec<i64> {
        let mut awaiting = Vec::with_capacity(2);
        if self.side_a_submission.is_none() {
            awaiting.push(self.side_a);
        }
        if self.side_b_submission.is_none() {
            awaiting.push(self.side_b);
        }
        awaiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_parsing() {
        let req: SubmitScoreRequest =
            serde_json::from_str(r#"{"side":"b","score_for":7,"score_against":11}"#).unwrap();
        assert_eq!(req.side, Side::B);
        assert_eq!(req.score_for, 7);
        assert_eq!(req.score_against, 11);
    }

    #[test]
    fn test_awaiting_submission() {
        let view = MatchView {
            match_id: 1,
            status: MatchStatus::Active,
            side_a: 10,
            side_b: 20,
            venue_id: Some(1),
            venue_label: Some("Table 1".to_string()),
            side_a_ready: true,
            side_b_ready: true,
            side_a_done: true,
            side_b_done: false,
            side_a_submission: Some(SubmissionView {
                participant_id: 10,
                score_for: 11,
                score_against: 7,
                submitted_at: 0,
            }),
            side_b_submission: None,
            mismatch: false,
            scheduled_start: None,
            started_at: None,
            ended_at: None,
            score_a: None,
            score_b: None,
            winner_id: None,
            resolution: None,
        };
        assert_eq!(view.awaiting_submission(), vec![20]);
    }

    #[test]
    fn test_round_submission_is_flat() {
        let entry = RoundSubmission {
            round: 1,
            submission: SubmissionView {
                participant_id: 20,
                score_for: 9,
                score_against: 11,
                submitted_at: 1_709_294_400,
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "round": 1,
                "participant_id": 20,
                "score_for": 9,
                "score_against": 11,
                "submitted_at": 1_709_294_400,
            })
        );
    }
}
