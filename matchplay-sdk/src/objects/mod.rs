pub mod admin;
pub mod matches;
pub mod participant;

pub use matches::{
    MatchDetailResponse, MatchView, ReadyRequest, ReadyResponse, RoundSubmission,
    SubmissionView, SubmitScoreRequest, SubmitScoreResponse,
};
pub use participant::{
    LeaderboardEntry, NotificationResponse, RatingHistoryEntry, StatusResponse, ToggleResponse,
};

use serde::{Deserialize, Serialize};

/// One side of a match. The participant who queued first is side A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "a"),
            Side::B => write!(f, "b"),
        }
    }
}

/// Where a participant currently is in the matchmaking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    NoMatch,
    Searching,
    InMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Active,
    Completed,
}

/// How a completed match reached its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResolution {
    /// Both sides submitted the same score.
    Agreed,
    /// An administrator entered the authoritative score.
    Admin,
    /// Only one side submitted before the match timed out.
    Forfeit,
    /// Timed out without a usable result. No rating change.
    Void,
}

/// Error body returned by the server for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Side::A).unwrap(), r#""a""#);
        assert_eq!(
            serde_json::to_string(&ParticipantStatus::NoMatch).unwrap(),
            r#""no_match""#
        );
        assert_eq!(
            serde_json::to_string(&ParticipantStatus::InMatch).unwrap(),
            r#""in_match""#
        );
        assert_eq!(
            serde_json::from_str::<MatchResolution>(r#""forfeit""#).unwrap(),
            MatchResolution::Forfeit
        );
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::A.opposite(), Side::B);
        assert_eq!(Side::B.opposite().opposite(), Side::B);
    }
}
