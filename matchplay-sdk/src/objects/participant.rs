//! Participant-facing request and response types.
//!
//! These are what a polling frontend sees for "my team": the queue toggle,
//! the status poll and the upcoming-match reminder.

use serde::{Deserialize, Serialize};

use super::matches::MatchView;
use super::ParticipantStatus;

/// Response to `POST /participants/{id}/toggle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub status: ParticipantStatus,
    /// Set when the toggle paired the participant immediately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<i64>,
}

/// Response to `GET /participants/{id}/status`.
///
/// `match_id`, `opponent_id`, `is_side_a` and `current_match` are present
/// only while the participant is `in_match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ParticipantStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_side_a: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_match: Option<MatchView>,
}

/// Response to `GET /participants/{id}/notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub notify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_until: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub participant_id: i64,
    pub name: String,
    pub rating: i32,
    pub wins: i32,
    pub losses: i32,
    pub plays: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingHistoryEntry {
    pub match_id: i64,
    pub rating_after: i32,
    /// Unix timestamp (seconds).
    pub recorded_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searching_status_omits_match_fields() {
        let status = StatusResponse {
            status: ParticipantStatus::Searching,
            match_id: None,
            opponent_id: None,
            is_side_a: None,
            current_match: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "searching" }));
    }

    #[test]
    fn test_notification_round_trip_without_optional_fields() {
        let parsed: NotificationResponse = serde_json::from_str(r#"{"notify":false}"#).unwrap();
        assert!(!parsed.notify);
        assert_eq!(parsed.minutes_until, None);
    }
}
