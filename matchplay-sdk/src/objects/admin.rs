//! Administrative request and response types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateParticipantRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub participant_id: i64,
    pub name: String,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVenueRequest {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueResponse {
    pub venue_id: i64,
    pub label: String,
}

/// Body of `POST /admin/matches/{id}/resolve`: the authoritative final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveMatchRequest {
    pub score_a: i32,
    pub score_b: i32,
}

/// What `POST /admin/matches/{id}/check-timeout` did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TimeoutReport {
    NotDue,
    AutoStarted,
    Forfeited { winner_id: Option<i64> },
    /// Both claims agreed but the match had not been completed yet.
    Settled { winner_id: Option<i64> },
    Voided,
    AlreadyCompleted,
}
