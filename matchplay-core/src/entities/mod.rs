pub mod match_record;
pub mod participant;
pub mod rating_history;
pub mod submission;
pub mod venue;

pub use match_record::MatchRecord;
pub use participant::Participant;
pub use rating_history::RatingHistoryRecord;
pub use submission::Submission;
pub use venue::Venue;

use matchplay_sdk::objects::{
    MatchResolution as SdkMatchResolution, MatchStatus as SdkMatchStatus,
    ParticipantStatus as SdkParticipantStatus,
};

/// Participant status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `matchplay_sdk::objects::ParticipantStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "participant_status")]
pub enum ParticipantStatus {
    NoMatch,
    Searching,
    InMatch,
}

impl From<ParticipantStatus> for SdkParticipantStatus {
    fn from(value: ParticipantStatus) -> Self {
        match value {
            ParticipantStatus::NoMatch => SdkParticipantStatus::NoMatch,
            ParticipantStatus::Searching => SdkParticipantStatus::Searching,
            ParticipantStatus::InMatch => SdkParticipantStatus::InMatch,
        }
    }
}

/// Match status for database operations.
///
/// `Pending` and `Active` hold a venue; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "match_status")]
pub enum MatchStatus {
    Pending,
    Active,
    Completed,
}

impl From<MatchStatus> for SdkMatchStatus {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::Pending => SdkMatchStatus::Pending,
            MatchStatus::Active => SdkMatchStatus::Active,
            MatchStatus::Completed => SdkMatchStatus::Completed,
        }
    }
}

/// How a completed match was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "match_resolution")]
pub enum MatchResolution {
    Agreed,
    Admin,
    Forfeit,
    Void,
}

impl MatchResolution {
    /// Whether this resolution updates ratings and counters.
    pub fn is_rated(self) -> bool {
        !matches!(self, MatchResolution::Void)
    }
}

impl From<MatchResolution> for SdkMatchResolution {
    fn from(value: MatchResolution) -> Self {
        match value {
            MatchResolution::Agreed => SdkMatchResolution::Agreed,
            MatchResolution::Admin => SdkMatchResolution::Admin,
            MatchResolution::Forfeit => SdkMatchResolution::Forfeit,
            MatchResolution::Void => SdkMatchResolution::Void,
        }
    }
}
