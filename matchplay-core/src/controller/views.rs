use super::MatchController;
use crate::entities::{MatchRecord, Participant, Submission, Venue};
use crate::error::MatchError;
use crate::utils::clock::unix_seconds;
use kanau::processor::Processor;
use matchplay_sdk::objects::{MatchView, StatusResponse, SubmissionView};
use sqlx::PgConnection;

/// A match together with its venue label and current-round claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDetails {
    pub record: MatchRecord,
    pub venue_label: Option<String>,
    pub submission_a: Option<Submission>,
    pub submission_b: Option<Submission>,
}

impl MatchDetails {
    async fn load(conn: &mut PgConnection, record: MatchRecord) -> Result<Self, MatchError> {
        let venue_label = match record.venue_id {
            Some(venue_id) => Venue::find_by_id(&mut *conn, venue_id)
                .await?
                .map(|v| v.label),
            None => None,
        };
        let submissions =
            Submission::for_round(&mut *conn, record.id, record.submission_round).await?;
        let (a, b) = record.submissions_by_side(&submissions);
        let (submission_a, submission_b) = (a.cloned(), b.cloned());
        Ok(Self {
            record,
            venue_label,
            submission_a,
            submission_b,
        })
    }

    pub fn to_view(&self) -> MatchView {
        let r = &self.record;
        MatchView {
            match_id: r.id,
            status: r.status.into(),
            side_a: r.side_a,
            side_b: r.side_b,
            venue_id: r.venue_id,
            venue_label: self.venue_label.clone(),
            side_a_ready: r.side_a_ready,
            side_b_ready: r.side_b_ready,
            side_a_done: r.side_a_done,
            side_b_done: r.side_b_done,
            side_a_submission: self.submission_a.as_ref().map(SubmissionView::from),
            side_b_submission: self.submission_b.as_ref().map(SubmissionView::from),
            mismatch: r.mismatch,
            scheduled_start: r.scheduled_start.map(unix_seconds),
            started_at: r.started_at.map(unix_seconds),
            ended_at: r.ended_at.map(unix_seconds),
            score_a: r.score_a,
            score_b: r.score_b,
            winner_id: r.winner_id,
            resolution: r.resolution.map(Into::into),
        }
    }
}

impl From<&Submission> for SubmissionView {
    fn from(s: &Submission) -> Self {
        SubmissionView {
            participant_id: s.participant_id,
            score_for: s.score_for,
            score_against: s.score_against,
            submitted_at: unix_seconds(s.submitted_at),
        }
    }
}

/// A participant and the open match they play in, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantOverview {
    pub participant: Participant,
    pub current: Option<MatchDetails>,
}

impl ParticipantOverview {
    pub fn to_response(&self) -> StatusResponse {
        let id = self.participant.id;
        let current = self.current.as_ref();
        StatusResponse {
            status: self.participant.status.into(),
            match_id: current.map(|d| d.record.id),
            opponent_id: current.and_then(|d| d.record.opponent_of(id)),
            is_side_a: current.map(|d| d.record.side_a == id),
            current_match: current.map(MatchDetails::to_view),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetStatus {
    pub participant_id: i64,
}

impl Processor<GetStatus> for MatchController {
    type Output = ParticipantOverview;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(participant_id = query.participant_id))]
    async fn process(&self, query: GetStatus) -> Result<ParticipantOverview, MatchError> {
        self.overview(query.participant_id).await
    }
}

impl MatchController {
    /// The participant row and their open match, read from one snapshot.
    pub(super) async fn overview(
        &self,
        participant_id: i64,
    ) -> Result<ParticipantOverview, MatchError> {
        let mut tx = self.snapshot().await?;
        let participant = Participant::find_by_id(&mut *tx, participant_id)
            .await?
            .ok_or_else(|| MatchError::participant_not_found(participant_id))?;
        let current = match MatchRecord::find_open_for_participant(&mut *tx, participant.id).await? {
            Some(record) => Some(MatchDetails::load(&mut tx, record).await?),
            None => None,
        };
        tx.commit().await?;
        Ok(ParticipantOverview {
            participant,
            current,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetMatchView {
    pub match_id: i64,
}

impl Processor<GetMatchView> for MatchController {
    type Output = MatchDetails;
    type Error = MatchError;
    #[tracing::instrument(skip_all, err, fields(match_id = query.match_id))]
    async fn process(&self, query: GetMatchView) -> Result<MatchDetails, MatchError> {
        let mut tx = self.snapshot().await?;
        let record = MatchRecord::find_by_id(&mut *tx, query.match_id)
            .await?
            .ok_or_else(|| MatchError::match_not_found(query.match_id))?;
        let details = MatchDetails::load(&mut tx, record).await?;
        tx.commit().await?;
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RATING;
    use crate::entities::{MatchStatus, ParticipantStatus};
    use matchplay_sdk::objects::{MatchStatus as WireMatchStatus, ParticipantStatus as WireStatus};
    use time::macros::datetime;

    fn details() -> MatchDetails {
        MatchDetails {
            record: MatchRecord {
                id: 3,
                side_a: 10,
                side_b: 20,
                venue_id: Some(2),
                status: MatchStatus::Active,
                side_a_ready: true,
                side_b_ready: true,
                side_a_done: true,
                side_b_done: false,
                mismatch: false,
                submission_round: 0,
                score_a: None,
                score_b: None,
                winner_id: None,
                resolution: None,
                side_a_notified: true,
                side_b_notified: false,
                created_at: datetime!(2024-03-01 11:57),
                scheduled_start: Some(datetime!(2024-03-01 12:00)),
                started_at: Some(datetime!(2024-03-01 12:00)),
                ended_at: None,
            },
            venue_label: Some("Table 2".to_string()),
            submission_a: Some(Submission {
                id: 1,
                match_id: 3,
                participant_id: 10,
                round: 0,
                score_for: 11,
                score_against: 7,
                submitted_at: datetime!(2024-03-01 12:20),
            }),
            submission_b: None,
        }
    }

    #[test]
    fn test_match_view_uses_unix_seconds() {
        let view = details().to_view();
        assert_eq!(view.status, WireMatchStatus::Active);
        assert_eq!(view.started_at, Some(1_709_294_400));
        assert_eq!(view.venue_label.as_deref(), Some("Table 2"));
        assert_eq!(
            view.side_a_submission.as_ref().map(|s| (s.score_for, s.score_against)),
            Some((11, 7))
        );
        assert_eq!(view.awaiting_submission(), vec![20]);
    }

    #[test]
    fn test_status_response_for_side_b() {
        let overview = ParticipantOverview {
            participant: Participant {
                id: 20,
                name: "Blue".to_string(),
                rating: DEFAULT_RATING,
                wins: 0,
                losses: 0,
                plays: 0,
                is_available: false,
                status: ParticipantStatus::InMatch,
                searching_since: None,
                created_at: datetime!(2024-03-01 11:00),
            },
            current: Some(details()),
        };
        let response = overview.to_response();
        assert_eq!(response.status, WireStatus::InMatch);
        assert_eq!(response.match_id, Some(3));
        assert_eq!(response.opponent_id, Some(10));
        assert_eq!(response.is_side_a, Some(false));
    }
}
