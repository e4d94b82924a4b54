use crate::engine::pairing::Pairing;
use crate::engine::reconciliation::{Claim, FinalScore};
use crate::engine::timeout::TimeoutFacts;
use crate::entities::{MatchResolution, MatchStatus, Submission};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use matchplay_sdk::objects::Side;
use sqlx::{PgConnection, PgExecutor};
use time::PrimitiveDateTime;

/// A match between two participants at one venue.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MatchRecord {
    pub id: i64,
    pub side_a: i64,
    pub side_b: i64,
    pub venue_id: Option<i64>,
    pub status: MatchStatus,
    pub side_a_ready: bool,
    pub side_b_ready: bool,
    pub side_a_done: bool,
    pub side_b_done: bool,
    pub mismatch: bool,
    pub submission_round: i32,
    pub score_a: Option<i32>,
    pub score_b: Option<i32>,
    pub winner_id: Option<i64>,
    pub resolution: Option<MatchResolution>,
    pub side_a_notified: bool,
    pub side_b_notified: bool,
    pub created_at: PrimitiveDateTime,
    pub scheduled_start: Option<PrimitiveDateTime>,
    pub started_at: Option<PrimitiveDateTime>,
    pub ended_at: Option<PrimitiveDateTime>,
}

/// Final state written when a match completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub score: Option<FinalScore>,
    pub winner_id: Option<i64>,
    pub resolution: MatchResolution,
    pub ended_at: PrimitiveDateTime,
}

impl MatchRecord {
    pub fn participant(&self, side: Side) -> i64 {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    pub fn side_of(&self, participant_id: i64) -> Option<Side> {
        if participant_id == self.side_a {
            Some(Side::A)
        } else if participant_id == self.side_b {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, participant_id: i64) -> Option<i64> {
        self.side_of(participant_id)
            .map(|side| self.participant(side.opposite()))
    }

    pub fn is_ready(&self, side: Side) -> bool {
        match side {
            Side::A => self.side_a_ready,
            Side::B => self.side_b_ready,
        }
    }

    pub fn is_done(&self, side: Side) -> bool {
        match side {
            Side::A => self.side_a_done,
            Side::B => self.side_b_done,
        }
    }

    pub fn is_notified(&self, side: Side) -> bool {
        match side {
            Side::A => self.side_a_notified,
            Side::B => self.side_b_notified,
        }
    }

    /// Splits current-round submissions into side A and side B.
    pub fn submissions_by_side<'a>(
        &self,
        submissions: &'a [Submission],
    ) -> (Option<&'a Submission>, Option<&'a Submission>) {
        let current = |side: Side| {
            let participant_id = self.participant(side);
            submissions
                .iter()
                .filter(|s| s.round == self.submission_round && s.participant_id == participant_id)
                .max_by_key(|s| s.id)
        };
        (current(Side::A), current(Side::B))
    }

    pub fn timeout_facts(&self, claim_a: Option<Claim>, claim_b: Option<Claim>) -> TimeoutFacts {
        TimeoutFacts {
            status: self.status,
            created_at: self.created_at,
            scheduled_start: self.scheduled_start,
            started_at: self.started_at,
            mismatch: self.mismatch,
            claim_a,
            claim_b,
        }
    }

    pub async fn insert_pending(
        conn: &mut PgConnection,
        pairing: Pairing,
        venue_id: i64,
        scheduled_start: PrimitiveDateTime,
        now: PrimitiveDateTime,
    ) -> Result<MatchRecord, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            INSERT INTO matches (side_a, side_b, venue_id, status, created_at, scheduled_start)
            VALUES ($1, $2, $3, 'pending', $4, $5)
            RETURNING id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            "#,
        )
        .bind(pairing.side_a)
        .bind(pairing.side_b)
        .bind(venue_id)
        .bind(now)
        .bind(scheduled_start)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Row-locks the match for the rest of the transaction.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            FROM matches
            WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// The pending or active match of a participant, if any.
    pub async fn find_open_for_participant<'e, E: PgExecutor<'e>>(
        executor: E,
        participant_id: i64,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            FROM matches
            WHERE (side_a = $1 OR side_b = $1) AND status <> 'completed'
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(participant_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn set_ready(
        conn: &mut PgConnection,
        id: i64,
        side: Side,
    ) -> Result<MatchRecord, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            UPDATE matches
            SET side_a_ready = side_a_ready OR $2,
                side_b_ready = side_b_ready OR NOT $2
            WHERE id = $1
            RETURNING id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            "#,
        )
        .bind(id)
        .bind(side == Side::A)
        .fetch_one(conn)
        .await
    }

    /// Moves a pending match to active. Returns `None` if it was not pending.
    pub async fn activate(
        conn: &mut PgConnection,
        id: i64,
        now: PrimitiveDateTime,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            UPDATE matches SET status = 'active', started_at = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(conn)
        .await
    }

    pub async fn set_done(
        conn: &mut PgConnection,
        id: i64,
        side: Side,
    ) -> Result<MatchRecord, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            UPDATE matches
            SET side_a_done = side_a_done OR $2,
                side_b_done = side_b_done OR NOT $2
            WHERE id = $1
            RETURNING id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            "#,
        )
        .bind(id)
        .bind(side == Side::A)
        .fetch_one(conn)
        .await
    }

    pub async fn set_mismatch(
        conn: &mut PgConnection,
        id: i64,
        mismatch: bool,
    ) -> Result<MatchRecord, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            UPDATE matches SET mismatch = $2
            WHERE id = $1
            RETURNING id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            "#,
        )
        .bind(id)
        .bind(mismatch)
        .fetch_one(conn)
        .await
    }

    /// Starts a fresh submission round. Earlier claims stay stored under
    /// their old round number.
    pub async fn open_new_round(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<MatchRecord, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            UPDATE matches
            SET submission_round = submission_round + 1,
                mismatch = FALSE,
                side_a_done = FALSE,
                side_b_done = FALSE
            WHERE id = $1
            RETURNING id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await
    }

    /// Writes the final state. Returns `None` if the match was already
    /// completed.
    pub async fn complete(
        conn: &mut PgConnection,
        id: i64,
        completion: Completion,
    ) -> Result<Option<MatchRecord>, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            UPDATE matches
            SET status = 'completed',
                score_a = $2,
                score_b = $3,
                winner_id = $4,
                resolution = $5,
                ended_at = $6,
                started_at = COALESCE(started_at, $6)
            WHERE id = $1 AND status <> 'completed'
            RETURNING id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            "#,
        )
        .bind(id)
        .bind(completion.score.map(|s| s.score_a))
        .bind(completion.score.map(|s| s.score_b))
        .bind(completion.winner_id)
        .bind(completion.resolution)
        .bind(completion.ended_at)
        .fetch_optional(conn)
        .await
    }

    /// Flags the reminder of one side as sent. Only the first caller gets
    /// `true`.
    pub async fn claim_notification<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        side: Side,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET side_a_notified = side_a_notified OR $2,
                side_b_notified = side_b_notified OR NOT $2
            WHERE id = $1
              AND status = 'pending'
              AND NOT (CASE WHEN $2 THEN side_a_notified ELSE side_b_notified END)
            "#,
        )
        .bind(id)
        .bind(side == Side::A)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[derive(Debug, Clone, Copy)]
/// All pending and active matches, oldest first.
pub struct GetOpenMatches;

impl Processor<GetOpenMatches> for DatabaseProcessor {
    type Output = Vec<MatchRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOpenMatches")]
    async fn process(&self, _cmd: GetOpenMatches) -> Result<Vec<MatchRecord>, sqlx::Error> {
        sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT id, side_a, side_b, venue_id, status, side_a_ready, side_b_ready,
                side_a_done, side_b_done, mismatch, submission_round, score_a, score_b,
                winner_id, resolution, side_a_notified, side_b_notified, created_at,
                scheduled_start, started_at, ended_at
            FROM matches
            WHERE status <> 'completed'
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record() -> MatchRecord {
        MatchRecord {
            id: 7,
            side_a: 10,
            side_b: 20,
            venue_id: Some(1),
            status: MatchStatus::Active,
            side_a_ready: true,
            side_b_ready: false,
            side_a_done: false,
            side_b_done: false,
            mismatch: false,
            submission_round: 1,
            score_a: None,
            score_b: None,
            winner_id: None,
            resolution: None,
            side_a_notified: false,
            side_b_notified: false,
            created_at: datetime!(2024-01-01 12:00),
            scheduled_start: Some(datetime!(2024-01-01 12:03)),
            started_at: Some(datetime!(2024-01-01 12:04)),
            ended_at: None,
        }
    }

    fn submission(id: i64, participant_id: i64, round: i32, score_for: i32) -> Submission {
        Submission {
            id,
            match_id: 7,
            participant_id,
            round,
            score_for,
            score_against: 5,
            submitted_at: datetime!(2024-01-01 12:20),
        }
    }

    #[test]
    fn test_sides() {
        let m = record();
        assert_eq!(m.side_of(10), Some(Side::A));
        assert_eq!(m.side_of(20), Some(Side::B));
        assert_eq!(m.side_of(30), None);
        assert_eq!(m.opponent_of(20), Some(10));
        assert_eq!(m.opponent_of(30), None);
        assert!(m.is_ready(Side::A));
        assert!(!m.is_ready(Side::B));
    }

    #[test]
    fn test_submissions_by_side_uses_current_round() {
        let m = record();
        let subs = vec![
            submission(1, 10, 0, 11),
            submission(2, 20, 0, 11),
            submission(3, 20, 1, 9),
        ];
        let (a, b) = m.submissions_by_side(&subs);
        assert!(a.is_none());
        assert_eq!(b.map(|s| s.score_for), Some(9));
    }
}
