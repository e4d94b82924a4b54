use crate::engine::reconciliation::Claim;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::{PgConnection, PgExecutor};
use time::PrimitiveDateTime;

/// One side's claimed score for one round of a match.
///
/// Rows are keyed by `(match_id, participant_id, round)`. Resetting a match
/// opens a new round, so earlier claims stay on record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Submission {
    pub id: i64,
    pub match_id: i64,
    pub participant_id: i64,
    pub round: i32,
    pub score_for: i32,
    pub score_against: i32,
    pub submitted_at: PrimitiveDateTime,
}

impl Submission {
    pub fn claim(&self) -> Claim {
        Claim::new(self.score_for, self.score_against)
    }

    /// Stores a claim, replacing an earlier claim of the same round.
    pub async fn upsert(
        conn: &mut PgConnection,
        match_id: i64,
        participant_id: i64,
        round: i32,
        claim: Claim,
        now: PrimitiveDateTime,
    ) -> Result<Submission, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (match_id, participant_id, round, score_for,
                score_against, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (match_id, participant_id, round) DO UPDATE
            SET score_for = EXCLUDED.score_for,
                score_against = EXCLUDED.score_against,
                submitted_at = EXCLUDED.submitted_at
            RETURNING id, match_id, participant_id, round, score_for, score_against,
                submitted_at
            "#,
        )
        .bind(match_id)
        .bind(participant_id)
        .bind(round)
        .bind(claim.score_for)
        .bind(claim.score_against)
        .bind(now)
        .fetch_one(conn)
        .await
    }

    pub async fn for_round<'e, E: PgExecutor<'e>>(
        executor: E,
        match_id: i64,
        round: i32,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, match_id, participant_id, round, score_for, score_against,
                submitted_at
            FROM submissions
            WHERE match_id = $1 AND round = $2
            ORDER BY id
            "#,
        )
        .bind(match_id)
        .bind(round)
        .fetch_all(executor)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
/// Every submission of a match across all rounds, oldest first.
pub struct GetSubmissionsForMatch {
    pub match_id: i64,
}

impl Processor<GetSubmissionsForMatch> for DatabaseProcessor {
    type Output = Vec<Submission>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetSubmissionsForMatch")]
    async fn process(&self, query: GetSubmissionsForMatch) -> Result<Vec<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, match_id, participant_id, round, score_for, score_against,
                submitted_at
            FROM submissions
            WHERE match_id = $1
            ORDER BY round, id
            "#,
        )
        .bind(query.match_id)
        .fetch_all(&self.pool)
        .await
    }
}
