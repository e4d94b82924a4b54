use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::PgConnection;
use time::PrimitiveDateTime;

/// A participant's rating right after a rated match.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RatingHistoryRecord {
    pub id: i64,
    pub participant_id: i64,
    pub match_id: i64,
    pub rating_after: i32,
    pub recorded_at: PrimitiveDateTime,
}

impl RatingHistoryRecord {
    /// Fails with a unique violation if the match was already recorded for
    /// this participant.
    pub async fn insert(
        conn: &mut PgConnection,
        participant_id: i64,
        match_id: i64,
        rating_after: i32,
        now: PrimitiveDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO rating_history (participant_id, match_id, rating_after, recorded_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(participant_id)
        .bind(match_id)
        .bind(rating_after)
        .bind(now)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetRatingHistory {
    pub participant_id: i64,
}

impl Processor<GetRatingHistory> for DatabaseProcessor {
    type Output = Vec<RatingHistoryRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRatingHistory")]
    async fn process(&self, query: GetRatingHistory) -> Result<Vec<RatingHistoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, RatingHistoryRecord>(
            r#"
            SELECT id, participant_id, match_id, rating_after, recorded_at
            FROM rating_history
            WHERE participant_id = $1
            ORDER BY recorded_at, id
            "#,
        )
        .bind(query.participant_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetRatingHistoryForMatch {
    pub match_id: i64,
}

impl Processor<GetRatingHistoryForMatch> for DatabaseProcessor {
    type Output = Vec<RatingHistoryRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRatingHistoryForMatch")]
    async fn process(
        &self,
        query: GetRatingHistoryForMatch,
    ) -> Result<Vec<RatingHistoryRecord>, sqlx::Error> {
        sqlx::query_as::<_, RatingHistoryRecord>(
            r#"
            SELECT id, participant_id, match_id, rating_after, recorded_at
            FROM rating_history
            WHERE match_id = $1
            ORDER BY participant_id
            "#,
        )
        .bind(query.match_id)
        .fetch_all(&self.pool)
        .await
    }
}
