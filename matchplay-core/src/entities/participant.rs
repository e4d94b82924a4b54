use crate::engine::pairing::QueueEntry;
use crate::entities::ParticipantStatus;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::{PgConnection, PgExecutor};
use time::PrimitiveDateTime;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub rating: i32,
    pub wins: i32,
    pub losses: i32,
    pub plays: i32,
    pub is_available: bool,
    pub status: ParticipantStatus,
    pub searching_since: Option<PrimitiveDateTime>,
    pub created_at: PrimitiveDateTime,
}

/// Counter changes for one participant after a rated match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRecord {
    pub rating_after: i32,
    pub won: bool,
    pub lost: bool,
}

impl Participant {
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<Participant>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, name, rating, wins, losses, plays, is_available, status,
                searching_since, created_at
            FROM participants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Row-locks the participant for the rest of the transaction.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<Participant>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, name, rating, wins, losses, plays, is_available, status,
                searching_since, created_at
            FROM participants
            WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Row-locks several participants in ascending id order.
    pub async fn lock_many(
        conn: &mut PgConnection,
        ids: &[i64],
    ) -> Result<Vec<Participant>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, name, rating, wins, losses, plays, is_available, status,
                searching_since, created_at
            FROM participants
            WHERE id = ANY($1)
            ORDER BY id FOR UPDATE
            "#,
        )
        .bind(ids)
        .fetch_all(conn)
        .await
    }

    pub async fn start_searching(
        conn: &mut PgConnection,
        id: i64,
        now: PrimitiveDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE participants
            SET status = 'searching', is_available = TRUE, searching_since = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn stop_searching(conn: &mut PgConnection, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE participants
            SET status = 'no_match', is_available = FALSE, searching_since = NULL
            WHERE id = $1 AND status = 'searching'
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Locks and returns the head of the queue.
    ///
    /// Only searching, available participants without an open match are
    /// eligible. At most `limit` rows are returned, oldest first.
    pub async fn lock_queue_head(
        conn: &mut PgConnection,
        limit: i64,
    ) -> Result<Vec<QueueEntry>, sqlx::Error> {
        let rows: Vec<(i64, PrimitiveDateTime)> = sqlx::query_as(
            r#"
            SELECT p.id, p.searching_since
            FROM participants p
            WHERE p.status = 'searching'
              AND p.is_available
              AND p.searching_since IS NOT NULL
              AND NOT EXISTS (
                  SELECT 1 FROM matches m
                  WHERE (m.side_a = p.id OR m.side_b = p.id)
                    AND m.status <> 'completed'
              )
            ORDER BY p.searching_since, p.id
            LIMIT $1
            FOR UPDATE OF p
            "#,
        )
        .bind(limit)
        .fetch_all(conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(participant_id, searching_since)| QueueEntry {
                participant_id,
                searching_since,
            })
            .collect())
    }

    /// Moves searching participants into a match. Returns the number of rows
    /// that were still searching.
    pub async fn enter_match(conn: &mut PgConnection, ids: &[i64]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET status = 'in_match', is_available = FALSE, searching_since = NULL
            WHERE id = ANY($1) AND status = 'searching'
            "#,
        )
        .bind(ids)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Returns participants to `no_match` once their match is over.
    pub async fn leave_match(conn: &mut PgConnection, ids: &[i64]) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE participants
            SET status = 'no_match', is_available = FALSE, searching_since = NULL
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn record_result(
        conn: &mut PgConnection,
        id: i64,
        result: ResultRecord,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE participants
            SET rating = $2,
                plays = plays + 1,
                wins = wins + $3,
                losses = losses + $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(result.rating_after)
        .bind(i32::from(result.won))
        .bind(i32::from(result.lost))
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Register a new participant with the default rating.
pub struct CreateParticipant {
    pub name: String,
}

impl Processor<CreateParticipant> for DatabaseProcessor {
    type Output = Participant;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateParticipant")]
    async fn process(&self, insert: CreateParticipant) -> Result<Participant, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (name)
            VALUES ($1)
            RETURNING id, name, rating, wins, losses, plays, is_available, status,
                searching_since, created_at
            "#,
        )
        .bind(insert.name)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetParticipantById {
    pub participant_id: i64,
}

impl Processor<GetParticipantById> for DatabaseProcessor {
    type Output = Option<Participant>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetParticipantById")]
    async fn process(&self, query: GetParticipantById) -> Result<Option<Participant>, sqlx::Error> {
        Participant::find_by_id(&self.pool, query.participant_id).await
    }
}

#[derive(Debug, Clone)]
/// Participants ordered by rating, best first. Equal ratings are ordered by
/// wins, then by id.
pub struct GetLeaderboard {
    pub limit: i64,
}

impl Processor<GetLeaderboard> for DatabaseProcessor {
    type Output = Vec<Participant>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetLeaderboard")]
    async fn process(&self, query: GetLeaderboard) -> Result<Vec<Participant>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT id, name, rating, wins, losses, plays, is_available, status,
                searching_since, created_at
            FROM participants
            ORDER BY rating DESC, wins DESC, id
            LIMIT $1
            "#,
        )
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await
    }
}
