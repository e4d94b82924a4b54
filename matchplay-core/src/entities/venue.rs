use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::{PgConnection, PgExecutor};
use time::PrimitiveDateTime;

/// A place where one match can be played at a time.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Venue {
    pub id: i64,
    pub label: String,
    pub created_at: PrimitiveDateTime,
}

impl Venue {
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<Venue>, sqlx::Error> {
        sqlx::query_as::<_, Venue>("SELECT id, label, created_at FROM venues WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Ids of venues not held by a pending or active match, ascending.
    pub async fn free_ids(conn: &mut PgConnection) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT v.id
            FROM venues v
            WHERE NOT EXISTS (
                SELECT 1 FROM matches m
                WHERE m.venue_id = v.id AND m.status <> 'completed'
            )
            ORDER BY v.id
            "#,
        )
        .fetch_all(conn)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct CreateVenue {
    pub label: String,
}

impl Processor<CreateVenue> for DatabaseProcessor {
    type Output = Venue;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateVenue")]
    async fn process(&self, insert: CreateVenue) -> Result<Venue, sqlx::Error> {
        sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (label) VALUES ($1) RETURNING id, label, created_at",
        )
        .bind(insert.label)
        .fetch_one(&self.pool)
        .await
    }
}
