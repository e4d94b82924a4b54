use sqlx::PgPool;

/// Runs plain database commands (`kanau::processor::Processor` impls in
/// [`crate::entities`]) against a connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

/// SQLSTATE codes the core reacts to.
pub mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const SERIALIZATION_FAILURE: &str = "40001";
    pub const DEADLOCK_DETECTED: &str = "40P01";
}

/// Returns the SQLSTATE of a database-originated error.
pub fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// True when PostgreSQL aborted the transaction because of a concurrent one.
/// Such a transaction can be retried from the start.
pub fn is_transient_conflict(err: &sqlx::Error) -> bool {
    matches!(
        sqlstate(err).as_deref(),
        Some(sqlstate::SERIALIZATION_FAILURE) | Some(sqlstate::DEADLOCK_DETECTED)
    )
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(sqlstate::UNIQUE_VIOLATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_have_no_sqlstate() {
        let err = sqlx::Error::RowNotFound;
        assert_eq!(sqlstate(&err), None);
        assert!(!is_transient_conflict(&err));
        assert!(!is_unique_violation(&err));
    }
}
