use axum::{Json, http::StatusCode, response::IntoResponse};
use matchplay_core::MatchError;
use matchplay_sdk::objects::ErrorBody;

/// Errors returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A controller operation failed.
    Match(MatchError),
    /// A plain query failed.
    Database(sqlx::Error),
    /// The request is well-formed but its content is not acceptable.
    Validation(String),
    /// A uniquely named resource already exists.
    Conflict(String),
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        ApiError::Match(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err)
    }
}

fn status_of(err: &MatchError) -> StatusCode {
    match err {
        MatchError::NotFound { .. } => StatusCode::NOT_FOUND,
        MatchError::AlreadyInMatch(_)
        | MatchError::DuplicateSubmission { .. }
        | MatchError::StaleState(_) => StatusCode::CONFLICT,
        MatchError::NoVenueAvailable => StatusCode::SERVICE_UNAVAILABLE,
        MatchError::InvalidTieScore(_)
        | MatchError::InvalidScore { .. }
        | MatchError::NotParticipant { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MatchError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body(status: StatusCode, error: &str, message: String) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message,
        }),
    )
        .into_response()
}

fn internal() -> axum::response::Response {
    body(
        StatusCode::INTERNAL_SERVER_ERROR,
        "database",
        "internal server error".to_string(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Match(MatchError::Database(e)) | ApiError::Database(e) => {
                tracing::error!(error = %e, "API database error");
                internal()
            }
            ApiError::Match(e) => {
                let status = status_of(&e);
                if status == StatusCode::CONFLICT {
                    tracing::debug!(error = %e, "API request conflicted");
                }
                body(status, e.kind(), e.to_string())
            }
            ApiError::Validation(message) => {
                body(StatusCode::UNPROCESSABLE_ENTITY, "validation", message)
            }
            ApiError::Conflict(message) => body(StatusCode::CONFLICT, "conflict", message),
        }
    }
}
