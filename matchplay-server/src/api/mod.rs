//! HTTP API.
//!
//! # Endpoints
//!
//! Participant routes (`participants`):
//! - `POST /participants/{id}/toggle`         – join or leave the queue
//! - `GET  /participants/{id}/status`         – current status and match
//! - `GET  /participants/{id}/notifications`  – upcoming-match reminder
//! - `GET  /participants/{id}/rating-history` – rating after every rated match
//! - `GET  /leaderboard`                      – participants by rating
//!
//! Match routes (`matches`):
//! - `GET  /matches/{id}`       – match view and every stored claim
//! - `POST /matches/{id}/ready` – mark a side ready
//! - `POST /matches/{id}/score` – submit a side's score
//!
//! Admin routes (`admin`), mounted under `/admin`:
//! - `POST /participants`                       – register a participant
//! - `POST /venues`                             – register a venue
//! - `POST /matches/{id}/resolve`               – set the final score
//! - `POST /matches/{id}/reset-submissions`     – discard the current round
//! - `POST /matches/{id}/check-timeout`         – apply the timeout policy now

mod admin;
mod error;
mod matches;
mod participants;

pub use error::ApiError;

use crate::state::AppState;
use axum::Router;

/// Build the API router. Mounted under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(participants::router())
        .merge(matches::router())
        .nest("/admin", admin::router())
}
