use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use kanau::processor::Processor;
use matchplay_core::MatchError;
use matchplay_core::controller::{CheckUpcoming, GetStatus, ToggleAvailability};
use matchplay_core::entities::participant::{GetLeaderboard, GetParticipantById};
use matchplay_core::entities::rating_history::GetRatingHistory;
use matchplay_core::utils::clock::unix_seconds;
use matchplay_sdk::objects::{
    LeaderboardEntry, NotificationResponse, RatingHistoryEntry, StatusResponse, ToggleResponse,
};
use serde::Deserialize;

use super::ApiError;
use crate::state::AppState;

const DEFAULT_LEADERBOARD_LIMIT: i64 = 50;
const MAX_LEADERBOARD_LIMIT: i64 = 500;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants/{id}/toggle", post(toggle))
        .route("/participants/{id}/status", get(status))
        .route("/participants/{id}/notifications", get(notifications))
        .route("/participants/{id}/rating-history", get(rating_history))
        .route("/leaderboard", get(leaderboard))
}

/// `POST /participants/{id}/toggle`
async fn toggle(
    State(state): State<AppState>,
    Path(participant_id): Path<i64>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let outcome = state
        .controller()
        .process(ToggleAvailability { participant_id })
        .await?;
    Ok(Json(ToggleResponse {
        status: outcome.status.into(),
        match_id: outcome.match_id,
    }))
}

/// `GET /participants/{id}/status`
async fn status(
    State(state): State<AppState>,
    Path(participant_id): Path<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    let overview = state
        .controller()
        .process(GetStatus { participant_id })
        .await?;
    Ok(Json(overview.to_response()))
}

/// `GET /participants/{id}/notifications`
///
/// Claims the reminder, so only the first poll inside the window sees
/// `notify: true`.
async fn notifications(
    State(state): State<AppState>,
    Path(participant_id): Path<i64>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let upcoming = state
        .controller()
        .process(CheckUpcoming { participant_id })
        .await?;
    Ok(Json(NotificationResponse {
        notify: upcoming.notify,
        match_id: upcoming.match_id,
        minutes_until: upcoming.minutes_until,
    }))
}

/// `GET /participants/{id}/rating-history`
async fn rating_history(
    State(state): State<AppState>,
    Path(participant_id): Path<i64>,
) -> Result<Json<Vec<RatingHistoryEntry>>, ApiError> {
    let db = state.database();
    db.process(GetParticipantById { participant_id })
        .await?
        .ok_or_else(|| MatchError::participant_not_found(participant_id))?;

    let history = db.process(GetRatingHistory { participant_id }).await?;
    Ok(Json(
        history
            .into_iter()
            .map(|r| RatingHistoryEntry {
                match_id: r.match_id,
                rating_after: r.rating_after,
                recorded_at: unix_seconds(r.recorded_at),
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<i64>,
}

/// `GET /leaderboard?limit=N`
async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    if !(1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_LEADERBOARD_LIMIT}"
        )));
    }

    let participants = state.database().process(GetLeaderboard { limit }).await?;
    Ok(Json(
        participants
            .into_iter()
            .map(|p| LeaderboardEntry {
                participant_id: p.id,
                name: p.name,
                rating: p.rating,
                wins: p.wins,
                losses: p.losses,
                plays: p.plays,
            })
            .collect(),
    ))
}
