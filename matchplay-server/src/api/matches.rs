use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use kanau::processor::Processor;
use matchplay_core::controller::{GetMatchView, MarkReady, SubmitScore};
use matchplay_core::entities::submission::GetSubmissionsForMatch;
use matchplay_sdk::objects::{
    MatchDetailResponse, ReadyRequest, ReadyResponse, RoundSubmission, SubmissionView,
    SubmitScoreRequest, SubmitScoreResponse,
};

use super::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matches/{id}", get(get_match))
        .route("/matches/{id}/ready", post(ready))
        .route("/matches/{id}/score", post(submit_score))
}

/// `GET /matches/{id}`
async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<MatchDetailResponse>, ApiError> {
    let details = state.controller().process(GetMatchView { match_id }).await?;
    let submissions = state
        .database()
        .process(GetSubmissionsForMatch { match_id })
        .await?;

    Ok(Json(MatchDetailResponse {
        view: details.to_view(),
        submissions: submissions
            .iter()
            .map(|s| RoundSubmission {
                round: s.round,
                submission: SubmissionView::from(s),
            })
            .collect(),
    }))
}

/// `POST /matches/{id}/ready`
async fn ready(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(request): Json<ReadyRequest>,
) -> Result<Json<ReadyResponse>, ApiError> {
    let outcome = state
        .controller()
        .process(MarkReady {
            match_id,
            side: request.side,
        })
        .await?;
    Ok(Json(ReadyResponse {
        status: outcome.record.status.into(),
        activated: outcome.activated,
    }))
}

/// `POST /matches/{id}/score`
///
/// A disagreement is not an error: it comes back as `mismatch: true`.
async fn submit_score(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let outcome = state
        .controller()
        .process(SubmitScore {
            match_id,
            side: request.side,
            score_for: request.score_for,
            score_against: request.score_against,
        })
        .await?;
    Ok(Json(SubmitScoreResponse {
        completed: outcome.completed,
        mismatch: outcome.mismatch,
    }))
}
