use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use kanau::processor::Processor;
use matchplay_core::controller::{
    CheckTimeout, GetMatchView, ResetSubmissions, ResolveMatch, TimeoutOutcome,
};
use matchplay_core::entities::MatchResolution;
use matchplay_core::entities::participant::CreateParticipant;
use matchplay_core::entities::venue::CreateVenue;
use matchplay_core::framework::is_unique_violation;
use matchplay_sdk::objects::MatchView;
use matchplay_sdk::objects::admin::{
    CreateParticipantRequest, CreateVenueRequest, ParticipantResponse, ResolveMatchRequest,
    TimeoutReport, VenueResponse,
};

use super::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants", post(create_participant))
        .route("/venues", post(create_venue))
        .route("/matches/{id}/resolve", post(resolve_match))
        .route("/matches/{id}/reset-submissions", post(reset_submissions))
        .route("/matches/{id}/check-timeout", post(check_timeout))
}

fn non_empty(field: &str, value: String) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// `POST /admin/participants`
async fn create_participant(
    State(state): State<AppState>,
    Json(request): Json<CreateParticipantRequest>,
) -> Result<(StatusCode, Json<ParticipantResponse>), ApiError> {
    let name = non_empty("name", request.name)?;
    let participant = state
        .database()
        .process(CreateParticipant { name: name.clone() })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!("participant {name:?} already exists"))
            } else {
                ApiError::Database(e)
            }
        })?;

    tracing::info!(participant_id = participant.id, "Participant registered");
    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse {
            participant_id: participant.id,
            name: participant.name,
            rating: participant.rating,
        }),
    ))
}

/// `POST /admin/venues`
async fn create_venue(
    State(state): State<AppState>,
    Json(request): Json<CreateVenueRequest>,
) -> Result<(StatusCode, Json<VenueResponse>), ApiError> {
    let label = non_empty("label", request.label)?;
    let venue = state
        .database()
        .process(CreateVenue {
            label: label.clone(),
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(format!("venue {label:?} already exists"))
            } else {
                ApiError::Database(e)
            }
        })?;

    tracing::info!(venue_id = venue.id, "Venue registered");
    Ok((
        StatusCode::CREATED,
        Json(VenueResponse {
            venue_id: venue.id,
            label: venue.label,
        }),
    ))
}

async fn match_view(state: &AppState, match_id: i64) -> Result<MatchView, ApiError> {
    let details = state.controller().process(GetMatchView { match_id }).await?;
    Ok(details.to_view())
}

/// `POST /admin/matches/{id}/resolve`
async fn resolve_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
    Json(request): Json<ResolveMatchRequest>,
) -> Result<Json<MatchView>, ApiError> {
    state
        .controller()
        .process(ResolveMatch {
            match_id,
            score_a: request.score_a,
            score_b: request.score_b,
        })
        .await?;
    Ok(Json(match_view(&state, match_id).await?))
}

/// `POST /admin/matches/{id}/reset-submissions`
async fn reset_submissions(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<MatchView>, ApiError> {
    state
        .controller()
        .process(ResetSubmissions { match_id })
        .await?;
    Ok(Json(match_view(&state, match_id).await?))
}

/// `POST /admin/matches/{id}/check-timeout`
async fn check_timeout(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<TimeoutReport>, ApiError> {
    let outcome = state
        .controller()
        .process(CheckTimeout { match_id })
        .await?;
    Ok(Json(to_report(&outcome)))
}

fn to_report(outcome: &TimeoutOutcome) -> TimeoutReport {
    match outcome {
        TimeoutOutcome::NotDue => TimeoutReport::NotDue,
        TimeoutOutcome::AlreadyCompleted => TimeoutReport::AlreadyCompleted,
        TimeoutOutcome::AutoStarted(_) => TimeoutReport::AutoStarted,
        TimeoutOutcome::Completed(record) => match record.resolution {
            Some(MatchResolution::Forfeit) => TimeoutReport::Forfeited {
                winner_id: record.winner_id,
            },
            Some(MatchResolution::Agreed | MatchResolution::Admin) => TimeoutReport::Settled {
                winner_id: record.winner_id,
            },
            Some(MatchResolution::Void) | None => TimeoutReport::Voided,
        },
    }
}
