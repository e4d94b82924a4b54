use crate::config::MatchPolicy;
use crate::engine::rating::apply_result;
use crate::engine::reconciliation::FinalScore;
use crate::entities::match_record::Completion;
use crate::entities::participant::ResultRecord;
use crate::entities::{MatchRecord, MatchResolution, Participant, RatingHistoryRecord};
use crate::error::{MatchError, on_unique_violation};
use matchplay_sdk::objects::Side;
use sqlx::PgConnection;
use time::PrimitiveDateTime;
use tracing::info;

/// Completes a match whose row is locked by the caller.
///
/// Writes the final state, applies the rating change for rated resolutions
/// and returns both participants to `no_match`. The status guard on the
/// update makes a second call fail with `StaleState`.
pub(super) async fn complete_tx(
    conn: &mut PgConnection,
    record: &MatchRecord,
    score: Option<FinalScore>,
    resolution: MatchResolution,
    policy: &MatchPolicy,
    now: PrimitiveDateTime,
) -> Result<MatchRecord, MatchError> {
    let rated = match score {
        Some(score) if resolution.is_rated() => Some(score),
        _ => None,
    };
    let winner_id = rated
        .and_then(|score| score.outcome().winner())
        .map(|side| record.participant(side));

    let completed = MatchRecord::complete(
        &mut *conn,
        record.id,
        Completion {
            score,
            winner_id,
            resolution,
            ended_at: now,
        },
    )
    .await?
    .ok_or_else(|| {
        MatchError::StaleState(format!("match {} was completed concurrently", record.id))
    })?;

    let mut ids = [record.side_a, record.side_b];
    ids.sort_unstable();
    let participants = Participant::lock_many(&mut *conn, &ids).await?;

    if let Some(score) = rated {
        let rating_of = |id: i64| {
            participants
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.rating)
                .ok_or_else(|| MatchError::participant_not_found(id))
        };
        let rating_a = rating_of(record.side_a)?;
        let rating_b = rating_of(record.side_b)?;
        let outcome = score.outcome();
        let update = apply_result(rating_a, rating_b, outcome, policy.k_factor);

        for side in [Side::A, Side::B] {
            let participant_id = record.participant(side);
            let winner = outcome.winner();
            let result = ResultRecord {
                rating_after: update.for_side(side),
                won: winner == Some(side),
                lost: winner == Some(side.opposite()),
            };
            Participant::record_result(&mut *conn, participant_id, result).await?;
            RatingHistoryRecord::insert(
                &mut *conn,
                participant_id,
                record.id,
                result.rating_after,
                now,
            )
            .await
            .map_err(|e| {
                on_unique_violation(
                    e,
                    MatchError::StaleState(format!("match {} was already rated", record.id)),
                )
            })?;
        }

        info!(
            match_id = record.id,
            rating_a_before = rating_a,
            rating_b_before = rating_b,
            rating_a_after = update.rating_a,
            rating_b_after = update.rating_b,
            "Ratings updated"
        );
    }

    Participant::leave_match(&mut *conn, &ids).await?;

    info!(
        match_id = record.id,
        resolution = ?resolution,
        winner_id = ?winner_id,
        score_a = ?completed.score_a,
        score_b = ?completed.score_b,
        "Match completed"
    );

    Ok(completed)
}
