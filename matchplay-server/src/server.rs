//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::router())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use matchplay_core::config::MatchPolicy;
    use matchplay_sdk::objects::ErrorBody;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// Router over a pool that never connects. Only routes that fail before
    /// touching the database can be exercised.
    fn router() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://matchplay@localhost/matchplay_test")
            .unwrap();
        build_router(AppState::new(pool, MatchPolicy::default()))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_leaderboard_limit_is_validated() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/leaderboard?limit=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "validation");
    }

    #[tokio::test]
    async fn test_blank_participant_name_is_rejected() {
        let (status, _) = send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/admin/participants")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"   "}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_side_is_rejected_before_the_database() {
        let (status, _) = send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/matches/1/ready")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"side":"c"}"#))
                .unwrap(),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let (status, _) = send(
            Request::builder()
                .uri("/api/v1/participants/abc/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
