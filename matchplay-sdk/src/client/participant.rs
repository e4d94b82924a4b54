//! Participant API client (team frontend → Matchplay server).

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::{
    LeaderboardEntry, MatchDetailResponse, NotificationResponse, RatingHistoryEntry, ReadyRequest, ReadyResponse, Side, StatusResponse,
    SubmitScoreRequest, SubmitScoreResponse, ToggleResponse,
};

/// Typed HTTP client for the participant and match routes.
///
/// One instance is bound to a single participant; match calls pass the side
/// the participant plays on, as reported by [`status`](Self::status).
#[derive(Debug, Clone)]
pub struct ParticipantClient {
    http: Client,
    base_url: Url,
    participant_id: i64,
}

impl ParticipantClient {
    /// Create a new `ParticipantClient`.
    pub fn new(base_url: Url, participant_id: i64) -> Self {
        Self {
            http: Client::new(),
            base_url,
            participant_id,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/v1/participants/{id}/toggle` – join or leave the queue.
    pub async fn toggle(&self) -> Result<ToggleResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/participants/{}/toggle",
            self.participant_id
        ))?;
        let resp = self.http.post(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/participants/{id}/status` – poll the current status.
    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/participants/{}/status",
            self.participant_id
        ))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/participants/{id}/notifications` – upcoming-match reminder.
    pub async fn notifications(&self) -> Result<NotificationResponse, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/participants/{}/notifications",
            self.participant_id
        ))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    pub async fn rating_history(&self) -> Result<Vec<RatingHistoryEntry>, ClientError> {
        let url = self.base_url.join(&format!(
            "/api/v1/participants/{}/rating-history",
            self.participant_id
        ))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/matches/{match_id}/ready`
    pub async fn ready(&self, match_id: i64, side: Side) -> Result<ReadyResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/matches/{match_id}/ready"))?;
        let resp = self
            .http
            .post(url)
            .json(&ReadyRequest { side })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/matches/{match_id}/score` – submit this side's result.
    pub async fn submit_score(
        &self,
        match_id: i64,
        side: Side,
        score_for: i32,
        score_against: i32,
    ) -> Result<SubmitScoreResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/matches/{match_id}/score"))?;
        let resp = self
            .http
            .post(url)
            .json(&SubmitScoreRequest {
                side,
                score_for,
                score_against,
            })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/matches/{match_id}` – match view with every stored claim.
    pub async fn match_details(&self, match_id: i64) -> Result<MatchDetailResponse, ClientError> {
        let url = self.base_url.join(&format!("/api/v1/matches/{match_id}"))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/leaderboard?limit={limit}`
    pub async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, ClientError> {
        let mut url = self.base_url.join("/api/v1/leaderboard")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}
