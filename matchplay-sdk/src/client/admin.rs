//! Admin API client.

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::MatchView;
use crate::objects::admin::{
    CreateParticipantRequest, CreateVenueRequest, ParticipantResponse, ResolveMatchRequest,
    TimeoutReport, VenueResponse,
};

/// Typed HTTP client for the `/api/v1/admin` routes.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
}

impl AdminClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub async fn create_participant(
        &self,
        name: impl Into<String>,
    ) -> Result<ParticipantResponse, ClientError> {
        let url = self.base_url.join("/api/v1/admin/participants")?;
        let resp = self
            .http
            .post(url)
            .json(&CreateParticipantRequest { name: name.into() })
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn create_venue(
        &self,
        label: impl Into<String>,
    ) -> Result<VenueResponse, ClientError> {
        let url = self.base_url.join("/api/v1/admin/venues")?;
        let resp = self
            .http
            .post(url)
            .json(&CreateVenueRequest {
                label: label.into(),
            })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/admin/matches/{match_id}/resolve` – settle a match with
    /// an authoritative score, typically after a mismatch.
    pub async fn resolve_match(
        &self,
        match_id: i64,
        score_a: i32,
        score_b: i32,
    ) -> Result<MatchView, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/admin/matches/{match_id}/resolve"))?;
        let resp = self
            .http
            .post(url)
            .json(&ResolveMatchRequest { score_a, score_b })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/admin/matches/{match_id}/reset-submissions` – discard
    /// the current round of submissions so both sides can submit again.
    pub async fn reset_submissions(&self, match_id: i64) -> Result<MatchView, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/admin/matches/{match_id}/reset-submissions"))?;
        let resp = self.http.post(url).send().await?;
        parse_response(resp).await
    }

    pub async fn check_timeout(&self, match_id: i64) -> Result<TimeoutReport, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/admin/matches/{match_id}/check-timeout"))?;
        let resp = self.http.post(url).send().await?;
        parse_response(resp).await
    }
}
