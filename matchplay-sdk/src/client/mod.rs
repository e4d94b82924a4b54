//! HTTP clients for the Matchplay API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod admin;
mod participant;

pub use admin::AdminClient;
pub use participant::ParticipantClient;

use reqwest::StatusCode;

use crate::objects::ErrorBody;

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// The machine-readable error kind sent by the server, if any.
    ///
    /// Useful for retry decisions: `stale_state` means re-read status and
    /// try again.
    pub fn api_kind(&self) -> Option<String> {
        match self {
            ClientError::Api { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .map(|b| b.error),
            _ => None,
        }
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_kind_extraction() {
        let err = ClientError::Api {
            status: StatusCode::CONFLICT,
            body: r#"{"error":"stale_state","message":"match is no longer active"}"#.to_string(),
        };
        assert_eq!(err.api_kind().as_deref(), Some("stale_state"));

        let err = ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(err.api_kind(), None);
    }
}
