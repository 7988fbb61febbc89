use super::messages::{AuthRequest, AuthResponse};
use crate::error::AuthError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Exchanges a publish stream key for a manifest id
#[async_trait::async_trait]
pub trait StreamKeyAuthenticator: Send + Sync {
    async fn authenticate(&self, stream_key: &str) -> Result<String, AuthError>;
}

/// HTTP client for the external auth endpoint
///
/// One request per publish attempt, no retries.
pub struct AuthClient {
    client: Client,
    url: String,
}

impl AuthClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl StreamKeyAuthenticator for AuthClient {
    async fn authenticate(&self, stream_key: &str) -> Result<String, AuthError> {
        debug!("Authenticating stream key against {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&AuthRequest {
                stream_key: stream_key.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(status.as_u16()));
        }

        let body = response.text().await?;
        let decoded: AuthResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))?;

        info!("Stream key authorized for manifest {}", decoded.manifest_id);

        Ok(decoded.manifest_id)
    }
}
