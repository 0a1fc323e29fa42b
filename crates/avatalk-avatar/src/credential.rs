//! Exchange of the long-lived HeyGen API key for a session token.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::AvatarError;

/// Short-lived token that authorizes one streaming session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self) -> Result<SessionToken, AvatarError>;
}

/// Posts `/v1/streaming.create_token` with the account API key.
pub struct HeygenTokenFetcher {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl fmt::Debug for HeygenTokenFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeygenTokenFetcher")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HeygenTokenFetcher {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, AvatarError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(request_timeout)
            .build()
            .map_err(|e| AvatarError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl TokenSource for HeygenTokenFetcher {
    async fn fetch(&self) -> Result<SessionToken, AvatarError> {
        let url = format!("{}/v1/streaming.create_token", self.base_url);
        debug!(%url, "requesting streaming token");

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AvatarError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AvatarError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AvatarError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AvatarError::ParseError(e.to_string()))?;
        let token = parse_token(&json)?;
        info!("streaming token issued");
        Ok(token)
    }
}

pub(crate) fn parse_token(json: &serde_json::Value) -> Result<SessionToken, AvatarError> {
    json["data"]["token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(SessionToken::new)
        .ok_or_else(|| AvatarError::ParseError("no 'data.token' in token response".into()))
}
