//! HeyGen client struct, request plumbing, and response parsing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::credential::SessionToken;
use crate::{AvatarConnector, AvatarError, AvatarSdk, MediaStream, SessionInfo, StreamEvent};

use super::config::HeygenConfig;

const EVENT_CAPACITY: usize = 16;

/// One streaming avatar, authorized by a session token.
pub struct HeygenClient {
    pub(crate) config: HeygenConfig,
    token: SessionToken,
    pub(crate) http: reqwest::Client,
    events: broadcast::Sender<StreamEvent>,
    /// Id of the live provider session, if any.
    session: Mutex<Option<String>>,
}

impl HeygenClient {
    pub fn new(config: HeygenConfig, token: SessionToken) -> Result<Self, AvatarError> {
        let http = build_http(config.request_timeout)?;
        Ok(Self::with_http(config, token, http))
    }

    pub fn with_http(config: HeygenConfig, token: SessionToken, http: reqwest::Client) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            token,
            http,
            events,
            session: Mutex::new(None),
        }
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}/v1/{}", self.config.base_url, endpoint)
    }

    pub(crate) fn headers(&self) -> Result<HeaderMap, AvatarError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token.as_str()))
            .map_err(|_| AvatarError::ApiError("session token contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub(crate) fn subscribe_events(&self) -> broadcast::Receiver<StreamEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: StreamEvent) {
        if self.events.send(event).is_err() {
            debug!("stream event dropped, no subscribers");
        }
    }

    pub(crate) fn session_id(&self) -> Option<String> {
        self.session.lock().ok().and_then(|s| s.clone())
    }

    pub(crate) fn set_session(&self, id: Option<String>) -> Option<String> {
        match self.session.lock() {
            Ok(mut slot) => std::mem::replace(&mut *slot, id),
            Err(_) => None,
        }
    }

    /// Forget the live session and tell subscribers it is gone.
    pub(crate) fn mark_disconnected(&self) {
        if let Some(id) = self.set_session(None) {
            info!(session = %id, "avatar stream disconnected");
            self.emit(StreamEvent::Disconnected);
        }
    }

    /// POST a JSON body to a streaming endpoint and decode the reply.
    pub(crate) async fn post(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, AvatarError> {
        let response = self
            .http
            .post(self.url(endpoint))
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| AvatarError::NetworkError(e.to_string()))?;

        let status = response.status();
        if session_gone(status) {
            self.mark_disconnected();
            return Err(AvatarError::SessionClosed(format!("{endpoint}: HTTP {status}")));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
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
        check_error_field(&json)?;
        debug!(endpoint, "HeyGen response decoded");
        Ok(json)
    }
}

pub(crate) fn build_http(request_timeout: Duration) -> Result<reqwest::Client, AvatarError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(request_timeout)
        .build()
        .map_err(|e| AvatarError::NetworkError(format!("failed to build HTTP client: {e}")))
}

/// The provider answers 404 or 410 once a session has been torn down.
pub(crate) fn session_gone(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::GONE
}

/// Successful HTTP responses may still carry `{ "error": {...} }`.
pub(crate) fn check_error_field(json: &serde_json::Value) -> Result<(), AvatarError> {
    match json.get("error") {
        None | Some(serde_json::Value::Null) => Ok(()),
        Some(err) => {
            let message = err["message"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| err.to_string());
            Err(AvatarError::ApiError(message))
        }
    }
}

/// Read the session descriptor and media room from `streaming.new`.
pub(crate) fn parse_new_session(
    json: &serde_json::Value,
) -> Result<(SessionInfo, MediaStream), AvatarError> {
    let data = &json["data"];
    let field = |name: &str| {
        data[name]
            .as_str()
            .filter(|v| !v.is_empty())
            .map(String::from)
            .ok_or_else(|| AvatarError::ParseError(format!("no 'data.{name}' in streaming.new response")))
    };
    let info = SessionInfo {
        session_id: field("session_id")?,
    };
    let stream = MediaStream {
        url: field("url")?,
        access_token: field("access_token")?,
    };
    Ok((info, stream))
}

/// Builds a `HeygenClient` per session token, sharing one HTTP pool.
#[derive(Clone)]
pub struct HeygenConnector {
    config: HeygenConfig,
    http: reqwest::Client,
}

impl HeygenConnector {
    pub fn new(config: HeygenConfig) -> Result<Self, AvatarError> {
        let http = build_http(config.request_timeout)?;
        Ok(Self { config, http })
    }
}

impl AvatarConnector for HeygenConnector {
    fn connect(&self, token: SessionToken) -> Arc<dyn AvatarSdk> {
        Arc::new(HeygenClient::with_http(self.config.clone(), token, self.http.clone()))
    }
}
