//! Streaming-avatar integration for avatalk.
//!
//! - `AvatarSdk`: the provider operations one streaming session needs
//! - `HeygenClient`: implementation over the HeyGen streaming REST API
//! - `HeygenTokenFetcher`: API key to short-lived session token
//! - `AvatarSessionController`: open / speak / voice chat / close, with
//!   stream events bound to a `PlaybackSink`

pub mod controller;
pub mod credential;
pub mod heygen;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use avatalk_common::AvatarQuality;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub use controller::{
    AvatarSession, AvatarSessionController, MemorySink, PlaybackSink, SessionSignal, SessionState,
};
pub use credential::{HeygenTokenFetcher, SessionToken, TokenSource};
pub use heygen::{HeygenClient, HeygenConfig, HeygenConnector};

/// One streaming avatar bound to a session token.
#[async_trait]
pub trait AvatarSdk: Send + Sync {
    /// Stream lifecycle events. Subscribe before `create_start_avatar`
    /// so the ready event cannot be missed.
    fn subscribe(&self) -> broadcast::Receiver<StreamEvent>;

    async fn create_start_avatar(&self, request: &StartAvatarRequest) -> Result<SessionInfo, AvatarError>;

    async fn speak(&self, request: &SpeakRequest) -> Result<(), AvatarError>;

    async fn start_voice_chat(&self, request: &VoiceChatRequest) -> Result<(), AvatarError>;

    async fn stop_voice_chat(&self, session_id: &str) -> Result<(), AvatarError>;

    async fn stop_avatar(&self) -> Result<(), AvatarError>;
}

/// Builds an SDK instance for a freshly issued token.
pub trait AvatarConnector: Send + Sync {
    fn connect(&self, token: SessionToken) -> Arc<dyn AvatarSdk>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartAvatarRequest {
    pub avatar_name: String,
    pub quality: AvatarQuality,
    pub voice_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Speak the text verbatim.
    #[default]
    Repeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakRequest {
    pub session_id: String,
    pub text: String,
    pub task_type: TaskType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceChatRequest {
    pub session_id: String,
    /// Capture the microphone.
    pub audio: bool,
}

/// Where the avatar's media is published.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaStream {
    pub url: String,
    pub access_token: String,
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("url", &self.url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Ready(MediaStream),
    Disconnected,
}

#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Session closed by provider: {0}")]
    SessionClosed(String),
    #[error("No open avatar session")]
    NotOpen,
    #[error("Playback error: {0}")]
    Playback(String),
}
