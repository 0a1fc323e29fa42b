use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::Phase;

/// Why a session left `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    UserRequested,
    ProviderDisconnected,
    StartFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Events fanned out to whatever front-end is rendering the controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiEvent {
    PhaseChanged(Phase),
    SessionStarted { session_id: String },
    SessionEnded { reason: EndReason },
    StreamReady { url: String },
    StreamCleared,
    Reply { text: String },
    VoiceChat { active: bool },
    Notice { level: NoticeLevel, message: String },
    #[serde(other)]
    Unknown,
}

impl UiEvent {
    pub fn error(message: impl Into<String>) -> Self {
        UiEvent::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        UiEvent::Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<UiEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: UiEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(?event, "no UI subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
