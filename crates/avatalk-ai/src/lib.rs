//! Assistant engine for avatalk.
//!
//! Provides the hosted-assistant seam and the client that hides its
//! asynchronous thread/run protocol:
//! - `AssistantApi`: the six remote operations the conversation needs
//! - `OpenAiAssistants`: implementation over the OpenAI Assistants API
//! - `ConversationClient`: one assistant + one thread, message in, reply out
//! - `PollPolicy`: bounded exponential backoff for run completion

pub mod conversation;
pub mod openai;
pub mod poll;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use conversation::{ConversationClient, NO_RESPONSE};
pub use openai::{OpenAiAssistants, OpenAiConfig};
pub use poll::PollPolicy;

/// The remote operations of a thread/run style assistant provider.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<AssistantId, AiError>;

    async fn create_thread(&self) -> Result<ThreadId, AiError>;

    async fn create_message(
        &self,
        thread: &ThreadId,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AiError>;

    async fn create_run(&self, thread: &ThreadId, assistant: &AssistantId) -> Result<RunId, AiError>;

    async fn retrieve_run(&self, thread: &ThreadId, run: &RunId) -> Result<RunStatus, AiError>;

    /// Messages of the thread, newest first.
    async fn list_messages(&self, thread: &ThreadId) -> Result<Vec<ThreadMessage>, AiError>;
}

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

remote_id!(
    /// Provider id of the configured assistant persona.
    AssistantId
);
remote_id!(
    /// Provider id of a conversation thread.
    ThreadId
);
remote_id!(
    /// Provider id of one processing run on a thread.
    RunId
);

/// Persona used when the assistant is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// The provider is still working on the run.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

/// One message of a thread as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    #[serde(default)]
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Text of the first content block, if that block is non-empty text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first()? {
            MessageContent::Text { text } if !text.value.is_empty() => Some(&text.value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Assistant not initialized; call initialize() first")]
    NotInitialized,
    #[error("Conversation is busy with another message")]
    Busy,
    #[error("Run ended with status {}", .0.as_str())]
    RunFailed(RunStatus),
    #[error("Run still pending after {attempts} checks ({elapsed_ms} ms)")]
    Timeout { attempts: u32, elapsed_ms: u128 },
}
