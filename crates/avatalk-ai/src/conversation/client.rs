//! ConversationClient: initialize once, then message in, reply out.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use avatalk_common::BusyGuard;
use tracing::{debug, info, warn};

use crate::poll::PollPolicy;
use crate::{AiError, AssistantApi, AssistantId, AssistantSpec, MessageRole, RunStatus, ThreadId};

/// Returned when the newest thread message carries no text.
pub const NO_RESPONSE: &str = "No response";

struct Handles {
    assistant: AssistantId,
    thread: ThreadId,
}

pub struct ConversationClient {
    api: Arc<dyn AssistantApi>,
    spec: AssistantSpec,
    policy: PollPolicy,
    handles: Option<Handles>,
    busy: AtomicBool,
}

impl ConversationClient {
    pub fn new(api: Arc<dyn AssistantApi>, spec: AssistantSpec) -> Self {
        Self {
            api,
            spec,
            policy: PollPolicy::default(),
            handles: None,
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create the remote assistant and thread.
    ///
    /// Calling this on an initialized client makes no remote calls.
    pub async fn initialize(&mut self) -> Result<(), AiError> {
        if self.handles.is_some() {
            debug!("conversation already initialized");
            return Ok(());
        }

        let assistant = self.api.create_assistant(&self.spec).await?;
        let thread = self.api.create_thread().await?;

        info!(assistant = %assistant, thread = %thread, "assistant initialized");
        self.handles = Some(Handles { assistant, thread });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.handles.is_some()
    }

    pub fn assistant_id(&self) -> Option<&AssistantId> {
        self.handles.as_ref().map(|h| &h.assistant)
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.handles.as_ref().map(|h| &h.thread)
    }

    /// Post `text` as a user turn, wait for the run, and return the reply.
    pub async fn send_message(&self, text: &str) -> Result<String, AiError> {
        let handles = self.handles.as_ref().ok_or(AiError::NotInitialized)?;
        let _guard = BusyGuard::try_acquire(&self.busy).ok_or(AiError::Busy)?;

        self.api
            .create_message(&handles.thread, MessageRole::User, text)
            .await?;
        let run = self
            .api
            .create_run(&handles.thread, &handles.assistant)
            .await?;

        let api = &self.api;
        let thread = &handles.thread;
        let run_ref = &run;
        let (status, attempts) = self
            .policy
            .poll_until(|| async move {
                let status = api.retrieve_run(thread, run_ref).await?;
                Ok((!status.is_pending()).then_some(status))
            })
            .await?;

        debug!(run = %run, status = status.as_str(), attempts, "run finished");
        if status != RunStatus::Completed {
            warn!(run = %run, status = status.as_str(), "run did not complete");
            return Err(AiError::RunFailed(status));
        }

        let messages = self.api.list_messages(&handles.thread).await?;
        let reply = messages
            .first()
            .and_then(|m| m.first_text())
            .unwrap_or(NO_RESPONSE)
            .to_string();
        Ok(reply)
    }
}
