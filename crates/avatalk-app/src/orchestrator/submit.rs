//! Text submission: assistant round-trip or verbatim speech.

use avatalk_common::{new_correlation_id, BusyGuard, Phase, SessionError, SpeakMode, UiEvent};
use tracing::{debug, info, warn};

use super::{errors, Orchestrator};

impl Orchestrator {
    /// Stage `text` and submit it.
    pub async fn submit_text(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.set_input(text);
        self.submit().await
    }

    /// Submit the pending input.
    ///
    /// In assistant mode the reply is spoken; in direct mode the input
    /// itself is. The input is cleared only once the avatar accepted it.
    /// A reply that arrives after its session ended is dropped.
    pub async fn submit(&self) -> Result<(), SessionError> {
        let result = self.submit_pending().await;
        if let Err(e) = &result {
            warn!(error = %e, "submission failed");
            let event = match e {
                SessionError::Busy(_) => UiEvent::warning(e.to_string()),
                _ => UiEvent::error(e.to_string()),
            };
            self.inner.publish(event);
        }
        result
    }

    async fn submit_pending(&self) -> Result<(), SessionError> {
        let inner = &self.inner;
        let _busy = BusyGuard::try_acquire(&inner.submitting).ok_or(SessionError::Busy("submission"))?;

        let (text, session, conversation, generation) = {
            let state = inner.lock();
            let Some(session) = state.session.clone().filter(|_| state.phase == Phase::Active) else {
                return Err(SessionError::NotInitialized("no active avatar session".into()));
            };
            (
                state.pending_input.clone(),
                session,
                state.conversation.clone(),
                state.generation,
            )
        };
        if text.trim().is_empty() {
            debug!("nothing to submit");
            return Ok(());
        }

        let op = new_correlation_id();
        debug!(op = %op, chars = text.chars().count(), mode = ?inner.mode, "submitting");

        let spoken = match inner.mode {
            SpeakMode::Direct => text.clone(),
            SpeakMode::Assistant => {
                let conversation =
                    conversation.ok_or_else(|| SessionError::NotInitialized("assistant".into()))?;
                let reply = conversation
                    .send_message(&text)
                    .await
                    .map_err(errors::assistant_send)?;
                if !inner.is_current(generation) {
                    info!(op = %op, generation = %generation, "reply arrived after session ended, dropping");
                    return Ok(());
                }
                inner.publish(UiEvent::Reply {
                    text: reply.clone(),
                });
                reply
            }
        };

        if !inner.is_current(generation) {
            info!(op = %op, "session ended before speaking, dropping");
            return Ok(());
        }
        inner.avatar.speak(&session, &spoken).await.map_err(errors::speak)?;

        {
            let mut state = inner.lock();
            if state.generation == generation && state.pending_input == text {
                state.pending_input.clear();
            }
        }
        info!(op = %op, "submission spoken");
        Ok(())
    }
}
