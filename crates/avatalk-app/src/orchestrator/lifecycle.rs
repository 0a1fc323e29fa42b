//! Session start, user-requested end, and provider-initiated disconnect.

use std::sync::Arc;

use avatalk_ai::ConversationClient;
use avatalk_avatar::SessionSignal;
use avatalk_common::{
    new_correlation_id, EndReason, NoticeLevel, Phase, SessionError, SessionGeneration, SpeakMode,
    UiEvent,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{errors, Inner, Orchestrator};

// =============================================================================
// START
// =============================================================================

impl Orchestrator {
    /// Open an avatar session and, in assistant mode, a conversation.
    ///
    /// No-op outside `Idle`. On failure everything acquired so far is
    /// released, the error is reported, and the phase returns to `Idle`.
    pub async fn start(&self) -> Result<(), SessionError> {
        let inner = &self.inner;
        let generation = {
            let mut state = inner.lock();
            if state.phase != Phase::Idle || state.closing {
                debug!(phase = %state.phase, closing = state.closing, "start ignored");
                return Ok(());
            }
            state.generation = state.generation.next();
            state.stream_url = None;
            inner.set_phase(&mut state, Phase::Starting);
            state.generation
        };

        let op = new_correlation_id();
        info!(op = %op, generation = %generation, mode = ?inner.mode, "starting session");

        match self.acquire(generation).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(op = %op, error = %e, "session start failed");
                {
                    let mut state = inner.lock();
                    if state.generation == generation {
                        inner.set_phase(&mut state, Phase::Idle);
                    }
                }
                inner.publish(UiEvent::SessionEnded {
                    reason: EndReason::StartFailed,
                });
                inner.publish(UiEvent::error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn acquire(&self, generation: SessionGeneration) -> Result<(), SessionError> {
        let inner = &self.inner;
        let token = inner.tokens.fetch().await.map_err(errors::credential)?;
        let (session, signals) = inner.avatar.open(token).await.map_err(errors::avatar_open)?;

        let conversation = match inner.mode {
            SpeakMode::Direct => None,
            SpeakMode::Assistant => match self.open_conversation().await {
                Ok(conversation) => Some(Arc::new(conversation)),
                Err(e) => {
                    inner.avatar.close(&session, false).await;
                    return Err(e);
                }
            },
        };

        {
            let mut state = inner.lock();
            state.session = Some(session.clone());
            state.conversation = conversation;
            state.voice_active = false;
            inner.set_phase(&mut state, Phase::Active);
        }
        self.spawn_watcher(generation, signals);

        info!(session = %session.id(), generation = %generation, "session active");
        inner.publish(UiEvent::SessionStarted {
            session_id: session.id().to_string(),
        });
        Ok(())
    }

    async fn open_conversation(&self) -> Result<ConversationClient, SessionError> {
        let setup = self
            .inner
            .assistant
            .as_ref()
            .ok_or_else(|| SessionError::NotInitialized("assistant provider".into()))?;
        let mut conversation = ConversationClient::new(Arc::clone(&setup.api), setup.spec.clone())
            .with_poll_policy(setup.policy.clone());
        conversation.initialize().await.map_err(errors::assistant_init)?;
        Ok(conversation)
    }

    fn spawn_watcher(&self, generation: SessionGeneration, signals: mpsc::UnboundedReceiver<SessionSignal>) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(watch_session(inner, generation, signals));
        let previous = self.inner.watcher.lock().ok().and_then(|mut w| w.replace(handle));
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

// =============================================================================
// END
// =============================================================================

impl Orchestrator {
    /// Stop voice chat if active, close the session, drop the conversation.
    ///
    /// No-op outside `Active`.
    pub async fn end(&self) {
        let inner = &self.inner;
        let (session, voice_active) = {
            let mut state = inner.lock();
            if state.phase != Phase::Active {
                debug!(phase = %state.phase, "end ignored");
                return;
            }
            inner.set_phase(&mut state, Phase::Ending);
            state.conversation = None;
            (state.session.take(), std::mem::take(&mut state.voice_active))
        };

        if let Some(handle) = inner.watcher.lock().ok().and_then(|mut w| w.take()) {
            handle.abort();
        }
        if let Some(session) = &session {
            inner.avatar.close(session, voice_active).await;
        }

        {
            let mut state = inner.lock();
            state.stream_url = None;
            inner.set_phase(&mut state, Phase::Idle);
        }
        if voice_active {
            inner.publish(UiEvent::VoiceChat { active: false });
        }
        inner.publish(UiEvent::StreamCleared);
        inner.publish(UiEvent::SessionEnded {
            reason: EndReason::UserRequested,
        });
        info!("session ended");
    }

    /// End any live session before the process exits.
    ///
    /// Refuses further starts, waits for an in-flight start or end to
    /// settle, then ends whatever session is left.
    pub async fn shutdown(&self) {
        let mut phases = {
            let mut state = self.inner.lock();
            state.closing = true;
            self.inner.phase_tx.subscribe()
        };
        let settled = phases
            .wait_for(|phase| matches!(phase, Phase::Idle | Phase::Active))
            .await
            .is_ok();
        if !settled {
            warn!("phase channel closed during shutdown");
        }
        self.end().await;
        if let Some(handle) = self.inner.watcher.lock().ok().and_then(|mut w| w.take()) {
            handle.abort();
        }
    }
}

// =============================================================================
// PROVIDER SIGNALS
// =============================================================================

async fn watch_session(
    inner: Arc<Inner>,
    generation: SessionGeneration,
    mut signals: mpsc::UnboundedReceiver<SessionSignal>,
) {
    while let Some(signal) = signals.recv().await {
        match signal {
            SessionSignal::StreamReady(stream) => {
                let url = stream.url.clone();
                {
                    let mut state = inner.lock();
                    if state.generation != generation || state.session.is_none() {
                        continue;
                    }
                    state.stream_url = Some(url.clone());
                }
                inner.publish(UiEvent::StreamReady { url });
            }
            SessionSignal::Disconnected => {
                handle_disconnect(&inner, generation);
                break;
            }
        }
    }
}

fn handle_disconnect(inner: &Inner, generation: SessionGeneration) {
    let voice_was_active = {
        let mut state = inner.lock();
        if state.generation != generation || state.phase != Phase::Active {
            debug!(generation = %generation, phase = %state.phase, "disconnect ignored");
            return;
        }
        state.session = None;
        state.conversation = None;
        state.stream_url = None;
        let voice = std::mem::take(&mut state.voice_active);
        inner.set_phase(&mut state, Phase::Idle);
        voice
    };

    info!(generation = %generation, "provider ended the session");
    if voice_was_active {
        inner.publish(UiEvent::VoiceChat { active: false });
    }
    inner.publish(UiEvent::StreamCleared);
    inner.publish(UiEvent::SessionEnded {
        reason: EndReason::ProviderDisconnected,
    });
    inner.publish(UiEvent::Notice {
        level: NoticeLevel::Info,
        message: "avatar stream disconnected".into(),
    });
}
