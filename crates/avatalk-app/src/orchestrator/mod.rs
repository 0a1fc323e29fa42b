//! Session orchestrator: the UI-level state machine.
//!
//! `Idle -> Starting -> Active -> Ending -> Idle`, plus an asynchronous
//! `Active -> Idle` when the provider drops the stream. All operations
//! take `&self`; the state lock is never held across an await.
//! Results of work that outlives its session are discarded by comparing
//! the `SessionGeneration` captured at the start of the work.

mod controls;
mod errors;
mod lifecycle;
mod submit;
mod voice;

#[cfg(test)]
mod tests;

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use avatalk_ai::{AssistantApi, AssistantSpec, ConversationClient, PollPolicy};
use avatalk_avatar::{AvatarSession, AvatarSessionController, TokenSource};
use avatalk_common::{EventBus, Phase, SessionGeneration, SpeakMode, UiEvent};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use controls::Controls;

/// How to build a fresh conversation for each session.
#[derive(Clone)]
pub struct AssistantSetup {
    pub api: Arc<dyn AssistantApi>,
    pub spec: AssistantSpec,
    pub policy: PollPolicy,
}

/// Mutable session state. Guarded by `Inner::state`.
#[derive(Default)]
pub(crate) struct Shared {
    phase: Phase,
    generation: SessionGeneration,
    session: Option<AvatarSession>,
    conversation: Option<Arc<ConversationClient>>,
    voice_active: bool,
    pending_input: String,
    stream_url: Option<String>,
    /// Set by `shutdown`; no new session may start afterwards.
    closing: bool,
}

pub(crate) struct Inner {
    mode: SpeakMode,
    tokens: Arc<dyn TokenSource>,
    avatar: Arc<AvatarSessionController>,
    assistant: Option<AssistantSetup>,
    bus: EventBus,
    state: Mutex<Shared>,
    /// Mirrors `Shared::phase` for tasks that wait on a transition.
    phase_tx: watch::Sender<Phase>,
    submitting: AtomicBool,
    toggling: AtomicBool,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    pub fn new(
        mode: SpeakMode,
        tokens: Arc<dyn TokenSource>,
        avatar: Arc<AvatarSessionController>,
        assistant: Option<AssistantSetup>,
        bus: EventBus,
    ) -> Self {
        if mode == SpeakMode::Assistant && assistant.is_none() {
            tracing::warn!("assistant mode without an assistant provider, sessions will fail to start");
        }
        Self {
            inner: Arc::new(Inner {
                mode,
                tokens,
                avatar,
                assistant,
                bus,
                state: Mutex::new(Shared::default()),
                phase_tx: watch::Sender::new(Phase::Idle),
                submitting: AtomicBool::new(false),
                toggling: AtomicBool::new(false),
                watcher: Mutex::new(None),
            }),
        }
    }

    pub fn mode(&self) -> SpeakMode {
        self.inner.mode
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    pub fn generation(&self) -> SessionGeneration {
        self.inner.lock().generation
    }

    pub fn session_id(&self) -> Option<String> {
        self.inner.lock().session.as_ref().map(|s| s.id().to_string())
    }

    pub fn voice_active(&self) -> bool {
        self.inner.lock().voice_active
    }

    pub fn pending_input(&self) -> String {
        self.inner.lock().pending_input.clone()
    }

    pub fn stream_url(&self) -> Option<String> {
        self.inner.lock().stream_url.clone()
    }

    /// Stage text for the next submission.
    pub fn set_input(&self, text: impl Into<String>) {
        self.inner.lock().pending_input = text.into();
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, event: UiEvent) {
        self.bus.publish(event);
    }

    fn set_phase(&self, state: &mut Shared, phase: Phase) {
        if state.phase != phase {
            tracing::debug!(from = %state.phase, to = %phase, "phase change");
            state.phase = phase;
            self.phase_tx.send_replace(phase);
            self.publish(UiEvent::PhaseChanged(phase));
        }
    }

    /// True while `generation` is still the live, active session.
    fn is_current(&self, generation: SessionGeneration) -> bool {
        let state = self.lock();
        state.generation == generation && state.phase == Phase::Active
    }
}
