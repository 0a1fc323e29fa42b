use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::credential::SessionToken;
use crate::{
    AvatarConnector, AvatarError, AvatarSdk, MediaStream, SpeakRequest, StartAvatarRequest,
    StreamEvent, TaskType, VoiceChatRequest,
};

use super::sink::PlaybackSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Opening,
    Open,
}

/// Stream lifecycle changes forwarded to whoever opened the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    StreamReady(MediaStream),
    Disconnected,
}

/// Handle to an opened session. Cheap to clone.
#[derive(Clone)]
pub struct AvatarSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    id: String,
    sdk: Arc<dyn AvatarSdk>,
    state: Arc<Mutex<SessionState>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl AvatarSession {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn state(&self) -> SessionState {
        read_state(&self.inner.state)
    }

    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    fn stop_pump(&self) {
        if let Some(pump) = self.inner.pump.lock().ok().and_then(|mut p| p.take()) {
            pump.abort();
        }
    }
}

impl std::fmt::Debug for AvatarSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarSession")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .finish()
    }
}

fn read_state(state: &Mutex<SessionState>) -> SessionState {
    state.lock().map(|s| *s).unwrap_or(SessionState::Closed)
}

fn write_state(state: &Mutex<SessionState>, next: SessionState) {
    if let Ok(mut s) = state.lock() {
        *s = next;
    }
}

/// Opens, drives and closes avatar sessions against one playback sink.
pub struct AvatarSessionController {
    connector: Arc<dyn AvatarConnector>,
    sink: Arc<dyn PlaybackSink>,
    request: StartAvatarRequest,
}

impl AvatarSessionController {
    pub fn new(
        connector: Arc<dyn AvatarConnector>,
        sink: Arc<dyn PlaybackSink>,
        request: StartAvatarRequest,
    ) -> Self {
        Self {
            connector,
            sink,
            request,
        }
    }

    /// Connect with `token` and start a streaming session.
    ///
    /// Stream handlers are registered before the session is requested.
    /// The returned receiver reports stream readiness and provider
    /// disconnects for the lifetime of the session.
    pub async fn open(
        &self,
        token: SessionToken,
    ) -> Result<(AvatarSession, mpsc::UnboundedReceiver<SessionSignal>), AvatarError> {
        let state = Arc::new(Mutex::new(SessionState::Opening));
        let sdk = self.connector.connect(token);
        let events = sdk.subscribe();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(pump_events(
            events,
            Arc::clone(&self.sink),
            Arc::clone(&state),
            signal_tx,
        ));

        let info = match sdk.create_start_avatar(&self.request).await {
            Ok(info) => info,
            Err(e) => {
                pump.abort();
                write_state(&state, SessionState::Closed);
                warn!(error = %e, "avatar session could not be opened");
                return Err(e);
            }
        };

        if let Ok(mut s) = state.lock() {
            if *s == SessionState::Opening {
                *s = SessionState::Open;
            }
        }
        info!(session = %info.session_id, avatar = %self.request.avatar_name, "avatar session open");

        let session = AvatarSession {
            inner: Arc::new(SessionInner {
                id: info.session_id,
                sdk,
                state,
                pump: Mutex::new(Some(pump)),
            }),
        };
        Ok((session, signal_rx))
    }

    /// Have the avatar say `text` verbatim.
    pub async fn speak(&self, session: &AvatarSession, text: &str) -> Result<(), AvatarError> {
        require_open(session)?;
        let request = SpeakRequest {
            session_id: session.id().to_string(),
            text: text.to_string(),
            task_type: TaskType::Repeat,
        };
        session.inner.sdk.speak(&request).await
    }

    pub async fn start_voice_chat(&self, session: &AvatarSession) -> Result<(), AvatarError> {
        require_open(session)?;
        let request = VoiceChatRequest {
            session_id: session.id().to_string(),
            audio: true,
        };
        session.inner.sdk.start_voice_chat(&request).await
    }

    pub async fn stop_voice_chat(&self, session: &AvatarSession) -> Result<(), AvatarError> {
        require_open(session)?;
        session.inner.sdk.stop_voice_chat(session.id()).await
    }

    /// Tear the session down. Remote failures are logged, never returned.
    pub async fn close(&self, session: &AvatarSession, voice_active: bool) {
        let sdk = &session.inner.sdk;
        if session.is_open() {
            if voice_active {
                if let Err(e) = sdk.stop_voice_chat(session.id()).await {
                    warn!(session = %session.id(), error = %e, "failed to stop voice chat");
                }
            }
            if let Err(e) = sdk.stop_avatar().await {
                warn!(session = %session.id(), error = %e, "failed to stop avatar session");
            }
        } else {
            debug!(session = %session.id(), "closing a session the provider already ended");
        }

        write_state(&session.inner.state, SessionState::Closed);
        session.stop_pump();
        self.sink.clear();
        info!(session = %session.id(), "avatar session closed");
    }
}

fn require_open(session: &AvatarSession) -> Result<(), AvatarError> {
    if session.is_open() {
        Ok(())
    } else {
        Err(AvatarError::NotOpen)
    }
}

async fn pump_events(
    mut events: broadcast::Receiver<StreamEvent>,
    sink: Arc<dyn PlaybackSink>,
    state: Arc<Mutex<SessionState>>,
    signals: mpsc::UnboundedSender<SessionSignal>,
) {
    loop {
        match events.recv().await {
            Ok(StreamEvent::Ready(stream)) => {
                debug!(url = %stream.url, "avatar stream ready");
                sink.bind(stream.clone());
                if let Err(e) = sink.play().await {
                    warn!(error = %e, "playback did not start, autoplay may be blocked");
                }
                if signals.send(SessionSignal::StreamReady(stream)).is_err() {
                    debug!("session signal receiver dropped");
                }
            }
            Ok(StreamEvent::Disconnected) => {
                sink.clear();
                write_state(&state, SessionState::Closed);
                if signals.send(SessionSignal::Disconnected).is_err() {
                    debug!("session signal receiver dropped");
                }
                break;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "stream events lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
