//! Voice chat toggle.

use avatalk_common::{BusyGuard, Phase, SessionError, UiEvent};
use tracing::{debug, info, warn};

use super::{errors, Orchestrator};

impl Orchestrator {
    /// Start voice chat if it is off, stop it if it is on.
    ///
    /// Without a live session this does nothing. On failure the flag is
    /// left as it was.
    pub async fn toggle_voice(&self) -> Result<(), SessionError> {
        let inner = &self.inner;
        let (session, active, generation) = {
            let state = inner.lock();
            match (&state.session, state.phase) {
                (Some(session), Phase::Active) => (session.clone(), state.voice_active, state.generation),
                _ => {
                    debug!(phase = %state.phase, "voice toggle ignored, no session");
                    return Ok(());
                }
            }
        };

        let _busy = match BusyGuard::try_acquire(&inner.toggling) {
            Some(guard) => guard,
            None => {
                let err = SessionError::Busy("voice chat toggle");
                inner.publish(UiEvent::warning(err.to_string()));
                return Err(err);
            }
        };

        let result = if active {
            inner.avatar.stop_voice_chat(&session).await
        } else {
            inner.avatar.start_voice_chat(&session).await
        };
        if let Err(e) = result {
            let err = errors::voice(e);
            warn!(error = %err, "voice chat toggle failed");
            inner.publish(UiEvent::error(err.to_string()));
            return Err(err);
        }

        {
            let mut state = inner.lock();
            if state.generation != generation || state.phase != Phase::Active {
                debug!("session ended during voice toggle");
                return Ok(());
            }
            state.voice_active = !active;
        }
        info!(active = !active, "voice chat toggled");
        inner.publish(UiEvent::VoiceChat { active: !active });
        Ok(())
    }
}
