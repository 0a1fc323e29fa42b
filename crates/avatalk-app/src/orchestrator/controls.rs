//! Which controls the front-end should offer.

use std::sync::atomic::Ordering;

use avatalk_common::Phase;

use super::Orchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub end_enabled: bool,
    pub speak_enabled: bool,
    pub voice_toggle_enabled: bool,
    pub voice_active: bool,
}

impl Controls {
    pub fn voice_label(&self) -> &'static str {
        if self.voice_active {
            "Stop Voice Chat"
        } else {
            "Start Voice Chat"
        }
    }
}

impl Orchestrator {
    pub fn controls(&self) -> Controls {
        let submitting = self.inner.submitting.load(Ordering::Acquire);
        let toggling = self.inner.toggling.load(Ordering::Acquire);
        let state = self.inner.lock();
        let active = state.phase == Phase::Active && state.session.is_some();
        Controls {
            start_enabled: state.phase == Phase::Idle,
            end_enabled: state.phase == Phase::Active,
            speak_enabled: active && !state.pending_input.trim().is_empty() && !submitting,
            voice_toggle_enabled: active && !toggling,
            voice_active: state.voice_active,
        }
    }
}
