//! AvatarSdk trait implementation for HeygenClient.

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    AvatarError, AvatarSdk, SessionInfo, SpeakRequest, StartAvatarRequest, StreamEvent,
    VoiceChatRequest,
};

use super::client::{parse_new_session, HeygenClient};

#[async_trait]
impl AvatarSdk for HeygenClient {
    fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.subscribe_events()
    }

    async fn create_start_avatar(&self, request: &StartAvatarRequest) -> Result<SessionInfo, AvatarError> {
        debug!(avatar = %request.avatar_name, quality = request.quality.as_str(), "creating streaming session");
        let mut body = json!({
            "avatar_name": request.avatar_name,
            "quality": request.quality.as_str(),
            "version": "v2",
        });
        if let Some(voice_id) = request.voice_id.as_deref().filter(|v| !v.is_empty()) {
            body["voice"] = json!({ "voice_id": voice_id });
        }

        let json = self.post("streaming.new", &body).await?;
        let (info, stream) = parse_new_session(&json)?;

        if let Err(e) = self
            .post("streaming.start", &json!({ "session_id": info.session_id }))
            .await
        {
            // The provider already allocated the session.
            if let Err(stop_err) = self
                .post("streaming.stop", &json!({ "session_id": info.session_id }))
                .await
            {
                warn!(session = %info.session_id, error = %stop_err, "failed to release unstarted session");
            }
            return Err(e);
        }
        self.set_session(Some(info.session_id.clone()));
        info!(session = %info.session_id, "streaming session started");

        self.emit(StreamEvent::Ready(stream));
        Ok(info)
    }

    async fn speak(&self, request: &SpeakRequest) -> Result<(), AvatarError> {
        debug!(session = %request.session_id, chars = request.text.chars().count(), "speak task");
        let body = json!({
            "session_id": request.session_id,
            "text": request.text,
            "task_type": request.task_type,
        });
        self.post("streaming.task", &body).await?;
        Ok(())
    }

    async fn start_voice_chat(&self, request: &VoiceChatRequest) -> Result<(), AvatarError> {
        if !request.audio {
            debug!(session = %request.session_id, "voice chat requested without audio");
        }
        self.post("streaming.start_listening", &json!({ "session_id": request.session_id }))
            .await?;
        info!(session = %request.session_id, "voice chat started");
        Ok(())
    }

    async fn stop_voice_chat(&self, session_id: &str) -> Result<(), AvatarError> {
        self.post("streaming.stop_listening", &json!({ "session_id": session_id }))
            .await?;
        info!(session = %session_id, "voice chat stopped");
        Ok(())
    }

    async fn stop_avatar(&self) -> Result<(), AvatarError> {
        let Some(session_id) = self.session_id() else {
            warn!("stop requested with no live session");
            return Ok(());
        };

        let result = self
            .post("streaming.stop", &json!({ "session_id": session_id }))
            .await;
        // The session is unusable afterwards whether or not the call succeeded.
        self.mark_disconnected();
        match result {
            Ok(_) | Err(AvatarError::SessionClosed(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
