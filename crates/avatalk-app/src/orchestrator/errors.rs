//! Mapping of provider errors into the user-facing taxonomy.

use avatalk_ai::AiError;
use avatalk_avatar::AvatarError;
use avatalk_common::SessionError;

pub(super) fn credential(err: AvatarError) -> SessionError {
    SessionError::CredentialFetchFailed(err.to_string())
}

pub(super) fn avatar_open(err: AvatarError) -> SessionError {
    SessionError::ProviderUnavailable(format!("avatar session: {err}"))
}

pub(super) fn assistant_init(err: AiError) -> SessionError {
    SessionError::ProviderUnavailable(format!("assistant initialization: {err}"))
}

pub(super) fn assistant_send(err: AiError) -> SessionError {
    match err {
        AiError::NotInitialized => SessionError::NotInitialized("assistant".into()),
        AiError::Busy => SessionError::Busy("assistant message"),
        AiError::Timeout { attempts, elapsed_ms } => SessionError::Timeout(format!(
            "assistant run ({attempts} checks over {elapsed_ms} ms)"
        )),
        AiError::RunFailed(status) => SessionError::ProviderUnavailable(format!(
            "assistant run ended with status {}",
            status.as_str()
        )),
        other => SessionError::ProviderUnavailable(format!("assistant: {other}")),
    }
}

pub(super) fn speak(err: AvatarError) -> SessionError {
    SessionError::SpeakFailed(err.to_string())
}

pub(super) fn voice(err: AvatarError) -> SessionError {
    SessionError::VoiceChatToggleFailed(err.to_string())
}
