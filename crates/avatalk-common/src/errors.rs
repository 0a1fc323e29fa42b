use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: set {0}")]
    MissingKey(String),
}

/// Failures surfaced to the user by the session orchestrator.
///
/// None of these are fatal: the orchestrator either stays `Active` or
/// returns to `Idle` after reporting one.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not obtain an avatar session token: {0}")]
    CredentialFetchFailed(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("not initialized: {0}")]
    NotInitialized(String),

    #[error("avatar could not speak: {0}")]
    SpeakFailed(String),

    #[error("voice chat toggle failed: {0}")]
    VoiceChatToggleFailed(String),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("{0} already in progress")]
    Busy(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
