//! Build the orchestrator and its providers from config and keys.

use std::sync::Arc;
use std::time::Duration;

use avatalk_ai::{AssistantSpec, OpenAiAssistants, OpenAiConfig, PollPolicy};
use avatalk_avatar::{
    AvatarSessionController, HeygenConfig, HeygenConnector, HeygenTokenFetcher, MemorySink,
    StartAvatarRequest,
};
use avatalk_common::{EventBus, SessionError, SpeakMode};
use avatalk_config::schema::PollingConfig;
use avatalk_config::{ApiKeys, AvatalkConfig};

use crate::orchestrator::{AssistantSetup, Orchestrator};

pub fn poll_policy(polling: &PollingConfig) -> PollPolicy {
    PollPolicy {
        initial_interval: Duration::from_millis(polling.initial_interval_ms),
        multiplier: polling.multiplier,
        max_interval: Duration::from_millis(polling.max_interval_ms),
        max_attempts: polling.max_attempts,
        deadline: Duration::from_secs(polling.deadline_secs),
    }
}

pub fn build_orchestrator(
    config: &AvatalkConfig,
    keys: &ApiKeys,
    mode: SpeakMode,
    bus: EventBus,
) -> Result<Orchestrator, SessionError> {
    let avatar_timeout = Duration::from_secs(u64::from(config.avatar.request_timeout));
    let tokens = HeygenTokenFetcher::new(&keys.heygen, &config.avatar.base_url, avatar_timeout)
        .map_err(|e| SessionError::ProviderUnavailable(e.to_string()))?;
    let connector = HeygenConnector::new(
        HeygenConfig::default()
            .with_base_url(&config.avatar.base_url)
            .with_request_timeout(avatar_timeout),
    )
    .map_err(|e| SessionError::ProviderUnavailable(e.to_string()))?;

    let request = StartAvatarRequest {
        avatar_name: config.avatar.avatar_name.clone(),
        quality: config.avatar.quality,
        voice_id: config.avatar.voice_id.clone(),
    };
    let controller = AvatarSessionController::new(Arc::new(connector), Arc::new(MemorySink::new()), request);

    let assistant = match mode {
        SpeakMode::Direct => None,
        SpeakMode::Assistant => Some(assistant_setup(config, keys)?),
    };

    Ok(Orchestrator::new(
        mode,
        Arc::new(tokens),
        Arc::new(controller),
        assistant,
        bus,
    ))
}

fn assistant_setup(config: &AvatalkConfig, keys: &ApiKeys) -> Result<AssistantSetup, SessionError> {
    let key = keys
        .openai
        .as_deref()
        .ok_or_else(|| avatalk_common::ConfigError::MissingKey("OPENAI_API_KEY".into()))?;
    let openai = OpenAiConfig::new(key)
        .with_base_url(&config.assistant.base_url)
        .with_request_timeout(Duration::from_secs(u64::from(config.assistant.request_timeout)));
    let api = OpenAiAssistants::new(openai).map_err(|e| SessionError::ProviderUnavailable(e.to_string()))?;

    Ok(AssistantSetup {
        api: Arc::new(api),
        spec: AssistantSpec {
            name: config.assistant.name.clone(),
            instructions: config.assistant.instructions.clone(),
            model: config.assistant.model.clone(),
        },
        policy: poll_policy(&config.polling),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(openai: Option<&str>) -> ApiKeys {
        ApiKeys {
            heygen: "hg".into(),
            openai: openai.map(String::from),
        }
    }

    #[test]
    fn poll_policy_follows_config() {
        let policy = poll_policy(&PollingConfig::default());
        assert_eq!(policy, PollPolicy::default());
    }

    #[test]
    fn direct_mode_needs_no_assistant_key() {
        let orch = build_orchestrator(
            &AvatalkConfig::default(),
            &keys(None),
            SpeakMode::Direct,
            EventBus::default(),
        )
        .unwrap();
        assert_eq!(orch.mode(), SpeakMode::Direct);
    }

    #[test]
    fn assistant_mode_without_key_is_a_config_error() {
        let err = build_orchestrator(
            &AvatalkConfig::default(),
            &keys(None),
            SpeakMode::Assistant,
            EventBus::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn assistant_mode_builds_with_key() {
        let orch = build_orchestrator(
            &AvatalkConfig::default(),
            &keys(Some("sk")),
            SpeakMode::Assistant,
            EventBus::default(),
        )
        .unwrap();
        assert_eq!(orch.mode(), SpeakMode::Assistant);
    }
}
