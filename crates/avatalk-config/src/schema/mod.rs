//! Configuration schema types for avatalk.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod assistant;
mod avatar;
mod polling;
mod system;

pub use assistant::*;
pub use avatar::*;
pub use polling::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// API keys are not part of the file; see [`crate::credentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct AvatalkConfig {
    pub avatar: AvatarConfig,
    pub assistant: AssistantConfig,
    pub polling: PollingConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatalk_common::{AvatarQuality, SpeakMode};

    #[test]
    fn default_config_has_correct_avatar() {
        let config = AvatalkConfig::default();
        assert_eq!(config.avatar.base_url, "https://api.heygen.com");
        assert_eq!(config.avatar.avatar_name, "Wayne_20240711");
        assert_eq!(config.avatar.quality, AvatarQuality::High);
        assert!(config.avatar.voice_id.is_none());
    }

    #[test]
    fn default_config_has_correct_assistant() {
        let config = AvatalkConfig::default();
        assert_eq!(config.assistant.name, "HeyGen Assistant");
        assert_eq!(config.assistant.model, "gpt-4.1");
        assert!(config.assistant.instructions.contains("HeyGen avatar streaming"));
    }

    #[test]
    fn default_config_has_correct_polling() {
        let config = AvatalkConfig::default();
        assert_eq!(config.polling.initial_interval_ms, 1000);
        assert!((config.polling.multiplier - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.polling.max_interval_ms, 5000);
        assert_eq!(config.polling.max_attempts, 60);
        assert_eq!(config.polling.deadline_secs, 120);
    }

    #[test]
    fn default_config_has_correct_session_and_logging() {
        let config = AvatalkConfig::default();
        assert_eq!(config.session.mode, SpeakMode::Assistant);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.level.directive(), "avatalk=info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AvatalkConfig = toml::from_str(
            r#"
[avatar]
quality = "low"

[session]
mode = "direct"
"#,
        )
        .unwrap();
        assert_eq!(config.avatar.quality, AvatarQuality::Low);
        assert_eq!(config.avatar.avatar_name, "Wayne_20240711");
        assert_eq!(config.session.mode, SpeakMode::Direct);
        assert_eq!(config.polling.max_attempts, 60);
    }

    #[test]
    fn log_level_is_uppercase_in_toml() {
        let config: AvatalkConfig = toml::from_str("[logging]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }
}
