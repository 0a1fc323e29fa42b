//! API keys resolved from the environment.
//!
//! Keys never live in `config.toml`. Each provider accepts a plain name
//! and the `VITE_`-prefixed name used by the browser prototype's `.env`.

use std::fmt;

use avatalk_common::{ConfigError, SpeakMode};

pub const HEYGEN_KEY_VARS: [&str; 2] = ["HEYGEN_API_KEY", "VITE_HEYGEN_API_KEY"];
pub const OPENAI_KEY_VARS: [&str; 2] = ["OPENAI_API_KEY", "VITE_OPENAI_API_KEY"];

/// Long-lived provider keys.
#[derive(Clone)]
pub struct ApiKeys {
    pub heygen: String,
    /// Only required when replies are routed through the assistant.
    pub openai: Option<String>,
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("heygen", &"[REDACTED]")
            .field("openai", &self.openai.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiKeys {
    /// Resolve keys from the process environment.
    pub fn from_env(mode: SpeakMode) -> Result<Self, ConfigError> {
        Self::from_lookup(mode, |name| std::env::var(name).ok())
    }

    /// Resolve keys through an arbitrary lookup (first non-empty match wins).
    pub fn from_lookup(
        mode: SpeakMode,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let find = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let heygen = find(&HEYGEN_KEY_VARS)
            .ok_or_else(|| ConfigError::MissingKey(HEYGEN_KEY_VARS[0].into()))?;

        let openai = find(&OPENAI_KEY_VARS);
        if mode == SpeakMode::Assistant && openai.is_none() {
            return Err(ConfigError::MissingKey(OPENAI_KEY_VARS[0].into()));
        }

        Ok(Self { heygen, openai })
    }
}
