//! Conversational-assistant provider settings.

use serde::{Deserialize, Serialize};

/// Assistant persona and provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    pub name: String,
    pub instructions: String,
    pub model: String,
    /// Per-request timeout in seconds (valid range: 5-300).
    pub request_timeout: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            name: "HeyGen Assistant".into(),
            instructions: "You are a helpful assistant for HeyGen avatar streaming.".into(),
            model: "gpt-4.1".into(),
            request_timeout: 60,
        }
    }
}
