//! Streaming-avatar provider settings.

use avatalk_common::AvatarQuality;
use serde::{Deserialize, Serialize};

/// Streaming-avatar provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub base_url: String,
    pub avatar_name: String,
    pub quality: AvatarQuality,
    /// Optional provider voice id; the avatar's default voice is used when unset.
    pub voice_id: Option<String>,
    /// Per-request timeout in seconds (valid range: 5-300).
    pub request_timeout: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.heygen.com".into(),
            avatar_name: "Wayne_20240711".into(),
            quality: AvatarQuality::High,
            voice_id: None,
            request_timeout: 30,
        }
    }
}
