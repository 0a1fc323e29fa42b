use serde::{Deserialize, Serialize};
use std::fmt;

/// UI-visible lifecycle of the session orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Starting,
    Active,
    Ending,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Starting => "starting",
            Phase::Active => "active",
            Phase::Ending => "ending",
        };
        f.write_str(name)
    }
}

/// How submitted text reaches the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeakMode {
    /// The avatar repeats the text verbatim.
    Direct,
    /// The text is answered by the assistant and the avatar speaks the reply.
    #[default]
    Assistant,
}

/// Rendering quality requested when the avatar stream is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvatarQuality {
    Low,
    Medium,
    #[default]
    High,
}

impl AvatarQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            AvatarQuality::Low => "low",
            AvatarQuality::Medium => "medium",
            AvatarQuality::High => "high",
        }
    }
}

impl std::str::FromStr for SpeakMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(SpeakMode::Direct),
            "assistant" => Ok(SpeakMode::Assistant),
            other => Err(format!("unknown speak mode '{other}' (expected direct or assistant)")),
        }
    }
}
