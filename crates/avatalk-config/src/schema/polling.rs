//! Run-completion polling bounds.

use serde::{Deserialize, Serialize};

/// How long to wait for an assistant run to finish.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay before the second status check, in milliseconds (10-60000).
    pub initial_interval_ms: u64,
    /// Growth factor applied to the delay after each check (1.0-10.0).
    pub multiplier: f64,
    /// Upper bound on a single delay, in milliseconds.
    pub max_interval_ms: u64,
    /// Status checks allowed before giving up (1-10000).
    pub max_attempts: u32,
    /// Wall-clock budget for one run, in seconds (1-3600).
    pub deadline_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 1000,
            multiplier: 1.5,
            max_interval_ms: 5000,
            max_attempts: 60,
            deadline_secs: 120,
        }
    }
}
