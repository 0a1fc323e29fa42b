//! HeyGen client configuration.

use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.heygen.com";

#[derive(Debug, Clone)]
pub struct HeygenConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for HeygenConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl HeygenConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
