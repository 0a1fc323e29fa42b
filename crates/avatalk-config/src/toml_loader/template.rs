//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# avatalk configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# API keys are read from HEYGEN_API_KEY and OPENAI_API_KEY, never from here.

[avatar]
# base_url = "https://api.heygen.com"
# avatar_name = "Wayne_20240711"
# quality = "high"          # low, medium, high
# voice_id = ""
# request_timeout = 30      # seconds, 5-300

[assistant]
# base_url = "https://api.openai.com/v1"
# name = "HeyGen Assistant"
# instructions = "You are a helpful assistant for HeyGen avatar streaming."
# model = "gpt-4.1"
# request_timeout = 60      # seconds, 5-300

[polling]
# initial_interval_ms = 1000  # 10-60000
# multiplier = 1.5            # 1.0-10.0
# max_interval_ms = 5000      # >= initial_interval_ms
# max_attempts = 60           # 1-10000
# deadline_secs = 120         # 1-3600

[session]
# mode = "assistant"        # assistant, direct
# event_capacity = 64

[logging]
# level = "INFO"            # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
