//! Tests for the full validation pipeline.

use super::*;
use crate::schema::AvatalkConfig;

#[test]
fn default_config_validates() {
    let config = AvatalkConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_http_base_url() {
    let mut config = AvatalkConfig::default();
    config.avatar.base_url = "ftp://api.heygen.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("avatar.base_url"));
}

#[test]
fn catches_empty_avatar_name() {
    let mut config = AvatalkConfig::default();
    config.avatar.avatar_name = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("avatar.avatar_name"));
}

#[test]
fn catches_request_timeout_out_of_range() {
    let mut config = AvatalkConfig::default();
    config.assistant.request_timeout = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("assistant.request_timeout"));
}

#[test]
fn catches_zero_poll_attempts() {
    let mut config = AvatalkConfig::default();
    config.polling.max_attempts = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.max_attempts"));
}

#[test]
fn catches_shrinking_multiplier() {
    let mut config = AvatalkConfig::default();
    config.polling.multiplier = 0.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.multiplier"));
}

#[test]
fn catches_interval_cap_below_initial() {
    let mut config = AvatalkConfig::default();
    config.polling.initial_interval_ms = 2000;
    config.polling.max_interval_ms = 500;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.max_interval_ms"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = AvatalkConfig::default();
    config.polling.deadline_secs = 0;
    config.assistant.model = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("polling.deadline_secs"));
    assert!(err.contains("assistant.model"));
    assert!(err.contains("; "));
}
