//! Validation for the avatar and assistant provider sections.

use crate::schema::AvatalkConfig;

use super::helpers::{validate_non_empty, validate_range, validate_url};

pub(crate) fn validate_avatar(errors: &mut Vec<String>, config: &AvatalkConfig) {
    let avatar = &config.avatar;
    validate_url(errors, "avatar.base_url", &avatar.base_url);
    validate_non_empty(errors, "avatar.avatar_name", &avatar.avatar_name);
    validate_range(
        errors,
        "avatar.request_timeout",
        avatar.request_timeout.into(),
        5,
        300,
    );
}

pub(crate) fn validate_assistant(errors: &mut Vec<String>, config: &AvatalkConfig) {
    let assistant = &config.assistant;
    validate_url(errors, "assistant.base_url", &assistant.base_url);
    validate_non_empty(errors, "assistant.name", &assistant.name);
    validate_non_empty(errors, "assistant.model", &assistant.model);
    validate_range(
        errors,
        "assistant.request_timeout",
        assistant.request_timeout.into(),
        5,
        300,
    );
}
