//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod polling;
mod providers;

#[cfg(test)]
mod tests;

use crate::schema::AvatalkConfig;
use avatalk_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AvatalkConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    providers::validate_avatar(&mut errors, config);
    providers::validate_assistant(&mut errors, config);
    polling::validate_polling(&mut errors, config);
    polling::validate_session(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
