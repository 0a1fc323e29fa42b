//! avatalk configuration system.
//!
//! TOML-based configuration with validation. All sections use sensible
//! defaults so partial configs work out of the box. Provider API keys
//! are resolved separately from the environment.

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::ApiKeys;
pub use schema::{AvatalkConfig, CONFIG_SCHEMA_VERSION};

use avatalk_common::ConfigError;
use std::path::Path;

/// Load config from `path` if given, otherwise from the platform default
/// path (creating it on first run).
pub fn load_config(path: Option<&Path>) -> Result<AvatalkConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &AvatalkConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
