//! Reading and validating a config file.

use std::io::ErrorKind;
use std::path::Path;

use avatalk_common::ConfigError;
use tracing::info;

use crate::schema::AvatalkConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Parse and validate TOML text. Absent keys keep their defaults.
pub fn load_from_str(content: &str) -> Result<AvatalkConfig, ConfigError> {
    let config: AvatalkConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load the file at `path`. A missing file is `ConfigError::FileNotFound`.
pub fn load_from_path(path: &Path) -> Result<AvatalkConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config = load_from_str(&content).map_err(|e| match e {
        ConfigError::ParseError(msg) => {
            ConfigError::ParseError(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `~/.config/avatalk/config.toml` (platform equivalent), writing the
/// template and returning defaults on first run.
pub fn load_default() -> Result<AvatalkConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(AvatalkConfig::default())
        }
        result => result,
    }
}
