//! Configuration.
//!
//! Settings are read from `config.ini` in the user's config directory
//! (`~/.config/standfirst/config.ini` on Linux) and validated into an
//! immutable [`EngineConfig`] before the engine starts.

mod engine;
mod file;
mod keys;

use std::path::PathBuf;

use thiserror::Error;

pub use engine::{
    ChannelMap, EngineConfig, DEFAULT_BOUNCE_MS, DEFAULT_PLAYERS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_READY_WAIT_MS, MAX_PLAYERS,
};
pub use file::{
    ConfigFile, LinkSettings, LoggingSettings, PlayersSettings, SoundSettings, TimingSettings,
};
pub use keys::ConfigKey;

/// Errors loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    Write(#[from] std::io::Error),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Directory holding `config.ini` and the `sounds/` folder.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("standfirst")
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("standfirst/config.ini"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            key: "timing.edge".to_string(),
            value: "sideways".to_string(),
            reason: "expected 'leading' or 'trailing'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sideways"));
        assert!(msg.contains("timing.edge"));
    }
}
