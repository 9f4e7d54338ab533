//! INI configuration file.
//!
//! Values absent from the file keep their defaults, so an empty or missing
//! file is a valid configuration.

use std::path::{Path, PathBuf};

use ini::Ini;

use super::engine::{
    EngineConfig, DEFAULT_BOUNCE_MS, DEFAULT_PLAYERS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_READY_WAIT_MS,
};
use super::keys::ConfigKey;
use super::{config_directory, config_file_path, ConfigError};
use crate::engine::DebounceEdge;

/// `[players]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayersSettings {
    pub count: usize,
    /// Player number for each channel. Empty means channel `i` drives
    /// player `i + 1`.
    pub channel_map: Vec<Option<usize>>,
}

/// `[timing]` section. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingSettings {
    pub bounce_ms: u64,
    pub ready_wait_ms: u64,
    pub poll_interval_ms: u64,
    pub edge: DebounceEdge,
}

/// `[link]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    /// Serial device the seat controller is attached to.
    pub port: PathBuf,
    /// Delay between attempts to open the device.
    pub retry_ms: u64,
}

/// `[sounds]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSettings {
    pub beep: PathBuf,
    pub ready: PathBuf,
    /// Play both cues at startup as a speaker check.
    pub startup_check: bool,
}

impl SoundSettings {
    /// Resolve a sound path. Relative paths are taken from the `sounds`
    /// directory next to the config file.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            config_directory().join("sounds").join(file)
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
}

/// Contents of `config.ini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub players: PlayersSettings,
    pub timing: TimingSettings,
    pub link: LinkSettings,
    pub sounds: SoundSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            players: PlayersSettings {
                count: DEFAULT_PLAYERS,
                channel_map: Vec::new(),
            },
            timing: TimingSettings {
                bounce_ms: DEFAULT_BOUNCE_MS,
                ready_wait_ms: DEFAULT_READY_WAIT_MS,
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
                edge: DebounceEdge::Leading,
            },
            link: LinkSettings {
                port: PathBuf::from("/dev/ttyACM0"),
                retry_ms: 1000,
            },
            sounds: SoundSettings {
                beep: PathBuf::from("beep-2.wav"),
                ready: PathBuf::from("tada-fanfare-a-6313.mp3"),
                startup_check: true,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
            },
        }
    }
}

impl ConfigFile {
    /// Load from the default location, falling back to defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(config);
        }

        let ini = Ini::load_from_file(path)?;
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save every key to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path)?;

        tracing::info!(path = %path.display(), "Saved config file");
        Ok(())
    }

    /// Validate and build the engine settings.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig::from_config_file(self)
    }
}

fn default_log_directory() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("standfirst")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[timing]\nbounce_ms = 250\nedge = trailing\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();

        assert_eq!(config.timing.bounce_ms, 250);
        assert_eq!(config.timing.edge, DebounceEdge::Trailing);
        assert_eq!(config.timing.ready_wait_ms, DEFAULT_READY_WAIT_MS);
        assert_eq!(config.players.count, DEFAULT_PLAYERS);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.players.count = 4;
        config.players.channel_map = vec![Some(2), None, Some(1), Some(4)];
        config.link.port = PathBuf::from("/dev/ttyUSB1");
        config.sounds.startup_check = false;
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_value_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[players]\ncount = lots\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("players.count"));
    }

    #[test]
    fn test_sound_paths_resolve_relative_to_config_dir() {
        let sounds = ConfigFile::default().sounds;
        assert_eq!(
            sounds.resolve(Path::new("/tmp/beep.wav")),
            PathBuf::from("/tmp/beep.wav")
        );
        assert!(sounds.resolve(&sounds.beep).ends_with("sounds/beep-2.wav"));
    }
}
