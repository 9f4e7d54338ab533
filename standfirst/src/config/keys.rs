//! Addressable configuration keys.
//!
//! Every setting in `config.ini` has a [`ConfigKey`] named `section.key`.
//! Loading, saving and the `config get/set/list` commands all go through
//! it, so parsing and validation live in one place.

use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFile;
use super::ConfigError;
use crate::engine::DebounceEdge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    PlayersCount,
    PlayersChannelMap,
    TimingBounceMs,
    TimingReadyWaitMs,
    TimingPollIntervalMs,
    TimingEdge,
    LinkPort,
    LinkRetryMs,
    SoundsBeep,
    SoundsReady,
    SoundsStartupCheck,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::PlayersCount,
            ConfigKey::PlayersChannelMap,
            ConfigKey::TimingBounceMs,
            ConfigKey::TimingReadyWaitMs,
            ConfigKey::TimingPollIntervalMs,
            ConfigKey::TimingEdge,
            ConfigKey::LinkPort,
            ConfigKey::LinkRetryMs,
            ConfigKey::SoundsBeep,
            ConfigKey::SoundsReady,
            ConfigKey::SoundsStartupCheck,
            ConfigKey::LoggingDirectory,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::PlayersCount | ConfigKey::PlayersChannelMap => "players",
            ConfigKey::TimingBounceMs
            | ConfigKey::TimingReadyWaitMs
            | ConfigKey::TimingPollIntervalMs
            | ConfigKey::TimingEdge => "timing",
            ConfigKey::LinkPort | ConfigKey::LinkRetryMs => "link",
            ConfigKey::SoundsBeep | ConfigKey::SoundsReady | ConfigKey::SoundsStartupCheck => {
                "sounds"
            }
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::PlayersCount => "count",
            ConfigKey::PlayersChannelMap => "channel_map",
            ConfigKey::TimingBounceMs => "bounce_ms",
            ConfigKey::TimingReadyWaitMs => "ready_wait_ms",
            ConfigKey::TimingPollIntervalMs => "poll_interval_ms",
            ConfigKey::TimingEdge => "edge",
            ConfigKey::LinkPort => "port",
            ConfigKey::LinkRetryMs => "retry_ms",
            ConfigKey::SoundsBeep => "beep",
            ConfigKey::SoundsReady => "ready",
            ConfigKey::SoundsStartupCheck => "startup_check",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as it is written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::PlayersCount => config.players.count.to_string(),
            ConfigKey::PlayersChannelMap => format_channel_map(&config.players.channel_map),
            ConfigKey::TimingBounceMs => config.timing.bounce_ms.to_string(),
            ConfigKey::TimingReadyWaitMs => config.timing.ready_wait_ms.to_string(),
            ConfigKey::TimingPollIntervalMs => config.timing.poll_interval_ms.to_string(),
            ConfigKey::TimingEdge => config.timing.edge.to_string(),
            ConfigKey::LinkPort => config.link.port.display().to_string(),
            ConfigKey::LinkRetryMs => config.link.retry_ms.to_string(),
            ConfigKey::SoundsBeep => config.sounds.beep.display().to_string(),
            ConfigKey::SoundsReady => config.sounds.ready.display().to_string(),
            ConfigKey::SoundsStartupCheck => config.sounds.startup_check.to_string(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Parse `value` and store it.
    ///
    /// Only the value's own syntax is checked here. Cross-field checks such
    /// as the channel map fitting the player count happen when the engine
    /// settings are built.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::PlayersCount => config.players.count = self.parse_number(value)?,
            ConfigKey::PlayersChannelMap => {
                config.players.channel_map = parse_channel_map(value)
                    .map_err(|reason| self.invalid(value, reason))?
            }
            ConfigKey::TimingBounceMs => config.timing.bounce_ms = self.parse_number(value)?,
            ConfigKey::TimingReadyWaitMs => {
                config.timing.ready_wait_ms = self.parse_number(value)?
            }
            ConfigKey::TimingPollIntervalMs => {
                config.timing.poll_interval_ms = self.parse_number(value)?
            }
            ConfigKey::TimingEdge => {
                config.timing.edge = value
                    .parse::<DebounceEdge>()
                    .map_err(|reason| self.invalid(value, reason))?
            }
            ConfigKey::LinkPort => config.link.port = self.parse_path(value)?,
            ConfigKey::LinkRetryMs => config.link.retry_ms = self.parse_number(value)?,
            ConfigKey::SoundsBeep => config.sounds.beep = self.parse_path(value)?,
            ConfigKey::SoundsReady => config.sounds.ready = self.parse_path(value)?,
            ConfigKey::SoundsStartupCheck => {
                config.sounds.startup_check = parse_bool(value)
                    .ok_or_else(|| self.invalid(value, "expected true or false".to_string()))?
            }
            ConfigKey::LoggingDirectory => config.logging.directory = self.parse_path(value)?,
        }
        Ok(())
    }

    fn parse_number<T: FromStr>(&self, value: &str) -> Result<T, ConfigError> {
        value
            .parse::<T>()
            .map_err(|_| self.invalid(value, "expected a non-negative integer".to_string()))
    }

    fn parse_path(&self, value: &str) -> Result<PathBuf, ConfigError> {
        if value.is_empty() {
            Err(self.invalid(value, "path must not be empty".to_string()))
        } else {
            Ok(PathBuf::from(value))
        }
    }

    fn invalid(&self, value: &str, reason: String) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// `2,,1` -> `[Some(2), None, Some(1)]`. An empty string is an empty map.
fn parse_channel_map(value: &str) -> Result<Vec<Option<usize>>, String> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(str::trim)
        .map(|slot| {
            if slot.is_empty() {
                Ok(None)
            } else {
                slot.parse::<usize>()
                    .map(Some)
                    .map_err(|_| format!("'{}' is not a player number", slot))
            }
        })
        .collect()
}

fn format_channel_map(map: &[Option<usize>]) -> String {
    map.iter()
        .map(|slot| slot.map(|n| n.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(
            "Timing.Bounce_MS".parse::<ConfigKey>().unwrap(),
            ConfigKey::TimingBounceMs
        );
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            "timing.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_sections_are_contiguous() {
        let mut seen: Vec<&str> = Vec::new();
        for key in ConfigKey::all() {
            let section = key.section();
            if seen.last() != Some(&section) {
                assert!(!seen.contains(&section), "section {} split", section);
                seen.push(section);
            }
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();

        ConfigKey::TimingEdge.set(&mut config, "Trailing").unwrap();
        assert_eq!(ConfigKey::TimingEdge.get(&config), "trailing");

        ConfigKey::SoundsStartupCheck.set(&mut config, "off").unwrap();
        assert!(!config.sounds.startup_check);

        ConfigKey::PlayersChannelMap.set(&mut config, "3, ,1").unwrap();
        assert_eq!(config.players.channel_map, vec![Some(3), None, Some(1)]);
        assert_eq!(ConfigKey::PlayersChannelMap.get(&config), "3,,1");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = ConfigFile::default();

        assert!(ConfigKey::TimingBounceMs.set(&mut config, "-5").is_err());
        assert!(ConfigKey::TimingEdge.set(&mut config, "sideways").is_err());
        assert!(ConfigKey::PlayersChannelMap.set(&mut config, "1,x").is_err());
        assert!(ConfigKey::LinkPort.set(&mut config, "  ").is_err());
        assert_eq!(config, ConfigFile::default());
    }
}
