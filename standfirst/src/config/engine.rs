//! Validated, immutable engine settings.

use std::time::Duration;

use super::file::ConfigFile;
use super::ConfigError;
use crate::engine::{DebounceEdge, PlayerNum};

/// Largest supported seat count.
pub const MAX_PLAYERS: usize = 32;

/// Default seat count.
pub const DEFAULT_PLAYERS: usize = 10;

pub const DEFAULT_BOUNCE_MS: u64 = 500;
pub const DEFAULT_READY_WAIT_MS: u64 = 2000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Fixed mapping from 0-based sensor channel to player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    slots: Vec<Option<PlayerNum>>,
}

impl ChannelMap {
    /// Channel `i` drives player `i + 1`.
    pub fn identity(players: usize) -> Self {
        Self {
            slots: (0..players).map(|i| Some(PlayerNum::from_index(i))).collect(),
        }
    }

    /// Build from per-channel player numbers.
    ///
    /// `None` leaves a channel unmapped. Every mapped number must be in
    /// `1..=players` and appear at most once.
    pub fn from_playernums(slots: &[Option<usize>], players: usize) -> Result<Self, String> {
        let mut seen = vec![false; players];
        let mut mapped = Vec::with_capacity(slots.len());

        for (channel, slot) in slots.iter().enumerate() {
            let Some(num) = *slot else {
                mapped.push(None);
                continue;
            };
            if num == 0 || num > players {
                return Err(format!(
                    "channel {} maps to player {}, expected 1..={}",
                    channel, num, players
                ));
            }
            if std::mem::replace(&mut seen[num - 1], true) {
                return Err(format!("player {} is mapped more than once", num));
            }
            mapped.push(PlayerNum::new(num));
        }

        Ok(Self { slots: mapped })
    }

    /// The player a channel drives, if any.
    pub fn player_for(&self, channel: usize) -> Option<PlayerNum> {
        self.slots.get(channel).copied().flatten()
    }

    /// Number of channel slots, mapped or not.
    pub fn channels(&self) -> usize {
        self.slots.len()
    }
}

/// Settings the engine and control loop are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub players: usize,
    pub bounce_time: Duration,
    pub ready_wait: Duration,
    pub poll_interval: Duration,
    pub edge: DebounceEdge,
    pub channel_map: ChannelMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            bounce_time: Duration::from_millis(DEFAULT_BOUNCE_MS),
            ready_wait: Duration::from_millis(DEFAULT_READY_WAIT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            edge: DebounceEdge::default(),
            channel_map: ChannelMap::identity(DEFAULT_PLAYERS),
        }
    }
}

impl EngineConfig {
    /// Validate a config file and produce engine settings.
    pub fn from_config_file(config: &ConfigFile) -> Result<Self, ConfigError> {
        let players = config.players.count;
        if players == 0 || players > MAX_PLAYERS {
            return Err(ConfigError::Invalid(format!(
                "players.count must be in 1..={}, got {}",
                MAX_PLAYERS, players
            )));
        }

        let timing = &config.timing;
        if timing.ready_wait_ms == 0 {
            return Err(ConfigError::Invalid(
                "timing.ready_wait_ms must be greater than 0".to_string(),
            ));
        }
        if timing.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "timing.poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        let channel_map = if config.players.channel_map.is_empty() {
            ChannelMap::identity(players)
        } else {
            ChannelMap::from_playernums(&config.players.channel_map, players)
                .map_err(|reason| ConfigError::Invalid(format!("players.channel_map: {}", reason)))?
        };

        Ok(Self {
            players,
            bounce_time: Duration::from_millis(timing.bounce_ms),
            ready_wait: Duration::from_millis(timing.ready_wait_ms),
            poll_interval: Duration::from_millis(timing.poll_interval_ms),
            edge: timing.edge,
            channel_map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(num: usize) -> Option<PlayerNum> {
        PlayerNum::new(num)
    }

    #[test]
    fn test_identity_map() {
        let map = ChannelMap::identity(10);
        assert_eq!(map.player_for(0), p(1));
        assert_eq!(map.player_for(9), p(10));
        assert_eq!(map.player_for(10), None);
    }

    #[test]
    fn test_custom_map_with_gap() {
        let map = ChannelMap::from_playernums(&[Some(3), None, Some(1)], 3).unwrap();
        assert_eq!(map.player_for(0), p(3));
        assert_eq!(map.player_for(1), None);
        assert_eq!(map.player_for(2), p(1));
        assert_eq!(map.channels(), 3);
    }

    #[test]
    fn test_map_rejects_duplicates_and_out_of_range() {
        assert!(ChannelMap::from_playernums(&[Some(1), Some(1)], 2).is_err());
        assert!(ChannelMap::from_playernums(&[Some(3)], 2).is_err());
        assert!(ChannelMap::from_playernums(&[Some(0)], 2).is_err());
    }

    #[test]
    fn test_default_engine_config() {
        let config = EngineConfig::default();
        assert_eq!(config.players, 10);
        assert_eq!(config.bounce_time, Duration::from_millis(500));
        assert_eq!(config.ready_wait, Duration::from_secs(2));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.edge, DebounceEdge::Leading);
    }

    #[test]
    fn test_from_default_config_file_matches_default() {
        let config = EngineConfig::from_config_file(&ConfigFile::default()).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_counts() {
        let mut file = ConfigFile::default();
        file.players.count = 0;
        assert!(matches!(
            EngineConfig::from_config_file(&file),
            Err(ConfigError::Invalid(_))
        ));

        file.players.count = MAX_PLAYERS + 1;
        assert!(EngineConfig::from_config_file(&file).is_err());
    }

    #[test]
    fn test_zero_bounce_is_allowed() {
        let mut file = ConfigFile::default();
        file.timing.bounce_ms = 0;
        let config = EngineConfig::from_config_file(&file).unwrap();
        assert_eq!(config.bounce_time, Duration::ZERO);

        file.timing.poll_interval_ms = 0;
        assert!(EngineConfig::from_config_file(&file).is_err());
    }

    #[test]
    fn test_channel_map_must_fit_player_count() {
        let mut file = ConfigFile::default();
        file.players.count = 2;
        file.players.channel_map = vec![Some(2), Some(5)];
        assert!(EngineConfig::from_config_file(&file).is_err());
    }
}
