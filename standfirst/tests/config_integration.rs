//! Integration tests for configuration loading.
//!
//! Run with: `cargo test --test config_integration`

use std::time::{Duration, Instant};

use tempfile::TempDir;

use standfirst::config::{ConfigError, ConfigFile, ConfigKey};
use standfirst::engine::{DebounceEdge, Engine, PlayerNum};
use standfirst::SensorEvent;

const SAMPLE: &str = "\
[players]
count = 4
channel_map = 4,3,,1

[timing]
bounce_ms = 250
ready_wait_ms = 3000
poll_interval_ms = 50
edge = trailing

[link]
port = /dev/ttyUSB0
retry_ms = 2000

[sounds]
beep = /usr/share/sounds/beep.wav
ready = fanfare.mp3
startup_check = false
";

#[test]
fn test_full_file_builds_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.ini");
    std::fs::write(&path, SAMPLE).unwrap();

    let file = ConfigFile::load_from(&path).unwrap();
    let config = file.engine_config().unwrap();

    assert_eq!(config.players, 4);
    assert_eq!(config.bounce_time, Duration::from_millis(250));
    assert_eq!(config.ready_wait, Duration::from_secs(3));
    assert_eq!(config.poll_interval, Duration::from_millis(50));
    assert_eq!(config.edge, DebounceEdge::Trailing);
    assert_eq!(config.channel_map.player_for(0), PlayerNum::new(4));
    assert_eq!(config.channel_map.player_for(2), None);
    assert!(!file.sounds.startup_check);

    let start = Instant::now();
    let mut engine = Engine::new(&config, start);
    engine
        .sensor_event(&SensorEvent::new(3, false, start + Duration::from_secs(5)))
        .unwrap();
    assert!(engine.bounce_set().contains(PlayerNum::new(1).unwrap()));
}

#[test]
fn test_set_save_reload_through_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.ini");

    let mut file = ConfigFile::default();
    for (key, value) in [
        ("players.count", "6"),
        ("timing.edge", "trailing"),
        ("link.port", "/dev/ttyACM1"),
    ] {
        let key: ConfigKey = key.parse().unwrap();
        key.set(&mut file, value).unwrap();
    }
    file.save_to(&path).unwrap();

    let reloaded = ConfigFile::load_from(&path).unwrap();
    assert_eq!(reloaded, file);
    assert_eq!(ConfigKey::PlayersCount.get(&reloaded), "6");
}

#[test]
fn test_inconsistent_map_fails_validation_not_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.ini");
    std::fs::write(&path, "[players]\ncount = 2\nchannel_map = 1,2,3\n").unwrap();

    let file = ConfigFile::load_from(&path).unwrap();
    assert!(matches!(file.engine_config(), Err(ConfigError::Invalid(_))));
}
