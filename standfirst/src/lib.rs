//! Standfirst - first-to-stand detection for quiz seats
//!
//! This library turns noisy seat-switch readings from a serial controller
//! into a stable answer to "who stood up first?", and tells the host when
//! everyone has sat back down and the next question can be asked.
//!
//! The [`engine`] holds all seat state, the [`control`] loop drives it from
//! sensor and keyboard feeds, and [`config`] validates the settings both are
//! built from.

pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod keymap;
pub mod logging;
pub mod protocol;

pub use config::{ConfigFile, EngineConfig};
pub use control::{ControlLoop, ManualCommand, SensorEvent, TickOutcome};
pub use engine::{Engine, PlayerNum, SeatStatus, Snapshot};
pub use error::EngineError;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
