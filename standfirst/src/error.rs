//! Engine error types.
//!
//! None of these are fatal. The control loop reports them alongside the
//! tick that produced them, drops the offending input, and carries on.

use thiserror::Error;

use crate::protocol::DecodeError;

/// Non-fatal errors raised while applying input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Sensor input could not be decoded.
    #[error("Undecodable sensor input: {0}")]
    Decode(#[from] DecodeError),

    /// Manual command addressed a seat that does not exist.
    #[error("Command index {index} out of range (0..{players})")]
    InvalidCommand { index: usize, players: usize },

    /// Sensor reported on a channel with no player assigned.
    #[error("Sensor channel {channel} is not mapped to a player")]
    UnmappedChannel { channel: usize },
}
