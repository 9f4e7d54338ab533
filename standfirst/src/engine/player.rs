//! Per-seat player records.
//!
//! Each seat has exactly one [`Player`], identified by a 1-based
//! [`PlayerNum`] that never changes for the lifetime of the process.
//! The [`PlayerTable`] stores them in a fixed-size vector indexed by
//! `playernum - 1`.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

/// 1-based seat identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerNum(usize);

impl PlayerNum {
    /// Create a player number, rejecting zero.
    pub fn new(num: usize) -> Option<Self> {
        if num == 0 {
            None
        } else {
            Some(Self(num))
        }
    }

    /// Player number for a 0-based table or key index.
    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// The 1-based number.
    pub fn get(self) -> usize {
        self.0
    }

    /// The 0-based table index.
    pub fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for PlayerNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one seat.
///
/// `sit` is the committed (debounced) value and `sit_new` the latest raw
/// reading. `true` means seated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub playernum: PlayerNum,
    pub enable: bool,
    pub sit: bool,
    pub sit_new: bool,
    /// Time of the last raw flip, the start of the current bounce window.
    pub last_chg: Instant,
}

impl Player {
    /// A seated, enabled player whose bounce window starts at `started_at`.
    pub fn new(playernum: PlayerNum, started_at: Instant) -> Self {
        Self {
            playernum,
            enable: true,
            sit: true,
            sit_new: true,
            last_chg: started_at,
        }
    }

    /// Whether this player belongs in the standing order.
    pub fn is_standing_enabled(&self) -> bool {
        !self.sit && self.enable
    }

    /// Point-in-time record for state dumps.
    pub fn record(&self, now: Instant) -> PlayerRecord {
        PlayerRecord {
            playernum: self.playernum,
            enable: self.enable,
            sit: self.sit,
            sit_new: self.sit_new,
            since_last_change_ms: now.saturating_duration_since(self.last_chg).as_millis() as u64,
        }
    }
}

/// Serializable copy of a [`Player`], produced by the dump command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub playernum: PlayerNum,
    pub enable: bool,
    pub sit: bool,
    pub sit_new: bool,
    pub since_last_change_ms: u64,
}

/// Fixed-size table of players indexed by `playernum - 1`.
#[derive(Debug, Clone)]
pub struct PlayerTable {
    players: Vec<Player>,
}

impl PlayerTable {
    /// Build `count` seated, enabled players.
    pub fn new(count: usize, started_at: Instant) -> Self {
        let players = (0..count)
            .map(|i| Player::new(PlayerNum::from_index(i), started_at))
            .collect();
        Self { players }
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the table has no seats.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a player, `None` when the number is past the last seat.
    pub fn get(&self, num: PlayerNum) -> Option<&Player> {
        self.players.get(num.index())
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, num: PlayerNum) -> Option<&mut Player> {
        self.players.get_mut(num.index())
    }

    /// Players in seat order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Mutable iteration in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }
}
