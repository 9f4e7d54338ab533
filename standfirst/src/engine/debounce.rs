//! Per-channel hysteresis filter.
//!
//! Turns noisy raw seat readings into a stable committed value. A raw flip
//! opens a bounce window of `bounce_time`; further flips inside the window
//! restart it and nothing is committed until the channel has been quiet for
//! the whole window.
//!
//! # Commit Rule
//!
//! ```text
//! observe(raw, now):
//!   changed  = raw != sit_new
//!   sit_new  = raw
//!   now > last_chg + bounce_time   -> sit = sit_new, leave bounce set
//!   otherwise                      -> join bounce set
//!   changed                        -> last_chg = now
//! ```
//!
//! Observation is total: redundant reports (`raw == sit_new`) are applied
//! like any other, since re-checking the window is what lets a quiet channel
//! commit.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use super::player::{Player, PlayerNum, PlayerTable};

/// When a flip on a quiet channel is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceEdge {
    /// A flip on a quiet channel commits immediately and opens the window.
    #[default]
    Leading,
    /// Every flip waits out the full window before committing.
    Trailing,
}

impl DebounceEdge {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebounceEdge::Leading => "leading",
            DebounceEdge::Trailing => "trailing",
        }
    }
}

impl fmt::Display for DebounceEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebounceEdge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "leading" => Ok(DebounceEdge::Leading),
            "trailing" => Ok(DebounceEdge::Trailing),
            other => Err(format!("expected 'leading' or 'trailing', got '{}'", other)),
        }
    }
}

/// A committed change of a seat's stable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatTransition {
    /// Seated -> standing.
    Stood,
    /// Standing -> seated.
    Sat,
}

impl SeatTransition {
    /// Transition between two committed values, if they differ.
    pub fn between(was_seated: bool, now_seated: bool) -> Option<Self> {
        match (was_seated, now_seated) {
            (true, false) => Some(SeatTransition::Stood),
            (false, true) => Some(SeatTransition::Sat),
            _ => None,
        }
    }
}

/// Channels whose raw value has not yet been confirmed, in the order they
/// entered their window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BounceSet {
    members: Vec<PlayerNum>,
}

impl BounceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member if absent.
    pub fn insert(&mut self, num: PlayerNum) {
        if !self.members.contains(&num) {
            self.members.push(num);
        }
    }

    /// Remove a member if present.
    pub fn remove(&mut self, num: PlayerNum) {
        self.members.retain(|&m| m != num);
    }

    pub fn contains(&self, num: PlayerNum) -> bool {
        self.members.contains(&num)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Members in insertion order.
    pub fn as_slice(&self) -> &[PlayerNum] {
        &self.members
    }

    /// The member whose window ends first, with its deadline.
    ///
    /// Deadlines are read from the live player table. Ties go to the
    /// earliest member.
    pub fn nearest(
        &self,
        players: &PlayerTable,
        bounce_time: Duration,
    ) -> Option<(PlayerNum, Instant)> {
        self.members
            .iter()
            .filter_map(|&num| players.get(num).map(|p| (num, p.last_chg + bounce_time)))
            .min_by_key(|&(_, deadline)| deadline)
    }
}

/// Applies raw observations to players.
#[derive(Debug, Clone, Copy)]
pub struct ChannelDebouncer {
    bounce_time: Duration,
    edge: DebounceEdge,
}

impl ChannelDebouncer {
    pub fn new(bounce_time: Duration, edge: DebounceEdge) -> Self {
        Self { bounce_time, edge }
    }

    pub fn bounce_time(&self) -> Duration {
        self.bounce_time
    }

    pub fn edge(&self) -> DebounceEdge {
        self.edge
    }

    /// Apply one raw reading (`true` = seated) observed at `now`.
    ///
    /// Returns the committed transition, if the stable value changed.
    pub fn apply_observation(
        &self,
        player: &mut Player,
        raw_seated: bool,
        now: Instant,
        bounce: &mut BounceSet,
    ) -> Option<SeatTransition> {
        let was_seated = player.sit;
        let changed = raw_seated != player.sit_new;
        player.sit_new = raw_seated;

        let quiet = now > player.last_chg + self.bounce_time;
        let hold = changed && self.edge == DebounceEdge::Trailing;

        if quiet && !hold {
            player.sit = player.sit_new;
            bounce.remove(player.playernum);
        } else {
            bounce.insert(player.playernum);
        }

        if changed {
            player.last_chg = now;
        }

        let transition = SeatTransition::between(was_seated, player.sit);
        match transition {
            Some(t) => tracing::info!(
                player = %player.playernum,
                transition = ?t,
                "Seat committed"
            ),
            None if bounce.contains(player.playernum) => tracing::debug!(
                player = %player.playernum,
                raw_seated,
                "Seat bouncing"
            ),
            None => {}
        }
        transition
    }

    /// Whether the nearest bounce deadline has passed at `now`.
    pub fn expired(
        &self,
        bounce: &BounceSet,
        players: &PlayerTable,
        now: Instant,
    ) -> Option<PlayerNum> {
        bounce
            .nearest(players, self.bounce_time)
            .filter(|&(_, deadline)| now > deadline)
            .map(|(num, _)| num)
    }
}
