//! Arrival-ordered queue of standing seats.
//!
//! Membership is a pure function of each player's committed `sit` and
//! `enable` flags: a player is present iff it is standing and enabled.
//! Order is the order in which players entered that condition, so the front
//! of the queue is the player who stood first.
//!
//! Disabling a standing player removes it. Re-enabling it while it is still
//! standing appends it at the back; its original rank is not restored.

use super::player::{Player, PlayerNum};

/// How a recompute changed the queue's emptiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderChange {
    /// The queue went from empty to non-empty.
    BecameNonEmpty,
    /// The queue went from non-empty to empty.
    BecameEmpty,
    /// Emptiness did not change.
    Unchanged,
}

/// Players currently standing, in the order they stood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingOrder {
    queue: Vec<PlayerNum>,
}

impl StandingOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring one player's membership in line with its flags.
    ///
    /// Safe to call any number of times; a call with nothing to change is a
    /// no-op.
    pub fn recompute(&mut self, player: &Player) -> OrderChange {
        let was_empty = self.queue.is_empty();
        let num = player.playernum;

        if player.is_standing_enabled() {
            if !self.queue.contains(&num) {
                self.queue.push(num);
            }
        } else {
            self.queue.retain(|&n| n != num);
        }

        match (was_empty, self.queue.is_empty()) {
            (true, false) => OrderChange::BecameNonEmpty,
            (false, true) => OrderChange::BecameEmpty,
            _ => OrderChange::Unchanged,
        }
    }

    /// The player who stood first, if anyone is standing.
    pub fn winner(&self) -> Option<PlayerNum> {
        self.queue.first().copied()
    }

    pub fn contains(&self, num: PlayerNum) -> bool {
        self.queue.contains(&num)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn as_slice(&self) -> &[PlayerNum] {
        &self.queue
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
