//! Point-in-time view of the engine for rendering and audio.

use std::time::Instant;

use super::player::PlayerNum;

/// How one seat should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    Seated,
    /// Standing and at the front of the standing order.
    StandingFirst,
    /// Standing behind someone else.
    StandingOther,
    Disabled,
}

impl SeatStatus {
    /// Single-character marker drawn either side of the seat number.
    pub fn symbol(&self) -> char {
        match self {
            SeatStatus::Seated => ' ',
            SeatStatus::StandingFirst => '*',
            SeatStatus::StandingOther => '.',
            SeatStatus::Disabled => '_',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Seated => "seated",
            SeatStatus::StandingFirst => "first",
            SeatStatus::StandingOther => "standing",
            SeatStatus::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatView {
    pub player: PlayerNum,
    pub status: SeatStatus,
}

impl SeatView {
    /// Seat cell as drawn on the board, e.g. `*5*`.
    pub fn cell(&self) -> String {
        let s = self.status.symbol();
        format!("{}{}{}", s, self.player, s)
    }
}

/// Everything a renderer needs for one tick.
///
/// `beep` and `ready` are one-shot: they are `true` only on the tick that
/// delivered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub at: Instant,
    /// One entry per seat, in seat order.
    pub seats: Vec<SeatView>,
    pub standing: Vec<PlayerNum>,
    pub bouncing: Vec<PlayerNum>,
    pub next_bounce_deadline: Option<Instant>,
    pub ready_deadline: Option<Instant>,
    pub beep: bool,
    pub ready: bool,
}

impl Snapshot {
    /// The player who stood first.
    pub fn winner(&self) -> Option<PlayerNum> {
        self.standing.first().copied()
    }

    pub fn status_of(&self, player: PlayerNum) -> Option<SeatStatus> {
        self.seats
            .iter()
            .find(|s| s.player == player)
            .map(|s| s.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_cells() {
        let cell = |i, status| SeatView {
            player: PlayerNum::from_index(i),
            status,
        }
        .cell();

        assert_eq!(cell(0, SeatStatus::Seated), " 1 ");
        assert_eq!(cell(4, SeatStatus::StandingFirst), "*5*");
        assert_eq!(cell(1, SeatStatus::StandingOther), ".2.");
        assert_eq!(cell(9, SeatStatus::Disabled), "_10_");
    }
}
