//! Debounce-and-ordering engine.
//!
//! The [`Engine`] owns every piece of seat state: the player table, the
//! standing order, the bounce set, the readiness timer and the beep latch.
//! It is driven by the control loop and is never shared, so nothing here
//! locks.
//!
//! # Data Flow
//!
//! ```text
//! sensor event ──► ChannelDebouncer ──► StandingOrder ──► ReadinessDetector
//!                        │                                      │
//!                        └──────► BeepLatch          ready ◄────┘
//!                                     │                  │
//!                                     └──► Snapshot ◄────┘
//! ```
//!
//! Manual commands enter at the standing order: they flip flags directly
//! and never reach the debouncer or the beep latch.

mod beep;
mod debounce;
mod player;
mod readiness;
mod snapshot;
mod standing;

use std::time::Instant;

pub use beep::BeepLatch;
pub use debounce::{BounceSet, ChannelDebouncer, DebounceEdge, SeatTransition};
pub use player::{Player, PlayerNum, PlayerRecord, PlayerTable};
pub use readiness::ReadinessDetector;
pub use snapshot::{SeatStatus, SeatView, Snapshot};
pub use standing::{OrderChange, StandingOrder};

use crate::config::{ChannelMap, EngineConfig};
use crate::control::{ManualCommand, SensorEvent};
use crate::error::EngineError;

/// Seat state plus the derived queues and timers.
#[derive(Debug, Clone)]
pub struct Engine {
    players: PlayerTable,
    channels: ChannelMap,
    debouncer: ChannelDebouncer,
    order: StandingOrder,
    bounce: BounceSet,
    readiness: ReadinessDetector,
    beep: BeepLatch,
}

impl Engine {
    /// Build an engine with every seat seated and enabled.
    ///
    /// `started_at` opens the first bounce window on every channel.
    pub fn new(config: &EngineConfig, started_at: Instant) -> Self {
        Self {
            players: PlayerTable::new(config.players, started_at),
            channels: config.channel_map.clone(),
            debouncer: ChannelDebouncer::new(config.bounce_time, config.edge),
            order: StandingOrder::new(),
            bounce: BounceSet::new(),
            readiness: ReadinessDetector::new(config.ready_wait),
            beep: BeepLatch::new(),
        }
    }

    pub fn players(&self) -> &PlayerTable {
        &self.players
    }

    pub fn standing_order(&self) -> &StandingOrder {
        &self.order
    }

    pub fn bounce_set(&self) -> &BounceSet {
        &self.bounce
    }

    pub fn readiness(&self) -> &ReadinessDetector {
        &self.readiness
    }

    pub fn beep_pending(&self) -> bool {
        self.beep.is_set()
    }

    /// The player who stood first.
    pub fn winner(&self) -> Option<PlayerNum> {
        self.order.winner()
    }

    /// Apply a decoded sensor event.
    pub fn sensor_event(
        &mut self,
        event: &SensorEvent,
    ) -> Result<Option<SeatTransition>, EngineError> {
        let num = self
            .channels
            .player_for(event.channel)
            .filter(|&num| self.players.get(num).is_some())
            .ok_or(EngineError::UnmappedChannel {
                channel: event.channel,
            })?;
        Ok(self.observe(num, event.seated, event.observed_at))
    }

    /// Debounce one raw reading for `num` and update everything derived
    /// from it.
    ///
    /// Unknown player numbers are ignored.
    pub fn observe(
        &mut self,
        num: PlayerNum,
        raw_seated: bool,
        now: Instant,
    ) -> Option<SeatTransition> {
        let player = self.players.get_mut(num)?;
        let transition = self
            .debouncer
            .apply_observation(player, raw_seated, now, &mut self.bounce);

        if self.settle(num, transition, now) {
            self.beep.raise();
        }
        transition
    }

    /// Commit the bounce whose deadline is nearest, if it has passed.
    ///
    /// Only one channel is resolved per call.
    pub fn resolve_expired_bounce(&mut self, now: Instant) -> Option<PlayerNum> {
        let num = self.debouncer.expired(&self.bounce, &self.players, now)?;
        let raw_seated = self.players.get(num)?.sit_new;
        tracing::debug!(player = %num, "Bounce window expired");
        self.observe(num, raw_seated, now);
        Some(num)
    }

    /// Take the beep latch, clearing it.
    pub fn take_beep(&mut self) -> bool {
        self.beep.take()
    }

    /// Returns `true` once when the readiness deadline has been reached.
    pub fn poll_ready(&mut self, now: Instant) -> bool {
        let ready = self.readiness.poll(now);
        if ready {
            tracing::info!("All seated, ready for next question");
        }
        ready
    }

    /// Flip a seat's enable flag.
    pub fn toggle_enable(&mut self, num: PlayerNum, now: Instant) {
        let Some(player) = self.players.get_mut(num) else {
            return;
        };
        player.enable = !player.enable;
        tracing::info!(player = %num, enable = player.enable, "Seat enable toggled");

        let _beep = self.settle(num, None, now);
    }

    /// Flip a seat's committed and raw values together, skipping debounce.
    pub fn toggle_seat_for_testing(&mut self, num: PlayerNum, now: Instant) {
        let Some(player) = self.players.get_mut(num) else {
            return;
        };
        let was_seated = player.sit;
        player.sit = !player.sit;
        player.sit_new = player.sit;
        tracing::info!(player = %num, seated = player.sit, "Seat toggled from keyboard");

        let transition = SeatTransition::between(was_seated, !was_seated);
        let _beep = self.settle(num, transition, now);
    }

    /// Seat everyone and clear all derived state.
    pub fn reset(&mut self) {
        for player in self.players.iter_mut() {
            player.sit = true;
            player.sit_new = true;
        }
        self.order.clear();
        self.bounce.clear();
        self.readiness.disarm();
        self.beep.clear();
        tracing::info!("Reset, all seats cleared");
    }

    /// Copy of every player record.
    pub fn dump(&self, now: Instant) -> Vec<PlayerRecord> {
        self.players.iter().map(|p| p.record(now)).collect()
    }

    /// Dispatch a manual command.
    ///
    /// Returns the player dump for [`ManualCommand::DumpState`].
    pub fn apply_command(
        &mut self,
        command: ManualCommand,
        now: Instant,
    ) -> Result<Option<Vec<PlayerRecord>>, EngineError> {
        match command {
            ManualCommand::EnableToggle(index) => {
                let num = self.command_target(index)?;
                self.toggle_enable(num, now);
            }
            ManualCommand::TestToggle(index) => {
                let num = self.command_target(index)?;
                self.toggle_seat_for_testing(num, now);
            }
            ManualCommand::Reset => self.reset(),
            ManualCommand::DumpState => return Ok(Some(self.dump(now))),
        }
        Ok(None)
    }

    /// Render view of the current state.
    pub fn snapshot(&self, now: Instant, beep: bool, ready: bool) -> Snapshot {
        let winner = self.order.winner();
        let seats = self
            .players
            .iter()
            .map(|p| {
                let status = if !p.enable {
                    SeatStatus::Disabled
                } else if p.sit {
                    SeatStatus::Seated
                } else if Some(p.playernum) == winner {
                    SeatStatus::StandingFirst
                } else {
                    SeatStatus::StandingOther
                };
                SeatView {
                    player: p.playernum,
                    status,
                }
            })
            .collect();

        Snapshot {
            at: now,
            seats,
            standing: self.order.as_slice().to_vec(),
            bouncing: self.bounce.as_slice().to_vec(),
            next_bounce_deadline: self
                .bounce
                .nearest(&self.players, self.debouncer.bounce_time())
                .map(|(_, deadline)| deadline),
            ready_deadline: self.readiness.deadline(),
            beep,
            ready,
        }
    }

    fn command_target(&self, index: usize) -> Result<PlayerNum, EngineError> {
        if index < self.players.len() {
            Ok(PlayerNum::from_index(index))
        } else {
            Err(EngineError::InvalidCommand {
                index,
                players: self.players.len(),
            })
        }
    }

    /// Recompute the standing order for `num` and feed the readiness
    /// detector. Returns whether the transition warrants a beep.
    fn settle(
        &mut self,
        num: PlayerNum,
        transition: Option<SeatTransition>,
        now: Instant,
    ) -> bool {
        let Some(player) = self.players.get(num) else {
            return false;
        };
        let before = self.order.winner();
        let change = self.order.recompute(player);
        self.readiness.on_order_change(change, now);

        let after = self.order.winner();
        if before != after {
            match after {
                Some(winner) => tracing::info!(player = %winner, "Standing first"),
                None => tracing::info!("Nobody standing"),
            }
        }
        transition == Some(SeatTransition::Stood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn engine(start: Instant) -> Engine {
        Engine::new(&EngineConfig::default(), start)
    }

    fn p(num: usize) -> PlayerNum {
        PlayerNum::new(num).unwrap()
    }

    fn event(channel: usize, seated: bool, at: Instant) -> SensorEvent {
        SensorEvent {
            channel,
            seated,
            observed_at: at,
        }
    }

    #[test]
    fn test_sensor_event_maps_channel_to_player() {
        let start = Instant::now();
        let mut engine = engine(start);

        let t = engine.sensor_event(&event(4, false, start + ms(10_000))).unwrap();

        assert_eq!(t, Some(SeatTransition::Stood));
        assert_eq!(engine.winner(), Some(p(5)));
        assert!(engine.beep_pending());
    }

    #[test]
    fn test_unmapped_channel_is_rejected_without_mutation() {
        let start = Instant::now();
        let mut engine = engine(start);

        let err = engine.sensor_event(&event(10, false, start + ms(10_000))).unwrap_err();

        assert_eq!(err, EngineError::UnmappedChannel { channel: 10 });
        assert!(engine.standing_order().is_empty());
        assert!(engine.bounce_set().is_empty());
    }

    #[test]
    fn test_resolve_expired_bounce_commits_one_channel() {
        let start = Instant::now();
        let mut engine = engine(start);

        engine.observe(p(1), false, start + ms(100));
        engine.observe(p(2), false, start + ms(200));
        assert_eq!(engine.bounce_set().len(), 2);

        assert_eq!(engine.resolve_expired_bounce(start + ms(600)), None);
        assert_eq!(engine.resolve_expired_bounce(start + ms(750)), Some(p(1)));
        assert_eq!(engine.bounce_set().as_slice(), &[p(2)]);
        assert_eq!(engine.resolve_expired_bounce(start + ms(750)), Some(p(2)));
        assert!(engine.bounce_set().is_empty());

        assert_eq!(engine.standing_order().as_slice(), &[p(1), p(2)]);
        assert!(engine.take_beep());
        assert!(!engine.take_beep());
    }

    #[test]
    fn test_toggle_enable_never_beeps() {
        let start = Instant::now();
        let mut engine = engine(start);

        engine.observe(p(5), false, start + ms(10_000));
        engine.take_beep();

        engine.toggle_enable(p(5), start + ms(10_100));
        assert!(engine.standing_order().is_empty());
        engine.toggle_enable(p(5), start + ms(10_200));
        assert_eq!(engine.winner(), Some(p(5)));
        assert!(!engine.beep_pending());
    }

    #[test]
    fn test_toggle_seat_bypasses_debounce_and_beep() {
        let start = Instant::now();
        let mut engine = engine(start);

        // Inside the startup window, a sensor flip would be held.
        engine.toggle_seat_for_testing(p(3), start + ms(10));

        let player = engine.players().get(p(3)).unwrap();
        assert!(!player.sit);
        assert!(!player.sit_new);
        assert_eq!(player.last_chg, start);
        assert!(engine.bounce_set().is_empty());
        assert_eq!(engine.winner(), Some(p(3)));
        assert!(!engine.beep_pending());
    }

    #[test]
    fn test_manual_emptying_arms_readiness() {
        let start = Instant::now();
        let mut engine = engine(start);

        engine.toggle_seat_for_testing(p(3), start);
        engine.toggle_seat_for_testing(p(3), start + ms(1_000));

        assert_eq!(engine.readiness().deadline(), Some(start + ms(3_000)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let start = Instant::now();
        let mut engine = engine(start);

        engine.observe(p(2), false, start + ms(10_000));
        engine.observe(p(4), false, start + ms(10_100));
        engine.observe(p(4), true, start + ms(10_200));
        engine.observe(p(2), true, start + ms(20_000));
        engine.observe(p(2), false, start + ms(20_100));

        engine.reset();

        assert!(engine.standing_order().is_empty());
        assert!(engine.bounce_set().is_empty());
        assert!(!engine.readiness().is_armed());
        assert!(!engine.beep_pending());
        assert!(engine.players().iter().all(|pl| pl.sit && pl.sit_new));
    }

    #[test]
    fn test_apply_command_validates_index() {
        let start = Instant::now();
        let mut engine = engine(start);

        let err = engine
            .apply_command(ManualCommand::EnableToggle(10), start)
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidCommand { index: 10, players: 10 });

        let dump = engine.apply_command(ManualCommand::DumpState, start).unwrap();
        assert_eq!(dump.map(|d| d.len()), Some(10));

        let none = engine
            .apply_command(ManualCommand::EnableToggle(0), start)
            .unwrap();
        assert!(none.is_none());
        assert!(!engine.players().get(p(1)).unwrap().enable);
    }

    #[test]
    fn test_snapshot_statuses() {
        let start = Instant::now();
        let mut engine = engine(start);

        engine.observe(p(5), false, start + ms(10_000));
        engine.observe(p(2), false, start + ms(10_100));
        engine.toggle_enable(p(9), start + ms(10_200));

        let snap = engine.snapshot(start + ms(10_300), false, false);
        assert_eq!(snap.status_of(p(5)), Some(SeatStatus::StandingFirst));
        assert_eq!(snap.status_of(p(2)), Some(SeatStatus::StandingOther));
        assert_eq!(snap.status_of(p(9)), Some(SeatStatus::Disabled));
        assert_eq!(snap.status_of(p(1)), Some(SeatStatus::Seated));
        assert_eq!(snap.winner(), Some(p(5)));
        assert_eq!(snap.seats.len(), 10);
    }
}
