//! Input seams for the control loop.
//!
//! Both feeds are non-blocking: `None` means "nothing waiting right now",
//! never "closed". Producers on other threads hand events over through a
//! `std::sync::mpsc` channel; tests script them with a `VecDeque`.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use crate::protocol::{DecodeError, PinReading};

/// A decoded sensor reading stamped with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorEvent {
    /// 0-based sensor channel.
    pub channel: usize,
    /// `true` when the seat is occupied.
    pub seated: bool,
    pub observed_at: Instant,
}

impl SensorEvent {
    pub fn new(channel: usize, seated: bool, observed_at: Instant) -> Self {
        Self {
            channel,
            seated,
            observed_at,
        }
    }

    pub fn from_reading(reading: PinReading, observed_at: Instant) -> Self {
        Self::new(reading.channel, reading.seated, observed_at)
    }
}

/// Operator command. Indexes are 0-based seat positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualCommand {
    /// Flip the seat's enable flag.
    EnableToggle(usize),
    /// Flip the seat's state, bypassing debounce.
    TestToggle(usize),
    /// Seat everyone and clear all derived state.
    Reset,
    /// Report every player record.
    DumpState,
}

/// Source of sensor events.
pub trait SensorFeed {
    /// Next waiting event, or `None` if nothing is pending.
    fn poll_sensor(&mut self) -> Option<Result<SensorEvent, DecodeError>>;
}

/// Source of manual commands.
pub trait CommandFeed {
    /// Next waiting command, or `None` if nothing is pending.
    fn poll_command(&mut self) -> Option<ManualCommand>;
}

impl SensorFeed for VecDeque<Result<SensorEvent, DecodeError>> {
    fn poll_sensor(&mut self) -> Option<Result<SensorEvent, DecodeError>> {
        self.pop_front()
    }
}

impl SensorFeed for Receiver<Result<SensorEvent, DecodeError>> {
    fn poll_sensor(&mut self) -> Option<Result<SensorEvent, DecodeError>> {
        match self.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl CommandFeed for VecDeque<ManualCommand> {
    fn poll_command(&mut self) -> Option<ManualCommand> {
        self.pop_front()
    }
}

impl CommandFeed for Receiver<ManualCommand> {
    fn poll_command(&mut self) -> Option<ManualCommand> {
        self.try_recv().ok()
    }
}

/// Feed that never yields anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl SensorFeed for NoInput {
    fn poll_sensor(&mut self) -> Option<Result<SensorEvent, DecodeError>> {
        None
    }
}

impl CommandFeed for NoInput {
    fn poll_command(&mut self) -> Option<ManualCommand> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_queue_feeds_in_order() {
        let now = Instant::now();
        let mut sensors: VecDeque<Result<SensorEvent, DecodeError>> = VecDeque::new();
        sensors.push_back(Ok(SensorEvent::new(1, false, now)));
        sensors.push_back(Err(DecodeError::InvalidUtf8));

        assert_eq!(sensors.poll_sensor(), Some(Ok(SensorEvent::new(1, false, now))));
        assert_eq!(sensors.poll_sensor(), Some(Err(DecodeError::InvalidUtf8)));
        assert_eq!(sensors.poll_sensor(), None);
    }

    #[test]
    fn test_receiver_feed_is_non_blocking() {
        let (tx, mut rx) = mpsc::channel::<ManualCommand>();
        assert_eq!(rx.poll_command(), None);

        tx.send(ManualCommand::Reset).unwrap();
        assert_eq!(rx.poll_command(), Some(ManualCommand::Reset));

        drop(tx);
        assert_eq!(rx.poll_command(), None);
    }

    #[test]
    fn test_event_from_reading() {
        let now = Instant::now();
        let event = SensorEvent::from_reading(
            PinReading {
                channel: 3,
                seated: true,
            },
            now,
        );
        assert_eq!(event, SensorEvent::new(3, true, now));
    }
}
