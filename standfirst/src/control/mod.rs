//! Cooperative single-threaded control loop.
//!
//! Each [`ControlLoop::tick`] does a bounded amount of work:
//!
//! ```text
//!   ┌─ poll command feed (held until step d)
//!   │
//!   ├─ a. sensor event pending?  ──yes──► debounce + reorder
//!   │          │ no
//!   │          ▼
//!   │    b. resolve nearest expired bounce
//!   │       hand out beep latch
//!   │       hand out ready event
//!   │       nothing done and no command waiting ──► idle sleep
//!   │
//!   ├─ c. snapshot (every tick)
//!   │
//!   └─ d. dispatch held command
//! ```
//!
//! Sensor input always preempts timer work, so a burst of readings is
//! drained before any bounce window is resolved.

mod clock;
mod feed;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use feed::{CommandFeed, ManualCommand, NoInput, SensorEvent, SensorFeed};

use crate::engine::{Engine, PlayerRecord, Snapshot};
use crate::error::EngineError;

/// Result of one tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub snapshot: Snapshot,
    /// Non-fatal errors raised this tick. The offending input was dropped.
    pub errors: Vec<EngineError>,
    /// Player records, when a dump command was dispatched.
    pub dump: Option<Vec<PlayerRecord>>,
    /// Whether the tick ended in the idle sleep.
    pub slept: bool,
}

/// Receives every tick's outcome from [`ControlLoop::run`].
pub trait TickSink {
    fn on_tick(&mut self, outcome: &TickOutcome);
}

impl<F: FnMut(&TickOutcome)> TickSink for F {
    fn on_tick(&mut self, outcome: &TickOutcome) {
        self(outcome)
    }
}

/// Drives an [`Engine`] from a sensor feed and a command feed.
pub struct ControlLoop<S, C, K> {
    engine: Engine,
    sensors: S,
    commands: C,
    clock: K,
    poll_interval: Duration,
}

impl<S, C, K> ControlLoop<S, C, K>
where
    S: SensorFeed,
    C: CommandFeed,
    K: Clock,
{
    pub fn new(engine: Engine, sensors: S, commands: C, clock: K, poll_interval: Duration) -> Self {
        Self {
            engine,
            sensors,
            commands,
            clock,
            poll_interval,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run one bounded iteration.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let command = self.commands.poll_command();
        let mut errors = Vec::new();
        let mut beep = false;
        let mut ready = false;
        let mut slept = false;

        match self.sensors.poll_sensor() {
            Some(Ok(event)) => {
                if let Err(e) = self.engine.sensor_event(&event) {
                    tracing::warn!(channel = event.channel, error = %e, "Sensor event dropped");
                    errors.push(e);
                }
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Undecodable sensor input dropped");
                errors.push(EngineError::from(e));
            }
            None => {
                let resolved = self.engine.resolve_expired_bounce(now).is_some();
                beep = self.engine.take_beep();
                ready = self.engine.poll_ready(now);

                if !resolved && !beep && !ready && command.is_none() {
                    self.clock.sleep(self.poll_interval);
                    slept = true;
                }
            }
        }

        let now = self.clock.now();
        let snapshot = self.engine.snapshot(now, beep, ready);

        let mut dump = None;
        if let Some(command) = command {
            tracing::debug!(?command, "Dispatching manual command");
            match self.engine.apply_command(command, now) {
                Ok(records) => dump = records,
                Err(e) => {
                    tracing::warn!(error = %e, "Manual command ignored");
                    errors.push(e);
                }
            }
        }

        TickOutcome {
            snapshot,
            errors,
            dump,
            slept,
        }
    }

    /// Tick until `shutdown` is set, handing each outcome to `sink`.
    pub fn run<T: TickSink>(&mut self, shutdown: &AtomicBool, sink: &mut T) {
        tracing::info!(
            players = self.engine.players().len(),
            poll_ms = self.poll_interval.as_millis() as u64,
            "Control loop started"
        );

        while !shutdown.load(Ordering::SeqCst) {
            let outcome = self.tick();
            sink.on_tick(&outcome);
        }

        tracing::info!("Control loop stopped");
    }
}
