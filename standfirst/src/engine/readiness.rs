//! Readiness detection.
//!
//! Fires once after the standing order has stayed empty for `ready_wait`,
//! signalling that everyone is seated and the next round can start.
//!
//! # State Machine
//!
//! ```text
//!              order became empty            now >= deadline
//!   Disarmed --------------------> Armed --------------------> Disarmed (fires once)
//!       ^                            |
//!       |   order became non-empty   |
//!       +----------------------------+
//! ```

use std::time::{Duration, Instant};

use super::standing::OrderChange;

#[derive(Debug, Clone)]
pub struct ReadinessDetector {
    ready_wait: Duration,
    deadline: Option<Instant>,
}

impl ReadinessDetector {
    pub fn new(ready_wait: Duration) -> Self {
        Self {
            ready_wait,
            deadline: None,
        }
    }

    /// React to a change in the standing order's emptiness at `now`.
    pub fn on_order_change(&mut self, change: OrderChange, now: Instant) {
        match change {
            OrderChange::BecameNonEmpty => {
                if self.deadline.take().is_some() {
                    tracing::debug!("Readiness disarmed, someone is standing");
                }
            }
            OrderChange::BecameEmpty => {
                let deadline = now + self.ready_wait;
                tracing::debug!(
                    wait_ms = self.ready_wait.as_millis() as u64,
                    "Standing order empty, readiness armed"
                );
                self.deadline = Some(deadline);
            }
            OrderChange::Unchanged => {}
        }
    }

    /// Returns `true` exactly once when the armed deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// The armed deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }
}
