//! Time source for the control loop.
//!
//! The loop never calls `Instant::now()` directly so tests can drive it
//! through exact, repeatable timelines with [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Reads the current time and performs the idle sleep.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant::now` and `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to.
///
/// `sleep` advances the clock by the requested duration and returns at once.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to `at`. Moving backwards is ignored.
    pub fn set(&self, at: Instant) {
        if at > self.now.get() {
            self.now.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

impl<K: Clock + ?Sized> Clock for &K {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<K: Clock + ?Sized> Clock for Rc<K> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_sleep_advances() {
        let start = Instant::now();
        let clock = ManualClock::new(start);

        clock.sleep(Duration::from_millis(100));
        assert_eq!(clock.now(), start + Duration::from_millis(100));
    }

    #[test]
    fn test_manual_clock_never_goes_back() {
        let start = Instant::now();
        let clock = ManualClock::new(start + Duration::from_secs(5));

        clock.set(start);
        assert_eq!(clock.now(), start + Duration::from_secs(5));

        clock.set(start + Duration::from_secs(7));
        assert_eq!(clock.now(), start + Duration::from_secs(7));
    }

    #[test]
    fn test_shared_clock_sees_same_time() {
        let clock = Rc::new(ManualClock::new(Instant::now()));
        let shared = Rc::clone(&clock);

        shared.sleep(Duration::from_secs(1));
        assert_eq!(clock.now(), shared.now());
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
