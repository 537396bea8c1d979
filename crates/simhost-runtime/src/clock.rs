#![forbid(unsafe_code)]

//! Wall-clock sources for the cycle driver.
//!
//! The engine only ever sees whole seconds since the Unix epoch.
//! [`ManualClock`] lets tests pin that value.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of coarse timestamps.
pub trait Clock {
    /// Seconds since the Unix epoch.
    fn now_secs(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Start at `secs`.
    pub fn new(secs: u64) -> Self {
        Self {
            now: Cell::new(secs),
        }
    }

    /// Jump to `secs`.
    pub fn set(&self, secs: u64) {
        self.now.set(secs);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get().saturating_add(secs));
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_on_demand() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_secs(), 100);
        clock.advance(5);
        assert_eq!(clock.now_secs(), 105);
        clock.set(7);
        assert_eq!(clock.now_secs(), 7);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now_secs() > 1_577_836_800);
    }
}
