//! Wall-clock time for cache expiry
//!
//! Uses `web_time`, which is backed by `Date.now()` on WASM and by
//! `std::time::SystemTime` everywhere else.

use std::cell::Cell;
use std::time::Duration;
use web_time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// Matches the `expiry` field stored in the fingerprint cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EpochMillis(pub u64);

impl EpochMillis {
    /// Check if this instant is after another
    pub fn is_after(&self, other: EpochMillis) -> bool {
        self.0 > other.0
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl std::ops::Add<Duration> for EpochMillis {
    type Output = Self;

    fn add(self, duration: Duration) -> Self {
        EpochMillis(self.0.saturating_add(duration.as_millis() as u64))
    }
}

impl std::ops::Sub<Duration> for EpochMillis {
    type Output = Self;

    fn sub(self, duration: Duration) -> Self {
        EpochMillis(self.0.saturating_sub(duration.as_millis() as u64))
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> EpochMillis;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> EpochMillis {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        EpochMillis(millis)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get().saturating_add(duration.as_millis() as u64));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> EpochMillis {
        EpochMillis(self.now.get())
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> EpochMillis {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now().is_after(EpochMillis(1_577_836_800_000)));
    }

    #[test]
    fn test_duration_operations() {
        let instant = EpochMillis(1_000);
        let later = instant + Duration::from_secs(10);
        assert_eq!(later, EpochMillis(11_000));
        assert!(later.is_after(instant));
        assert_eq!(instant - Duration::from_secs(5), EpochMillis(0));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(500);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), EpochMillis(750));
        clock.set(10);
        assert_eq!(clock.now(), EpochMillis(10));
    }
}
