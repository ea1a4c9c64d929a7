//! Time source abstraction
//!
//! The ledger never calls `Utc::now()` directly: timestamps come from an
//! injected [`Clock`] so tests can drive time deterministically. The
//! contract is monotone non-decreasing output.

use chrono::{DateTime, TimeZone, Utc};

/// Source of timestamps for `registered_at` and `Transaction::timestamp`
pub trait Clock: Send + std::fmt::Debug {
    /// Current time; successive calls never go backwards
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: DateTime<Utc>,
}

impl ManualClock {
    /// Start at a fixed epoch second
    pub fn starting_at(epoch_secs: i64) -> Self {
        Self {
            now: Utc.timestamp_opt(epoch_secs, 0).single().unwrap_or_default(),
        }
    }

    /// Advance by whole seconds
    pub fn advance_secs(&mut self, secs: i64) {
        self.now += chrono::Duration::seconds(secs.max(0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let mut clock = ManualClock::starting_at(1_700_000_000);
        let t0 = clock.now();
        clock.advance_secs(5);
        assert_eq!((clock.now() - t0).num_seconds(), 5);
    }

    #[test]
    fn test_manual_clock_never_rewinds() {
        let mut clock = ManualClock::starting_at(100);
        let t0 = clock.now();
        clock.advance_secs(-10);
        assert!(clock.now() >= t0);
    }
}
