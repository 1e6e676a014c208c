#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Injectable wall clock for timestamping crime portal records.
//!
//! Stores take an `Arc<dyn Clock>` so production code reads the system
//! time while tests step a [`ManualClock`] deterministically.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

/// Source of "now" for `createdAt`/`updatedAt` stamps.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that returns a fixed start time and advances by a fixed step on
/// every read.
#[derive(Debug)]
pub struct ManualClock {
    next_ms: AtomicI64,
    step_ms: i64,
}

impl ManualClock {
    /// Starts at `start` and advances by `step` after each [`Clock::now`].
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next_ms: AtomicI64::new(start.timestamp_millis()),
            step_ms: step.num_milliseconds(),
        }
    }

    /// Starts at `start` and advances one second per read.
    #[must_use]
    pub fn stepping_from(start: DateTime<Utc>) -> Self {
        Self::new(start, Duration::seconds(1))
    }

    /// Moves the next reading to `to`, forwards or backwards.
    pub fn set(&self, to: DateTime<Utc>) {
        self.next_ms.store(to.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.next_ms.fetch_add(self.step_ms, Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_steps_forward() {
        let start = DateTime::<Utc>::UNIX_EPOCH + Duration::days(1);
        let clock = ManualClock::stepping_from(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::seconds(1));
    }

    #[test]
    fn manual_clock_can_be_rewound() {
        let start = DateTime::<Utc>::UNIX_EPOCH + Duration::days(10);
        let clock = ManualClock::new(start, Duration::zero());
        clock.set(start - Duration::days(1));
        assert_eq!(clock.now(), start - Duration::days(1));
        assert_eq!(clock.now(), start - Duration::days(1));
    }
}
